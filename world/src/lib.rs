#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Retro Snake.
//!
//! The world owns the snake, the food item, and the power-ups in play,
//! and advances them one tick at a time through the [`apply`] entry
//! point. Hosts pace those ticks externally at whatever rate the
//! difficulty system last reported; nothing in here keeps time on its
//! own.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use retro_snake_core::{
    Cell, Command, DeathCause, Direction, Event, GridSize, PowerUpKind, SessionState,
    SessionSummary,
};

pub mod collision;

use collision::Collision;

/// Ticks a power-up stays in play before expiring.
pub const POWER_UP_LIFETIME_TICKS: u32 = 300;

/// Points awarded for eating a food item.
pub const FOOD_SCORE: u32 = 10;

const START_DIRECTION: Direction = Direction::Right;

/// Configuration parameters required to construct a world.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    grid: GridSize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration for the provided grid and seed.
    ///
    /// The grid needs room for the snake and a food item, so it must
    /// span at least two cells.
    #[must_use]
    pub fn new(grid: GridSize, rng_seed: u64) -> Self {
        debug_assert!(grid.cell_count() >= 2, "grid must span at least two cells");
        Self { grid, rng_seed }
    }
}

/// Represents the authoritative Retro Snake session state.
#[derive(Debug)]
pub struct World {
    grid: GridSize,
    snake: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Option<Direction>,
    food: Cell,
    power_ups: Vec<PowerUp>,
    score: u32,
    state: SessionState,
    elapsed: Duration,
    move_log: Vec<Direction>,
    hints_enabled: bool,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new session ready for simulation.
    ///
    /// The snake starts as a single segment at the grid centre heading
    /// right, with food placed on a uniformly random empty cell.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let snake: VecDeque<Cell> = VecDeque::from([config.grid.center()]);
        let food = random_empty_cell(&mut rng, config.grid, snake.iter().copied())
            .unwrap_or(Cell::new(0, 0));
        Self {
            grid: config.grid,
            snake,
            direction: START_DIRECTION,
            pending_direction: None,
            food,
            power_ups: Vec::new(),
            score: 0,
            state: SessionState::Running,
            elapsed: Duration::ZERO,
            move_log: Vec::new(),
            hints_enabled: true,
            rng,
        }
    }

    fn reset_session(&mut self, out_events: &mut Vec<Event>) {
        self.snake = VecDeque::from([self.grid.center()]);
        self.direction = START_DIRECTION;
        self.pending_direction = None;
        self.power_ups.clear();
        self.score = 0;
        self.state = SessionState::Running;
        self.elapsed = Duration::ZERO;
        self.move_log.clear();
        self.hints_enabled = true;
        // The RNG stream continues, so food placement reseeds rather
        // than replaying the previous session's layout.
        self.food = random_empty_cell(&mut self.rng, self.grid, self.snake.iter().copied())
            .unwrap_or(Cell::new(0, 0));
        out_events.push(Event::SessionReset);
        out_events.push(Event::FoodSpawned { cell: self.food });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        // The most recent direction request before this tick wins and
        // is applied atomically here; the reverse of the current
        // direction is rejected without being an error.
        if let Some(requested) = self.pending_direction.take() {
            if requested != self.direction.opposite() {
                self.direction = requested;
                self.move_log.push(requested);
            }
        }

        let Some(&head) = self.snake.front() else {
            debug_assert!(false, "snake is never empty");
            return;
        };

        let destination = head.step(self.direction, self.grid);
        match collision::classify(destination, self.snake.iter().copied()) {
            Collision::Wall => {
                self.finish(DeathCause::Wall, out_events);
                return;
            }
            Collision::SelfCollision => {
                self.finish(DeathCause::SelfCollision, out_events);
                return;
            }
            Collision::None => {}
        }
        // classify only reports `None` for in-bounds destinations.
        let Some(new_head) = destination else {
            return;
        };

        self.snake.push_front(new_head);
        out_events.push(Event::SnakeAdvanced { head: new_head });

        if new_head == self.food {
            // Growth tick: the tail stays, the snake gains a segment.
            self.score += FOOD_SCORE;
            out_events.push(Event::FoodEaten {
                cell: new_head,
                score: self.score,
            });
            if let Some(cell) =
                random_empty_cell(&mut self.rng, self.grid, self.snake.iter().copied())
            {
                self.food = cell;
                out_events.push(Event::FoodSpawned { cell });
            }
        } else {
            let _ = self.snake.pop_back();
        }

        if let Some(index) = self
            .power_ups
            .iter()
            .position(|power_up| power_up.cell == new_head)
        {
            let collected = self.power_ups.remove(index);
            self.score += collected.kind.score_bonus();
            out_events.push(Event::PowerUpCollected {
                kind: collected.kind,
                score: self.score,
            });
        }

        self.expire_power_ups(out_events);
    }

    fn expire_power_ups(&mut self, out_events: &mut Vec<Event>) {
        // Survivors are collected into a fresh vector instead of being
        // removed while iterating.
        let mut survivors = Vec::with_capacity(self.power_ups.len());
        for mut power_up in std::mem::take(&mut self.power_ups) {
            power_up.ticks_remaining = power_up.ticks_remaining.saturating_sub(1);
            if power_up.ticks_remaining == 0 {
                out_events.push(Event::PowerUpExpired {
                    cell: power_up.cell,
                    kind: power_up.kind,
                });
            } else {
                survivors.push(power_up);
            }
        }
        self.power_ups = survivors;
    }

    fn finish(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        self.state = SessionState::GameOver;
        out_events.push(Event::SessionEnded {
            summary: SessionSummary {
                score: self.score,
                game_time: self.elapsed.as_secs_f64(),
                death_cause: cause,
                moves: self.move_log.clone(),
            },
        });
    }

    fn install_power_up(&mut self, cell: Cell, kind: PowerUpKind, out_events: &mut Vec<Event>) {
        let placeable = self.grid.contains(cell)
            && cell != self.food
            && !self.snake.contains(&cell)
            && !self.power_ups.iter().any(|power_up| power_up.cell == cell);
        if !placeable {
            return;
        }

        self.power_ups.push(PowerUp {
            cell,
            kind,
            ticks_remaining: POWER_UP_LIFETIME_TICKS,
        });
        out_events.push(Event::PowerUpSpawned { cell, kind });
    }
}

/// Applies the provided command to the world, mutating state
/// deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetDirection { direction } => {
            if world.state == SessionState::Running {
                world.pending_direction = Some(direction);
            }
        }
        Command::Tick { dt } => {
            if world.state == SessionState::Running {
                world.tick(dt, out_events);
            }
        }
        Command::TogglePause => match world.state {
            SessionState::Running => {
                world.state = SessionState::Paused;
                out_events.push(Event::PauseToggled { paused: true });
            }
            SessionState::Paused => {
                world.state = SessionState::Running;
                out_events.push(Event::PauseToggled { paused: false });
            }
            SessionState::GameOver => {}
        },
        Command::Reset => {
            if world.state == SessionState::GameOver {
                world.reset_session(out_events);
            }
        }
        Command::ToggleHints => {
            world.hints_enabled = !world.hints_enabled;
            out_events.push(Event::HintsToggled {
                enabled: world.hints_enabled,
            });
        }
        Command::Quit => out_events.push(Event::QuitRequested),
        Command::SpawnPowerUp { cell, kind } => {
            if world.state == SessionState::Running {
                world.install_power_up(cell, kind, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use retro_snake_core::{
        Cell, Direction, GridSize, PowerUpSnapshot, PowerUpView, SessionState,
    };

    /// Provides the grid dimensions the session runs on.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.grid
    }

    /// Captures the snake's cells in order, head first.
    #[must_use]
    pub fn snake_cells(world: &World) -> Vec<Cell> {
        world.snake.iter().copied().collect()
    }

    /// Cell currently occupied by the food item.
    #[must_use]
    pub fn food_cell(world: &World) -> Cell {
        world.food
    }

    /// Captures a read-only view of the power-ups in play.
    #[must_use]
    pub fn power_up_view(world: &World) -> PowerUpView {
        PowerUpView::from_snapshots(
            world
                .power_ups
                .iter()
                .map(|power_up| PowerUpSnapshot {
                    cell: power_up.cell,
                    kind: power_up.kind,
                    ticks_remaining: power_up.ticks_remaining,
                })
                .collect(),
        )
    }

    /// Current session score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current lifecycle state of the session.
    #[must_use]
    pub fn session_state(world: &World) -> SessionState {
        world.state
    }

    /// Simulated time accumulated by the session so far.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Direction the snake is currently travelling.
    #[must_use]
    pub fn current_direction(world: &World) -> Direction {
        world.direction
    }

    /// Every accepted direction change for the current session.
    #[must_use]
    pub fn move_log(world: &World) -> &[Direction] {
        &world.move_log
    }

    /// Whether prediction hints should be displayed.
    #[must_use]
    pub fn hints_enabled(world: &World) -> bool {
        world.hints_enabled
    }

    /// Cells unavailable for power-up placement: the snake's body plus
    /// the food cell.
    #[must_use]
    pub fn occupied_cells(world: &World) -> Vec<Cell> {
        let mut cells: Vec<Cell> = world.snake.iter().copied().collect();
        cells.push(world.food);
        cells
    }
}

#[derive(Clone, Copy, Debug)]
struct PowerUp {
    cell: Cell,
    kind: PowerUpKind,
    ticks_remaining: u32,
}

fn random_empty_cell(
    rng: &mut ChaCha8Rng,
    grid: GridSize,
    occupied: impl IntoIterator<Item = Cell>,
) -> Option<Cell> {
    let occupied: Vec<Cell> = occupied.into_iter().collect();
    let mut empty: Vec<Cell> = Vec::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = Cell::new(x, y);
            if !occupied.contains(&cell) {
                empty.push(cell);
            }
        }
    }

    if empty.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..empty.len());
    Some(empty[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(125);

    fn world_on(width: u32, height: u32) -> World {
        World::new(Config::new(GridSize::new(width, height), 7))
    }

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick { dt: TICK }, &mut events);
        events
    }

    fn steer(world: &mut World, direction: Direction) {
        let mut events = Vec::new();
        apply(world, Command::SetDirection { direction }, &mut events);
        assert!(events.is_empty());
    }

    /// Builds a world with an explicit snake layout for collision
    /// scenarios that are awkward to reach through commands alone.
    fn world_with_snake(grid: GridSize, cells: &[Cell], direction: Direction) -> World {
        let mut world = World::new(Config::new(grid, 7));
        world.snake = cells.iter().copied().collect();
        world.direction = direction;
        world.food = random_empty_cell(&mut world.rng, grid, world.snake.iter().copied())
            .expect("grid has room for food");
        world
    }

    #[test]
    fn snake_advances_one_cell_per_tick() {
        let mut world = world_on(10, 10);
        let head_before = query::snake_cells(&world)[0];
        let events = tick(&mut world);

        let head_after = query::snake_cells(&world)[0];
        assert_eq!(head_after, Cell::new(head_before.x() + 1, head_before.y()));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::SnakeAdvanced { head } if *head == head_after)));
    }

    #[test]
    fn reverse_direction_request_is_ignored() {
        let mut world = world_on(10, 10);
        assert_eq!(query::current_direction(&world), Direction::Right);

        steer(&mut world, Direction::Left);
        let _ = tick(&mut world);

        assert_eq!(query::current_direction(&world), Direction::Right);
        assert!(query::move_log(&world).is_empty());
    }

    #[test]
    fn latest_direction_request_before_a_tick_wins() {
        let mut world = world_on(10, 10);
        steer(&mut world, Direction::Up);
        steer(&mut world, Direction::Down);
        let _ = tick(&mut world);

        assert_eq!(query::current_direction(&world), Direction::Down);
        assert_eq!(query::move_log(&world), &[Direction::Down]);
    }

    #[test]
    fn wall_collision_ends_the_session() {
        // Width 10, head at (8, y) moving right: one step survives,
        // the next leaves the grid.
        let grid = GridSize::new(10, 10);
        let mut world = world_with_snake(grid, &[Cell::new(8, 4)], Direction::Right);

        let _ = tick(&mut world);
        assert_eq!(query::snake_cells(&world)[0], Cell::new(9, 4));
        assert_eq!(query::session_state(&world), SessionState::Running);

        let events = tick(&mut world);
        assert_eq!(query::session_state(&world), SessionState::GameOver);
        let summary = events
            .iter()
            .find_map(|event| match event {
                Event::SessionEnded { summary } => Some(summary),
                _ => None,
            })
            .expect("session end event");
        assert_eq!(summary.death_cause, DeathCause::Wall);
    }

    #[test]
    fn head_entering_vacating_tail_cell_dies() {
        // Square layout: head (1,1), tail (1,2). Moving down enters
        // the tail cell, which the pre-move check treats as occupied
        // even though this tick would vacate it.
        let grid = GridSize::new(6, 6);
        let cells = [
            Cell::new(1, 1),
            Cell::new(2, 1),
            Cell::new(2, 2),
            Cell::new(1, 2),
        ];
        let mut world = world_with_snake(grid, &cells, Direction::Left);

        steer(&mut world, Direction::Down);
        let events = tick(&mut world);

        assert_eq!(query::session_state(&world), SessionState::GameOver);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::SessionEnded { summary } if summary.death_cause == DeathCause::SelfCollision
        )));
    }

    #[test]
    fn snake_cells_stay_distinct_across_many_ticks() {
        // Steer a tight clockwise square around the grid centre; the
        // session survives indefinitely and the body invariant must
        // hold after every tick.
        let loop_directions = [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
        ];
        let mut world = world_on(12, 12);
        for step in 0..60 {
            steer(&mut world, loop_directions[step % 4]);
            let _ = tick(&mut world);
            if query::session_state(&world) != SessionState::Running {
                break;
            }

            let cells = query::snake_cells(&world);
            let mut deduped = cells.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(deduped.len(), cells.len(), "snake overlapped itself");
        }
    }

    #[test]
    fn eating_food_grows_the_snake_and_respawns_food() {
        let grid = GridSize::new(8, 8);
        let mut world = world_with_snake(grid, &[Cell::new(3, 3)], Direction::Right);
        world.food = Cell::new(4, 3);

        let events = tick(&mut world);

        let cells = query::snake_cells(&world);
        assert_eq!(cells.len(), 2);
        assert_eq!(query::score(&world), FOOD_SCORE);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::FoodEaten { .. })));

        let food = query::food_cell(&world);
        assert!(!cells.contains(&food), "food respawned on the snake");
    }

    #[test]
    fn food_is_never_placed_on_the_snake() {
        for seed in 0..32 {
            let grid = GridSize::new(3, 3);
            let mut world = World::new(Config::new(grid, seed));
            let body = [grid.center(), Cell::new(0, 0), Cell::new(1, 0)];
            world.snake = body.iter().copied().collect();
            world.food = random_empty_cell(&mut world.rng, grid, world.snake.iter().copied())
                .expect("grid has empty cells");
            assert!(!body.contains(&world.food));
        }
    }

    #[test]
    fn pause_toggle_flips_running_and_paused() {
        let mut world = world_on(10, 10);
        let mut events = Vec::new();

        apply(&mut world, Command::TogglePause, &mut events);
        assert_eq!(query::session_state(&world), SessionState::Paused);

        let head = query::snake_cells(&world)[0];
        let _ = tick(&mut world);
        assert_eq!(query::snake_cells(&world)[0], head, "paused snake moved");

        apply(&mut world, Command::TogglePause, &mut events);
        assert_eq!(query::session_state(&world), SessionState::Running);
    }

    #[test]
    fn game_over_ignores_everything_but_reset_hints_and_quit() {
        let grid = GridSize::new(4, 4);
        let mut world = world_with_snake(grid, &[Cell::new(3, 1)], Direction::Right);
        let _ = tick(&mut world);
        assert_eq!(query::session_state(&world), SessionState::GameOver);

        let mut events = Vec::new();
        apply(&mut world, Command::TogglePause, &mut events);
        apply(
            &mut world,
            Command::SetDirection {
                direction: Direction::Up,
            },
            &mut events,
        );
        apply(&mut world, Command::Tick { dt: TICK }, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::session_state(&world), SessionState::GameOver);

        apply(&mut world, Command::ToggleHints, &mut events);
        assert!(matches!(
            events.last(),
            Some(Event::HintsToggled { enabled: false })
        ));

        apply(&mut world, Command::Quit, &mut events);
        assert!(matches!(events.last(), Some(Event::QuitRequested)));

        apply(&mut world, Command::Reset, &mut events);
        assert_eq!(query::session_state(&world), SessionState::Running);
        assert_eq!(query::score(&world), 0);
        assert_eq!(query::snake_cells(&world), vec![grid.center()]);
        assert!(query::hints_enabled(&world));
    }

    #[test]
    fn power_up_pickup_grants_one_shot_bonus() {
        let grid = GridSize::new(8, 8);
        let mut world = world_with_snake(grid, &[Cell::new(1, 1)], Direction::Right);
        world.food = Cell::new(7, 7);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: Cell::new(2, 1),
                kind: PowerUpKind::ScoreMultiplier,
            },
            &mut events,
        );
        assert_eq!(query::power_up_view(&world).len(), 1);

        let tick_events = tick(&mut world);
        assert_eq!(query::score(&world), 50);
        assert!(tick_events.iter().any(|event| matches!(
            event,
            Event::PowerUpCollected {
                kind: PowerUpKind::ScoreMultiplier,
                score: 50,
            }
        )));
        assert!(query::power_up_view(&world).is_empty());
    }

    #[test]
    fn power_up_expires_after_lifetime_elapses() {
        // A long corridor lets the snake run straight for the whole
        // lifetime without ever reaching a wall.
        let grid = GridSize::new(340, 4);
        let mut world = world_with_snake(grid, &[Cell::new(1, 2)], Direction::Right);
        world.food = Cell::new(0, 3);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: Cell::new(0, 0),
                kind: PowerUpKind::Invincible,
            },
            &mut events,
        );
        assert_eq!(query::power_up_view(&world).len(), 1);

        for index in 0..POWER_UP_LIFETIME_TICKS {
            let events = tick(&mut world);
            assert_eq!(query::session_state(&world), SessionState::Running);
            let expired = events
                .iter()
                .any(|event| matches!(event, Event::PowerUpExpired { .. }));
            assert_eq!(
                expired,
                index + 1 == POWER_UP_LIFETIME_TICKS,
                "expiry fired on the wrong tick"
            );
        }

        assert!(query::power_up_view(&world).is_empty());
    }

    #[test]
    fn power_up_placement_rejects_occupied_cells() {
        let grid = GridSize::new(8, 8);
        let mut world = world_with_snake(grid, &[Cell::new(1, 1)], Direction::Right);
        world.food = Cell::new(5, 5);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: Cell::new(1, 1),
                kind: PowerUpKind::SpeedBoost,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: Cell::new(5, 5),
                kind: PowerUpKind::SpeedBoost,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(query::power_up_view(&world).is_empty());
    }

    #[test]
    fn session_summary_carries_score_time_and_moves() {
        let grid = GridSize::new(10, 10);
        let mut world = world_with_snake(grid, &[Cell::new(5, 1)], Direction::Right);
        steer(&mut world, Direction::Up);
        let _ = tick(&mut world);

        let events = tick(&mut world);
        let summary = events
            .iter()
            .find_map(|event| match event {
                Event::SessionEnded { summary } => Some(summary),
                _ => None,
            })
            .expect("session end event");

        assert_eq!(summary.death_cause, DeathCause::Wall);
        assert_eq!(summary.moves, vec![Direction::Up]);
        assert!((summary.game_time - 2.0 * TICK.as_secs_f64()).abs() < f64::EPSILON);
    }
}
