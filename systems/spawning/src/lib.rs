#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic power-up spawning driven by food pickups.
//!
//! Each eaten food is one spawn opportunity. The system rolls against
//! the frequency handed down by the difficulty controller, picks a
//! free cell and a power-up kind uniformly, and emits a spawn command
//! for the world to validate and install. All randomness comes from a
//! seeded stream, so a replayed session spawns identically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use retro_snake_core::{Cell, Command, Event, GridSize, PowerUpKind};

/// Factor applied to the spawn frequency while the player is
/// struggling, to hand out help more often.
const STRUGGLE_BOOST: f64 = 1.5;

/// Fraction of the historical average below which the current score
/// counts as struggling.
const STRUGGLE_CUTOFF: f64 = 0.7;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Read-only facts the spawner needs for one batch of events.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext<'a> {
    /// Playfield dimensions.
    pub grid: GridSize,
    /// Cells the spawner must not place onto: the snake, the food, and
    /// any power-ups already on the board.
    pub occupied: &'a [Cell],
    /// Probability of spawning per eaten food, from the difficulty
    /// controller.
    pub frequency: f64,
    /// Historical average score, for the struggle boost.
    pub avg_score: f64,
}

/// Pure system that rolls for a power-up whenever food is eaten.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// Only `Event::FoodEaten` triggers a roll; everything else in the
    /// batch is ignored. A roll that succeeds but finds no free cell
    /// emits nothing.
    pub fn handle(&mut self, events: &[Event], context: SpawnContext<'_>, out: &mut Vec<Command>) {
        for event in events {
            let Event::FoodEaten { score, .. } = event else {
                continue;
            };
            if !self.rolls_spawn(*score, context) {
                continue;
            }
            let Some(cell) = self.select_cell(context.grid, context.occupied) else {
                continue;
            };
            let kind = self.select_kind();
            out.push(Command::SpawnPowerUp { cell, kind });
        }
    }

    fn rolls_spawn(&mut self, score: u32, context: SpawnContext<'_>) -> bool {
        let struggling = f64::from(score) < context.avg_score * STRUGGLE_CUTOFF;
        let threshold = if struggling {
            context.frequency * STRUGGLE_BOOST
        } else {
            context.frequency
        };
        self.rng.gen::<f64>() < threshold
    }

    fn select_cell(&mut self, grid: GridSize, occupied: &[Cell]) -> Option<Cell> {
        let mut free = Vec::with_capacity(grid.cell_count() as usize);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cell = Cell::new(x, y);
                if !occupied.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        if free.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..free.len());
        Some(free[index])
    }

    fn select_kind(&mut self) -> PowerUpKind {
        let index = self.rng.gen_range(0..PowerUpKind::ALL.len());
        PowerUpKind::ALL[index]
    }
}
