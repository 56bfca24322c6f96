#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Retro Snake engine.
//!
//! This crate defines the message surface that connects the external
//! render/input loop, the authoritative world, and the pure systems.
//! Hosts submit [`Command`] values describing desired mutations, the
//! world executes those commands via its `apply` entry point, and then
//! broadcasts [`Event`] values for systems (and the profile recorder)
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command
//! batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Latches the direction the snake should travel starting with the
    /// next tick. The most recent request before a tick wins; a request
    /// equal to the reverse of the current direction is ignored.
    SetDirection {
        /// Direction requested by the player.
        direction: Direction,
    },
    /// Advances the simulation by one tick of the provided duration.
    Tick {
        /// Simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Flips the session between running and paused.
    TogglePause,
    /// Discards the current session and constructs a fresh one on the
    /// same grid, reseeding food placement.
    Reset,
    /// Flips the prediction-hint display flag. Orthogonal to the
    /// session state machine and legal in every state.
    ToggleHints,
    /// Requests that the host shut down. Never flushes the profile.
    Quit,
    /// Requests placement of a power-up at the provided cell.
    SpawnPowerUp {
        /// Cell the power-up should occupy.
        cell: Cell,
        /// Kind of power-up to place.
        kind: PowerUpKind,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the snake advanced into a new head cell.
    SnakeAdvanced {
        /// Cell now occupied by the snake's head.
        head: Cell,
    },
    /// Confirms that the snake consumed the food item.
    FoodEaten {
        /// Cell the food occupied.
        cell: Cell,
        /// Session score after the food bonus was applied.
        score: u32,
    },
    /// Announces the location of a freshly placed food item.
    FoodSpawned {
        /// Cell the food now occupies.
        cell: Cell,
    },
    /// Confirms that a power-up entered play.
    PowerUpSpawned {
        /// Cell the power-up occupies.
        cell: Cell,
        /// Kind of power-up that was placed.
        kind: PowerUpKind,
    },
    /// Confirms that the snake collected a power-up.
    PowerUpCollected {
        /// Kind of power-up that was collected.
        kind: PowerUpKind,
        /// Session score after the one-shot bonus was applied.
        score: u32,
    },
    /// Reports that a power-up ran out of lifetime and left play.
    PowerUpExpired {
        /// Cell the power-up occupied.
        cell: Cell,
        /// Kind of power-up that expired.
        kind: PowerUpKind,
    },
    /// Announces that the pause state flipped.
    PauseToggled {
        /// Whether the session is paused after the toggle.
        paused: bool,
    },
    /// Announces that the hint-display flag flipped.
    HintsToggled {
        /// Whether hints are enabled after the toggle.
        enabled: bool,
    },
    /// Reports that the session ended and carries its final record.
    SessionEnded {
        /// Summary handed to the profile update.
        summary: SessionSummary,
    },
    /// Confirms that a fresh session replaced the previous one.
    SessionReset,
    /// Confirms that the host was asked to shut down.
    QuitRequested,
}

/// Location of a single grid cell expressed as column and row
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: u32,
    y: u32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the neighbouring cell one step in the provided
    /// direction, or `None` when the step leaves the grid.
    #[must_use]
    pub fn step(self, direction: Direction, grid: GridSize) -> Option<Cell> {
        let candidate = match direction {
            Direction::Up => Cell::new(self.x, self.y.checked_sub(1)?),
            Direction::Down => Cell::new(self.x, self.y + 1),
            Direction::Left => Cell::new(self.x.checked_sub(1)?, self.y),
            Direction::Right => Cell::new(self.x + 1, self.y),
        };
        grid.contains(candidate).then_some(candidate)
    }
}

/// Dimensions of the playfield measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new grid description. Both dimensions must be at
    /// least one cell.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width >= 1 && height >= 1, "grid dimensions must be >= 1");
        Self { width, height }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Cell at the centre of the grid, where new sessions start.
    #[must_use]
    pub const fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }
}

/// Cardinal movement directions available to the snake.
///
/// `ALL` doubles as the deterministic tie-break priority used by the
/// prediction system: earlier entries win equal counts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in fixed priority order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Ways a session can end.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum DeathCause {
    /// The snake left the grid bounds.
    #[serde(rename = "wall")]
    Wall,
    /// The snake ran into its own body.
    #[serde(rename = "self")]
    SelfCollision,
}

/// Ordered classification of player proficiency.
///
/// The `Ord` derivation follows proficiency, so tiers compare the way
/// the adaptive difficulty tables rank them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillTier {
    /// Fewer than three recorded games, or low historical averages.
    #[default]
    Beginner,
    /// Average score above 50 with games lasting over half a minute.
    Intermediate,
    /// Average score above 100 with games lasting over a minute.
    Advanced,
    /// Average score above 200 with games lasting over two minutes.
    Expert,
}

impl SkillTier {
    /// Numeric rank of the tier, `Beginner` being zero.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            SkillTier::Beginner => 0,
            SkillTier::Intermediate => 1,
            SkillTier::Advanced => 2,
            SkillTier::Expert => 3,
        }
    }
}

/// Transient bonuses that can appear on the grid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Grants a one-shot 25 point bonus.
    SpeedBoost,
    /// Grants a one-shot 50 point bonus.
    ScoreMultiplier,
    /// Grants a one-shot 30 point bonus.
    Invincible,
}

impl PowerUpKind {
    /// Every kind, used for uniform random selection.
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::Invincible,
    ];

    /// One-shot score bonus granted on pickup. No kind carries an
    /// ongoing gameplay effect beyond this bonus.
    #[must_use]
    pub const fn score_bonus(self) -> u32 {
        match self {
            PowerUpKind::SpeedBoost => 25,
            PowerUpKind::ScoreMultiplier => 50,
            PowerUpKind::Invincible => 30,
        }
    }
}

/// Lifecycle states of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The session accepts ticks and direction changes.
    Running,
    /// The session ignores ticks until unpaused.
    Paused,
    /// The session ended; only reset, hint toggles, and quit apply.
    GameOver,
}

/// Final record of a finished session, folded into the player profile.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    /// Score at the moment the session ended.
    pub score: u32,
    /// Total simulated session time in seconds.
    pub game_time: f64,
    /// What ended the session.
    pub death_cause: DeathCause,
    /// Every accepted direction change, in order.
    pub moves: Vec<Direction>,
}

/// Immutable representation of a single power-up used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUpSnapshot {
    /// Cell occupied by the power-up.
    pub cell: Cell,
    /// Kind of the power-up.
    pub kind: PowerUpKind,
    /// Ticks left before the power-up expires.
    pub ticks_remaining: u32,
}

/// Read-only snapshot describing all power-ups in play.
#[derive(Clone, Debug, Default)]
pub struct PowerUpView {
    snapshots: Vec<PowerUpSnapshot>,
}

impl PowerUpView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PowerUpSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.cell);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PowerUpSnapshot> {
        self.snapshots.iter()
    }

    /// Number of power-ups in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no power-ups are in play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PowerUpSnapshot> {
        self.snapshots
    }
}
