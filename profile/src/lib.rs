#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Durable player statistics that drive the adaptive difficulty and
//! prediction systems.
//!
//! A [`PlayerProfile`] is created once per process, mutated only when a
//! session ends, and flushed through a [`ProfileStore`] immediately
//! after each mutation. The [`Recorder`] ties the two together by
//! consuming `Event::SessionEnded` values from the world.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use retro_snake_core::{DeathCause, Direction, SessionSummary, SkillTier};

pub mod recorder;
pub mod store;

pub use recorder::Recorder;
pub use store::{JsonFileStore, ProfileStore, StoreError};

/// Maximum number of per-game move sequences retained in the history.
pub const HISTORY_GAMES: usize = 50;

/// Maximum number of trailing moves kept from each game.
pub const HISTORY_MOVES_PER_GAME: usize = 20;

/// Cross-session record of a player's statistics.
///
/// Every field carries a serde default so records written by older
/// builds, or trimmed by hand, still load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Number of completed games folded into the averages.
    #[serde(default)]
    pub games_played: u64,
    /// Incremental running mean of final scores.
    #[serde(default)]
    pub avg_score: f64,
    /// Incremental running mean of session lengths in seconds.
    #[serde(default)]
    pub avg_game_time: f64,
    /// Trailing moves of the most recent games, oldest first.
    #[serde(default)]
    pub movement_history: VecDeque<Vec<Direction>>,
    /// How often each death cause ended a game.
    #[serde(default = "zeroed_death_causes")]
    pub death_causes: BTreeMap<DeathCause, u64>,
    /// How often each direction was chosen, across all games.
    #[serde(default = "zeroed_direction_counts")]
    pub direction_counts: BTreeMap<Direction, u64>,
    /// Skill tier assessed when the profile was last flushed.
    #[serde(default)]
    pub skill_tier: SkillTier,
}

impl PlayerProfile {
    /// Creates a fresh profile with zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            death_causes: zeroed_death_causes(),
            direction_counts: zeroed_direction_counts(),
            ..Self::default()
        }
    }

    /// Folds a finished session into the profile.
    ///
    /// Averages update as incremental running means, the death cause
    /// and per-direction counters increment over the full move log,
    /// and the movement history keeps the trailing
    /// [`HISTORY_MOVES_PER_GAME`] moves of the game, evicting the
    /// oldest entry once more than [`HISTORY_GAMES`] are retained.
    pub fn record_game(&mut self, summary: &SessionSummary) {
        self.games_played += 1;
        let games = self.games_played as f64;
        self.avg_score = (self.avg_score * (games - 1.0) + f64::from(summary.score)) / games;
        self.avg_game_time = (self.avg_game_time * (games - 1.0) + summary.game_time) / games;

        *self.death_causes.entry(summary.death_cause).or_insert(0) += 1;

        let tail_start = summary.moves.len().saturating_sub(HISTORY_MOVES_PER_GAME);
        self.movement_history
            .push_back(summary.moves[tail_start..].to_vec());
        while self.movement_history.len() > HISTORY_GAMES {
            let _ = self.movement_history.pop_front();
        }

        for &direction in &summary.moves {
            *self.direction_counts.entry(direction).or_insert(0) += 1;
        }
    }
}

fn zeroed_death_causes() -> BTreeMap<DeathCause, u64> {
    [(DeathCause::Wall, 0), (DeathCause::SelfCollision, 0)]
        .into_iter()
        .collect()
}

fn zeroed_direction_counts() -> BTreeMap<Direction, u64> {
    Direction::ALL
        .into_iter()
        .map(|direction| (direction, 0))
        .collect()
}
