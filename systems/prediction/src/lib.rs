#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Next-move prediction from recorded movement history.
//!
//! A frequency heuristic over the most recent games: whichever
//! direction the player has pressed most often lately is the guess the
//! host surfaces as a hint. Deterministic, no randomness and no model
//! state.

use retro_snake_core::Direction;
use retro_snake_profile::PlayerProfile;

/// Number of most recent games the prediction pools moves from.
pub const RECENT_GAMES: usize = 10;

/// Predicts the player's next move from their recent history.
///
/// Pools the move tails of the [`RECENT_GAMES`] most recent games and
/// returns the most frequent direction, or `None` when no history has
/// been recorded yet. Ties break toward the earlier entry in
/// [`Direction::ALL`], so the answer is stable across calls.
#[must_use]
pub fn predict(profile: &PlayerProfile) -> Option<Direction> {
    if profile.movement_history.is_empty() {
        return None;
    }

    let mut counts = [0u64; 4];
    let recent = profile
        .movement_history
        .iter()
        .rev()
        .take(RECENT_GAMES)
        .flatten();
    for &direction in recent {
        counts[index_of(direction)] += 1;
    }

    let mut best = Direction::ALL[0];
    for &candidate in &Direction::ALL[1..] {
        if counts[index_of(candidate)] > counts[index_of(best)] {
            best = candidate;
        }
    }
    Some(best)
}

const fn index_of(direction: Direction) -> usize {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}
