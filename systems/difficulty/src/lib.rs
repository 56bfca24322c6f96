#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Skill classification and adaptive difficulty derivation.
//!
//! Both entry points are pure functions over a profile snapshot: the
//! host calls [`adapt`] every tick and paces the next tick at the
//! reported rate. Nothing here mutates the profile; only the recorder
//! does that, at game over.

use retro_snake_core::SkillTier;
use retro_snake_profile::PlayerProfile;

/// Lowest tick rate the controller ever reports, in ticks per second.
pub const MIN_TICK_RATE: u32 = 6;

/// Highest tick rate the controller ever reports, in ticks per second.
pub const MAX_TICK_RATE: u32 = 25;

/// Ticks per second granted on top of the base rate while the player
/// outperforms their average.
const SURGE_BONUS: u32 = 3;

/// Ticks per second shaved off the base rate while the player trails
/// their average.
const RELIEF_DROP: u32 = 2;

/// Difficulty parameters derived for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    /// Rate the host should pace ticks at, in ticks per second.
    pub tick_rate: u32,
    /// Probability threshold handed to the power-up spawner.
    pub power_up_frequency: f64,
    /// Tier the parameters were derived from.
    pub skill: SkillTier,
}

/// Classifies the player's skill tier from historical averages.
///
/// Evaluated fresh on every call; the first matching clause wins and
/// the clauses are mutually exclusive by construction. Players with
/// fewer than three recorded games are always beginners.
#[must_use]
pub fn classify(profile: &PlayerProfile) -> SkillTier {
    if profile.games_played < 3 {
        return SkillTier::Beginner;
    }

    if profile.avg_score > 200.0 && profile.avg_game_time > 120.0 {
        SkillTier::Expert
    } else if profile.avg_score > 100.0 && profile.avg_game_time > 60.0 {
        SkillTier::Advanced
    } else if profile.avg_score > 50.0 && profile.avg_game_time > 30.0 {
        SkillTier::Intermediate
    } else {
        SkillTier::Beginner
    }
}

/// Derives the tick rate and power-up frequency for the current tick.
///
/// The base rate for the classified tier is nudged up while the
/// session outruns the historical average by twenty percent, nudged
/// down while it trails by twenty percent, and clamped to
/// `[MIN_TICK_RATE, MAX_TICK_RATE]` either way. Idempotent for a given
/// profile and score.
#[must_use]
pub fn adapt(profile: &PlayerProfile, current_score: u32) -> Difficulty {
    let skill = classify(profile);
    let base = base_tick_rate(skill);

    let score = f64::from(current_score);
    let tick_rate = if score > profile.avg_score * 1.2 {
        (base + SURGE_BONUS).min(MAX_TICK_RATE)
    } else if score < profile.avg_score * 0.8 {
        base.saturating_sub(RELIEF_DROP).max(MIN_TICK_RATE)
    } else {
        base
    };

    Difficulty {
        tick_rate,
        power_up_frequency: power_up_frequency(skill),
        skill,
    }
}

const fn base_tick_rate(skill: SkillTier) -> u32 {
    match skill {
        SkillTier::Beginner => 8,
        SkillTier::Intermediate => 12,
        SkillTier::Advanced => 16,
        SkillTier::Expert => 20,
    }
}

const fn power_up_frequency(skill: SkillTier) -> f64 {
    match skill {
        SkillTier::Beginner => 0.4,
        SkillTier::Expert => 0.2,
        SkillTier::Intermediate | SkillTier::Advanced => 0.3,
    }
}
