//! Bridges session-end events to the durable profile.

use tracing::warn;

use retro_snake_core::{Event, SkillTier};

use crate::store::ProfileStore;
use crate::PlayerProfile;

/// Owns the process-wide profile and keeps it flushed.
///
/// Constructed once at host startup, the recorder is the only writer
/// of the profile: it folds each `Event::SessionEnded` into the record
/// and saves synchronously before returning, so the host can accept
/// the next reset knowing the statistics are durable. Load and save
/// failures are non-fatal and logged at warning level; after a failed
/// save the next successful one reflects the cumulative state.
#[derive(Debug)]
pub struct Recorder<S: ProfileStore> {
    profile: PlayerProfile,
    store: S,
}

impl<S: ProfileStore> Recorder<S> {
    /// Creates a recorder, loading the stored profile or falling back
    /// to a fresh one when the store is missing or corrupt.
    #[must_use]
    pub fn new(store: S) -> Self {
        let profile = match store.load() {
            Ok(Some(profile)) => profile,
            Ok(None) => PlayerProfile::new(),
            Err(error) => {
                warn!(%error, "could not load player profile, starting fresh");
                PlayerProfile::new()
            }
        };
        Self { profile, store }
    }

    /// Read-only access to the learned statistics.
    #[must_use]
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// Consumes world events, folding finished sessions into the
    /// profile and flushing each update.
    ///
    /// The provided `assess` closure supplies the skill classification
    /// stored alongside the statistics, keeping the tier in the
    /// persisted record current without this crate owning the tables.
    pub fn handle<F>(&mut self, events: &[Event], assess: F)
    where
        F: Fn(&PlayerProfile) -> SkillTier,
    {
        for event in events {
            if let Event::SessionEnded { summary } = event {
                self.profile.record_game(summary);
                self.profile.skill_tier = assess(&self.profile);
                if let Err(error) = self.store.save(&self.profile) {
                    warn!(%error, "could not save player profile");
                }
            }
        }
    }
}
