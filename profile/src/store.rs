//! Durable storage for the player profile.
//!
//! The profile is a single flat record stored under one fixed path as
//! field-named JSON, so it stays human-inspectable and partial reads
//! of older records keep working. Writes always replace the whole
//! record; a half-written file is never observable.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::PlayerProfile;

/// Default file name for the persisted profile record.
pub const DEFAULT_FILE_NAME: &str = "snake_ai_data.json";

/// Failures surfaced by a profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying file could not be read or written.
    #[error("profile file error: {0}")]
    Io(#[from] io::Error),
    /// The stored record could not be parsed.
    #[error("profile record error: {0}")]
    Record(#[from] serde_json::Error),
}

/// Durable key-value storage for the single profile record.
pub trait ProfileStore {
    /// Loads the stored profile, or `None` when none was saved yet.
    fn load(&self) -> Result<Option<PlayerProfile>, StoreError>;

    /// Replaces the stored profile with the provided record.
    fn save(&mut self, profile: &PlayerProfile) -> Result<(), StoreError>;
}

/// File-backed store writing the profile as pretty-printed JSON.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store persisting to the provided path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the persisted record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<PlayerProfile>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        let profile = serde_json::from_str(&contents)?;
        Ok(Some(profile))
    }

    fn save(&mut self, profile: &PlayerProfile) -> Result<(), StoreError> {
        // Stage the whole record next to the target and rename it into
        // place, so a crash mid-write leaves the previous record
        // authoritative.
        let staging = self.staging_path();
        let encoded = serde_json::to_string_pretty(profile)?;
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(encoded.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}
