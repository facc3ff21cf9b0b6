//! Local student profile persistence.
//!
//! A single JSON file under the platform config dir, loaded once at startup
//! and saved when onboarding completes. Absence or corruption degrades to
//! "no profile" so the onboarding wizard runs again.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MentorError, Result};
use crate::types::UserProfile;

/// Load/save access to the profile file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| MentorError::Config("no config directory on this platform".into()))?;
        Ok(Self::new(dir.join("mentoria").join("profile.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored profile; missing or unreadable files yield `None`
    pub fn load(&self) -> Option<UserProfile> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "ignoring corrupt profile file");
                None
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(profile)?)?;
        Ok(())
    }
}
