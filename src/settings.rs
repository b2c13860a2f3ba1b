//! Runtime settings for the headless driver
//!
//! Loaded from a JSON file next to the binary. Missing fields take their
//! defaults; a missing or malformed file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SUBSTEPS;
use crate::error::PersistenceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed run seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Where the best score is kept
    pub highscore_path: PathBuf,
    /// Ticks the driver simulates before giving up
    pub demo_ticks: u64,
    /// Cap on fixed ticks per rendered frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            highscore_path: PathBuf::from("highscore.json"),
            demo_ticks: 6_000,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    pub const DEFAULT_PATH: &'static str = "cave-runner.json";

    /// Load settings, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, PersistenceError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// The configured seed, or a fresh one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}
