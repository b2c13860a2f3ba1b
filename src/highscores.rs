//! High score tracking
//!
//! Persisted as a small JSON file. Writes are compare-and-write: a stored
//! value is only ever replaced by a larger one.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::sim::RunObserver;

/// Best score seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Record a live score; returns true if it set a new best
    pub fn observe(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from disk, starting fresh on any failure
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(high) => {
                log::info!("Loaded high score {} from {}", high.best, path.display());
                high
            }
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, PersistenceError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write `best` unless the stored value is already at least as large.
    ///
    /// Returns whether the file was written. A missing or corrupt file counts
    /// as zero.
    pub fn persist(&self, path: &Path) -> Result<bool, PersistenceError> {
        let stored = match Self::try_load(path) {
            Ok(stored) => stored.best,
            Err(PersistenceError::Io(e)) if e.kind() != std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::Io(e));
            }
            Err(_) => 0,
        };
        if self.best <= stored {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("High score {} saved (was {})", self.best, stored);
        Ok(true)
    }
}

/// Score display plus high-score bookkeeping, driven by run notifications
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    /// Score of the current run
    pub score: u64,
    pub high: HighScore,
    /// Set on death until the owner persists
    pending_save: bool,
}

impl Scoreboard {
    pub fn new(high: HighScore) -> Self {
        Self {
            score: 0,
            high,
            pending_save: false,
        }
    }

    /// Returns true once per death
    pub fn take_pending_save(&mut self) -> bool {
        std::mem::take(&mut self.pending_save)
    }
}

impl RunObserver for Scoreboard {
    fn on_score_increment(&mut self) {
        self.score += 1;
        self.high.observe(self.score);
    }

    fn on_run_reset(&mut self) {
        self.score = 0;
    }

    fn on_death(&mut self, final_score: u64) {
        self.high.observe(final_score);
        self.pending_save = true;
    }
}
