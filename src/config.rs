// src/config.rs - Session configuration, fixed for the lifetime of a run
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// All tunable parameters of the note pipeline, with named typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Lowest note the pitch mapping can produce (A0 on a standard piano).
    pub min_note: i32,
    /// Highest note the pitch mapping can produce (C8).
    pub max_note: i32,
    /// Moving-average window for pitch and velocity smoothing.
    pub smoothing_window: usize,
    /// Minimum absolute smoothed-pitch difference before the sounding note
    /// is replaced. Raise to reduce sensitivity.
    pub note_change_threshold: i32,
    /// Grace period after hand tracking is lost before the sounding note is
    /// forcibly stopped.
    pub idle_timeout_secs: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            min_note: 21,
            max_note: 108,
            smoothing_window: 8,
            note_change_threshold: 6,
            idle_timeout_secs: 0.1,
        }
    }
}

/// Malformed configuration is a setup-time precondition violation, rejected
/// before the session starts rather than tolerated mid-stream.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_note ({min}) must be strictly below max_note ({max})")]
    InvertedNoteRange { min: i32, max: i32 },
    #[error("note {0} is outside the MIDI range 0..=127")]
    NoteOutOfRange(i32),
    #[error("smoothing_window must be at least 1")]
    EmptySmoothingWindow,
    #[error("note_change_threshold must be at least 1")]
    NonPositiveThreshold,
    #[error("idle_timeout_secs must be positive and finite")]
    BadIdleTimeout,
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=127).contains(&self.min_note) {
            return Err(ConfigError::NoteOutOfRange(self.min_note));
        }
        if !(0..=127).contains(&self.max_note) {
            return Err(ConfigError::NoteOutOfRange(self.max_note));
        }
        if self.min_note >= self.max_note {
            return Err(ConfigError::InvertedNoteRange {
                min: self.min_note,
                max: self.max_note,
            });
        }
        if self.smoothing_window == 0 {
            return Err(ConfigError::EmptySmoothingWindow);
        }
        if self.note_change_threshold < 1 {
            return Err(ConfigError::NonPositiveThreshold);
        }
        if !self.idle_timeout_secs.is_finite() || self.idle_timeout_secs <= 0.0 {
            return Err(ConfigError::BadIdleTimeout);
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.idle_timeout_secs)
    }

    /// Load and validate a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SynthConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }
}
