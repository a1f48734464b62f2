//! Runtime settings
//!
//! Read from an optional JSON file named by `BRICK_BREAKER_CONFIG`.
//! `BRICK_BREAKER_SEED` overrides the seed. Anything missing falls back to
//! the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TICK_RATE_HZ;

/// Environment variable holding the settings file path
pub const CONFIG_ENV: &str = "BRICK_BREAKER_CONFIG";
/// Environment variable overriding the RNG seed
pub const SEED_ENV: &str = "BRICK_BREAKER_SEED";

/// Accepted frame rates
const TICK_RATE_RANGE: std::ops::RangeInclusive<u32> = 10..=240;

/// Errors from reading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid seed {0:?}: expected an unsigned integer")]
    Seed(String),

    #[error("tick rate {0} Hz out of range (10-240)")]
    TickRate(u32),

    #[error("key hold window must be at least one tick")]
    KeyHold,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Fixed RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Simulation and render rate
    pub tick_rate_hz: u32,
    /// Ticks a single key press keeps a move direction held
    pub key_hold_ticks: u32,

    // === HUD ===
    /// Show the key help line
    pub show_help: bool,
    /// Show the best score of this process
    pub show_high_scores: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate_hz: TICK_RATE_HZ,
            key_hold_ticks: 8,
            show_help: true,
            show_high_scores: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from the environment: optional file, then seed override
    pub fn from_env() -> Result<Self, SettingsError> {
        let mut settings = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let settings = Self::from_file(Path::new(&path))?;
                log::info!("Loaded settings from {}", Path::new(&path).display());
                settings
            }
            None => Self::default(),
        };

        if let Ok(seed) = std::env::var(SEED_ENV) {
            settings.seed = Some(parse_seed(&seed)?);
        }
        Ok(settings)
    }

    /// Load from the environment, falling back to defaults on any error
    pub fn load() -> Self {
        match Self::from_env() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !TICK_RATE_RANGE.contains(&self.tick_rate_hz) {
            return Err(SettingsError::TickRate(self.tick_rate_hz));
        }
        if self.key_hold_ticks == 0 {
            return Err(SettingsError::KeyHold);
        }
        Ok(())
    }

    /// Frame duration for the configured rate
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.tick_rate_hz))
    }
}

fn parse_seed(raw: &str) -> Result<u64, SettingsError> {
    raw.trim()
        .parse()
        .map_err(|_| SettingsError::Seed(raw.to_string()))
}
