//! Game settings
//!
//! Physics tuning and course generation knobs, stored as JSON next to the
//! binary. Missing fields fall back to the compiled-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Errors raised while reading or writing a settings file
#[derive(Debug)]
pub enum SettingsError {
    /// File system error
    Io(std::io::Error),
    /// Malformed or mistyped JSON
    Json(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Player movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Magnitude of the tilt pull
    pub gravity: f32,
    /// Velocity multiplier per tick (< 1)
    pub damping: f32,
    /// Half-width of the "device is flat" band on the screen axes
    pub noise_band: f32,
    /// Player box edge length
    pub player_size: f32,
    /// Per-side shrink of the player box when testing hitboxes
    pub player_inset: f32,
    /// Distance beyond the edge where the player re-enters a tile
    pub entry_offset: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: consts::GRAVITY,
            damping: consts::DAMPING,
            noise_band: consts::NOISE_BAND,
            player_size: consts::PLAYER_SIZE,
            player_inset: consts::PLAYER_INSET,
            entry_offset: consts::ENTRY_OFFSET,
        }
    }
}

/// Layout generation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSettings {
    /// Course time before finish segments may appear
    pub finish_after_secs: f32,
    /// Chance a regenerated tile becomes the finish once unlocked
    pub finish_chance: f64,
    /// Run seed
    pub seed: u64,
}

impl Default for CourseSettings {
    fn default() -> Self {
        Self {
            finish_after_secs: 30.0,
            finish_chance: 0.2,
            seed: 0x5eed_b0a2d,
        }
    }
}

/// All tunables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: Physics,
    pub course: CourseSettings,
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings as pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from `path`
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is absent or bad
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
