//! Game timing settings
//!
//! Persisted as JSON. Every field has a default so partial files load.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load, save or accept a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Timing and difficulty tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ticks per second of the fixed-rate loop
    pub tick_rate_hz: u32,
    /// Number of countdown stages (one per second)
    pub countdown_secs: u8,
    /// Spawn interval divisor applied to the difficulty counter
    pub base_speed: u32,
    /// Difficulty floor is the starting counter divided by this
    pub difficulty_floor_divisor: u32,
    /// Give up on the peer handshake after this long (None waits forever)
    pub handshake_timeout_secs: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 1000,
            countdown_secs: 3,
            base_speed: 2,
            difficulty_floor_divisor: 10,
            handshake_timeout_secs: Some(10),
        }
    }
}

impl Settings {
    /// Length of the pre-round countdown in ticks
    pub fn countdown_ticks(&self) -> u32 {
        self.countdown_secs as u32 * self.tick_rate_hz
    }

    /// Handshake timeout in ticks
    pub fn handshake_timeout_ticks(&self) -> Option<u32> {
        self.handshake_timeout_secs
            .map(|secs| secs.saturating_mul(self.tick_rate_hz))
    }

    /// Difficulty counter value at round start
    pub fn difficulty_start(&self) -> u32 {
        self.tick_rate_hz
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_rate_hz",
                reason: "must be positive",
            });
        }
        if self.countdown_secs == 0 || self.countdown_secs > 9 {
            return Err(SettingsError::Invalid {
                field: "countdown_secs",
                reason: "must be a single digit between 1 and 9",
            });
        }
        if self.base_speed == 0 {
            return Err(SettingsError::Invalid {
                field: "base_speed",
                reason: "must be positive",
            });
        }
        if self.difficulty_floor_divisor == 0 || self.difficulty_floor_divisor > self.tick_rate_hz
        {
            return Err(SettingsError::Invalid {
                field: "difficulty_floor_divisor",
                reason: "must be between 1 and tick_rate_hz",
            });
        }
        if self.handshake_timeout_secs == Some(0) {
            return Err(SettingsError::Invalid {
                field: "handshake_timeout_secs",
                reason: "must be positive or null",
            });
        }
        Ok(())
    }

    /// Load and validate settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_device_timing() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.countdown_ticks(), 3000);
        assert_eq!(settings.difficulty_start(), 1000);
        assert_eq!(settings.handshake_timeout_ticks(), Some(10_000));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"base_speed": 4}"#).unwrap();
        assert_eq!(settings.base_speed, 4);
        assert_eq!(settings.tick_rate_hz, 1000);
    }

    #[test]
    fn test_null_timeout_waits_forever() {
        let settings: Settings =
            serde_json::from_str(r#"{"handshake_timeout_secs": null}"#).unwrap();
        assert_eq!(settings.handshake_timeout_ticks(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_speed() {
        let settings = Settings {
            base_speed: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "base_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir()
            .join(format!("mine-drop-settings-{}.json", std::process::id()));
        let settings = Settings {
            tick_rate_hz: 500,
            handshake_timeout_secs: None,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/nonexistent/mine-drop.json");
        assert!(matches!(Settings::load_from(path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(Some(path)), Settings::default());
    }
}
