//! Driver settings with persistence
//!
//! Settings are read from `$MOCHA_CONFIG` or `~/.config/mocha/settings.toml`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use mocha_core::TimeConfig;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the settings path
pub const CONFIG_ENV: &str = "MOCHA_CONFIG";

/// All driver settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub time: TimeConfig,
    pub driver: DriverSettings,
}

/// Where the settings came from
///
/// `Defaults` carries the reason the file could not be used. Settings are
/// loaded before the subscriber exists, so the caller logs it.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsSource {
    File(PathBuf),
    Defaults(String),
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsSource::File(path) => write!(f, "{}", path.display()),
            SettingsSource::Defaults(reason) => write!(f, "defaults ({reason})"),
        }
    }
}

impl Settings {
    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|p| p.join("mocha").join("settings.toml"))
    }

    /// Load settings from disk, falling back to defaults when the file is
    /// missing or unreadable. Settings that parse but fail validation are an
    /// error.
    pub fn load() -> anyhow::Result<(Self, SettingsSource)> {
        let Some(path) = Self::settings_path() else {
            return Ok((
                Self::default(),
                SettingsSource::Defaults("could not determine config directory".into()),
            ));
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<(Self, SettingsSource)> {
        if !path.exists() {
            return Ok((
                Self::default(),
                SettingsSource::Defaults(format!("no settings file at {}", path.display())),
            ));
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return Ok((
                    Self::default(),
                    SettingsSource::Defaults(format!("failed to read settings: {e}")),
                ))
            }
        };

        let settings: Self = match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                return Ok((
                    Self::default(),
                    SettingsSource::Defaults(format!("failed to parse settings: {e}")),
                ))
            }
        };

        settings
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok((settings, SettingsSource::File(path.to_path_buf())))
    }

    /// Check every section for values the driver cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        self.time.validate().context("invalid [time] section")?;
        if self.driver.frame_delta.is_nan() || self.driver.frame_delta < 0.0 {
            anyhow::bail!("driver.frame_delta must be non-negative");
        }
        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Frame loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Number of frames to simulate
    pub frames: u32,
    /// Raw delta fed to the clock each frame (seconds)
    pub frame_delta: f32,
    /// Number of moving entities in the demo scene
    pub entities: u32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_delta: 1.0 / 60.0,
            entities: 1_000,
        }
    }
}
