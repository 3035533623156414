//! TOML-based application configuration.
//!
//! Stores the default run parameters and sound preference at
//! `~/.config/metronomo/config.toml`. Every field has a serde default so
//! a partial or missing file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config_dir;
use crate::error::ConfigError;
use crate::metronome::RunConfig;

/// Default run parameters, used when the CLI flags leave them unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDefaults {
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    #[serde(default = "default_beats_per_cycle")]
    pub beats_per_cycle: u32,
    #[serde(default = "default_bpm")]
    pub bpm: u32,
    #[serde(default)]
    pub breath: bool,
}

/// Sound configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/metronomo/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: RunDefaults,
    #[serde(default)]
    pub sound: SoundConfig,
}

impl Config {
    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        Self::load_from(&Self::path()).unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| save_failed(e.to_string()))?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| save_failed(e.to_string()))
    }

    /// Stored defaults as an engine run configuration.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            total_cycles: self.defaults.cycles,
            beats_per_cycle: self.defaults.beats_per_cycle,
            bpm: self.defaults.bpm,
            breath_enabled: self.defaults.breath,
        }
    }

    /// Read a value by dotted key, e.g. `defaults.bpm`.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "defaults.cycles" => Ok(self.defaults.cycles.to_string()),
            "defaults.beats_per_cycle" => Ok(self.defaults.beats_per_cycle.to_string()),
            "defaults.bpm" => Ok(self.defaults.bpm.to_string()),
            "defaults.breath" => Ok(self.defaults.breath.to_string()),
            "sound.enabled" => Ok(self.sound.enabled.to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Write a value by dotted key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "defaults.cycles" => self.defaults.cycles = parse_u32(key, value)?,
            "defaults.beats_per_cycle" => self.defaults.beats_per_cycle = parse_u32(key, value)?,
            "defaults.bpm" => self.defaults.bpm = parse_u32(key, value)?,
            "defaults.breath" => self.defaults.breath = parse_bool(key, value)?,
            "sound.enabled" => self.sound.enabled = parse_bool(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// All keys and their current values, for `config list`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("defaults.cycles", self.defaults.cycles.to_string()),
            (
                "defaults.beats_per_cycle",
                self.defaults.beats_per_cycle.to_string(),
            ),
            ("defaults.bpm", self.defaults.bpm.to_string()),
            ("defaults.breath", self.defaults.breath.to_string()),
            ("sound.enabled", self.sound.enabled.to_string()),
        ]
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected a non-negative integer, got '{value}'"),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected 'true' or 'false', got '{value}'"),
    })
}

// --- Default value functions for serde ---

fn default_cycles() -> u32 {
    4
}

fn default_beats_per_cycle() -> u32 {
    4
}

fn default_bpm() -> u32 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            cycles: default_cycles(),
            beats_per_cycle: default_beats_per_cycle(),
            bpm: default_bpm(),
            breath: false,
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: RunDefaults::default(),
            sound: SoundConfig::default(),
        }
    }
}
