mod config;

pub use config::{Config, RunDefaults, SoundConfig};

use std::path::PathBuf;

/// Directory holding the application configuration file.
pub(crate) fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("metronomo")
}
