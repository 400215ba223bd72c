//! Configuration system for fieldwalk.
//!
//! This module provides the user configuration with sensible defaults and
//! support for serialization via serde. Configuration is loaded from a TOML
//! file and merged with command-line arguments, which take precedence.
//!
//! # Example
//!
//! ```
//! use fieldwalk::config::{Config, OutputFormat};
//!
//! let config = Config::default();
//! assert_eq!(config.output_format, OutputFormat::Text);
//! assert!(!config.show_missing);
//!
//! let custom = Config {
//!     show_missing: true,
//!     ..Config::default()
//! };
//! assert!(custom.show_missing);
//! ```

use serde::{Deserialize, Serialize};

use crate::file::loader::Format;

/// How the CLI prints observations and violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per result.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Configuration for the fieldwalk CLI.
///
/// # Fields
///
/// * `output_format` - Result format: "text" or "json" (default: "text")
/// * `show_missing` - Print not-found observations in `query` (default: false)
/// * `input_format` - Document format: "auto", "json" or "yaml" (default: "auto")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Result format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Print not-found observations in `query`
    #[serde(default)]
    pub show_missing: bool,

    /// Document format used when the command line does not force one
    #[serde(default)]
    pub input_format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            show_missing: false,
            input_format: Format::default(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/fieldwalk/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("fieldwalk");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("ignoring invalid config {}: {}", path.display(), err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
