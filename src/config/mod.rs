//! Configuration for the tracepath command-line tool.
//!
//! Settings are read from `~/.config/tracepath/config.toml`. Every field has
//! a default, so a partial file (or none at all) is fine.
//!
//! # Example
//!
//! ```
//! use tracepath::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.log_level, "warn");
//! assert!(!config.strict);
//!
//! let custom = Config {
//!     strict: true,
//!     ..Config::default()
//! };
//! assert!(custom.strict);
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration for the tracepath tool.
///
/// # Fields
///
/// * `log_level` - Default log filter when `RUST_LOG` is unset (default: "warn")
/// * `schema_file` - Schema document used by `build` and `check` when none is given
/// * `strict` - Fail when part of a path couldn't be checked against the schema (default: false)
/// * `show_tokens` - List the tokens of parsed paths (default: false)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter directive, e.g. "warn" or "tracepath=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default schema document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_file: Option<PathBuf>,

    /// Treat an unchecked path tail as an error
    #[serde(default)]
    pub strict: bool,

    /// List tokens when printing parsed paths
    #[serde(default)]
    pub show_tokens: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            schema_file: None,
            strict: false,
            show_tokens: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/tracepath/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("tracepath");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|err| {
            tracing::warn!(path = %config_path.display(), "Ignoring config file: {:#}", err);
            Self::default()
        })
    }

    /// Loads configuration from `path`, failing on unreadable or malformed files.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("strict = true").unwrap();
        assert!(config.strict);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.schema_file, None);
    }

    #[test]
    fn test_config_path_location() {
        if let Some(path) = Config::config_path() {
            assert!(path.ends_with(".config/tracepath/config.toml"));
        }
    }
}
