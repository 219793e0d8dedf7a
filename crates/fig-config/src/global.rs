//! Global Configuration (~/.fig/config.toml)
//!
//! Handles user-level configuration stored in `~/.fig/config.toml`. The
//! section types defined here are shared with the project configuration.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the home directory holding fig's own files
pub const GLOBAL_DIR: &str = ".fig";

/// Global user configuration from ~/.fig/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Local package repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositorySection>,

    /// Logging settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogSection>,

    /// Output preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSection>,
}

/// `[repository]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RepositorySection {
    /// Repository root; relative paths are resolved against the directory
    /// holding the configuration file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// `[log]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// One of "trace", "debug", "info", "warn", "error"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// `[output]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Print plans as JSON by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let config: Self = read_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        validate_sections(self.repository.as_ref(), self.log.as_ref())
    }

    /// Get the global config file path (~/.fig/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        Ok(Self::global_dir()?.join("config.toml"))
    }

    /// Get the global directory (~/.fig)
    pub fn global_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(GLOBAL_DIR))
    }

    pub fn repository_path(&self) -> Option<&Path> {
        self.repository.as_ref().and_then(|r| r.path.as_deref())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_output(&self) -> Option<bool> {
        self.output.as_ref().and_then(|o| o.json)
    }
}

pub(crate) fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::IoError(e)
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        file: path.to_path_buf(),
        error: e,
    })
}

pub(crate) fn validate_sections(
    repository: Option<&RepositorySection>,
    log: Option<&LogSection>,
) -> ConfigResult<()> {
    if let Some(path) = repository.and_then(|r| r.path.as_ref()) {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "repository.path".to_string(),
                reason: "path cannot be empty".to_string(),
            });
        }
    }

    if let Some(level) = log.and_then(|l| l.level.as_deref()) {
        if !is_valid_level(level) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                reason: format!(
                    "must be 'trace', 'debug', 'info', 'warn' or 'error', got '{}'",
                    level
                ),
            });
        }
    }

    Ok(())
}

fn is_valid_level(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}
