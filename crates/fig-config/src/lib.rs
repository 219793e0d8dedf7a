//! Fig Configuration System
//!
//! Settings for the `fig` command-line tool:
//! - Global user configuration (~/.fig/config.toml)
//! - Project configuration (fig.toml, found by walking up from the
//!   working directory)
//!
//! # Configuration Hierarchy
//!
//! Configuration is merged in the following order (later overrides earlier):
//! 1. Global config (~/.fig/config.toml)
//! 2. Project config (./fig.toml)
//! 3. Environment variables (FIG_REPOSITORY, FIG_LOG)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use fig_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! let repository = config.repository_path().unwrap();
//! ```

pub mod global;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use global::{GlobalConfig, LogSection, OutputSection, RepositorySection};
pub use loader::{Config, ConfigLoader, Overrides};
pub use project::ProjectConfig;
