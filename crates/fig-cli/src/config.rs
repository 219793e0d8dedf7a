//! CLI configuration
//!
//! Merges fig.toml / ~/.fig/config.toml with environment variables and the
//! global command-line flags, then installs the log subscriber.

use anyhow::{Context, Result};
use fig_config::{ConfigLoader, Overrides};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Filter used when neither the environment nor a config file sets one
const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "debug";

/// Settings every command may need
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the package repository
    pub repository: PathBuf,
    /// Print plans as JSON unless told otherwise
    pub default_json: bool,
    /// Log filter directive
    pub log_filter: String,
}

impl Config {
    /// Load configuration for the current directory, with CLI flags on top
    pub fn load(repository: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to determine current directory")?;
        let mut config = ConfigLoader::new()
            .load_from_directory(&cwd)
            .context("Failed to load fig configuration")?;

        config.apply_overrides(Overrides {
            repository,
            log: verbose.then(|| VERBOSE_FILTER.to_string()),
            json: None,
        });

        Ok(Self {
            repository: config.repository_path()?,
            default_json: config.json_output(),
            log_filter: config.log_filter().unwrap_or(DEFAULT_FILTER).to_string(),
        })
    }

    /// Install the log subscriber; RUST_LOG takes precedence when set
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }
}
