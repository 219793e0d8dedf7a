//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{ProjectConfig, PROJECT_FILE};
use crate::ConfigResult;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the repository directory
pub const REPOSITORY_ENV: &str = "FIG_REPOSITORY";

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FIG_LOG";

/// Repository directory name under ~/.fig when nothing else is configured
pub const DEFAULT_REPOSITORY_DIR: &str = "repos";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.fig/config.toml) - lowest priority
/// 2. Project config (./fig.toml) - overrides global
/// 3. Environment variables (FIG_*) - overrides project
/// 4. CLI flags - highest priority, see [`Config::apply_overrides`]
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Values taken from the environment or the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub repository: Option<PathBuf>,
    pub log: Option<String>,
    pub json: Option<bool>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,

    /// Directory holding the global config file
    pub global_dir: Option<PathBuf>,

    /// Project root directory (where fig.toml was found)
    pub project_root: Option<PathBuf>,

    /// Environment variables, then CLI flags on top
    pub overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the global configuration from `path` instead of ~/.fig/config.toml
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find fig.toml, then loads the global
    /// config if it exists and applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let global = self.load_global_config()?;
        let global_dir = self
            .global_config_path
            .as_ref()
            .and_then(|path| path.parent())
            .map(Path::to_path_buf);

        Ok(Config {
            project,
            global,
            global_dir,
            project_root,
            overrides: Self::env_overrides(),
        })
    }

    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        for dir in start_dir.ancestors() {
            let config_path = dir.join(PROJECT_FILE);
            if config_path.is_file() {
                debug!(path = %config_path.display(), "loading project config");
                let project = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(dir.to_path_buf()), project));
            }
        }
        Ok((None, ProjectConfig::default()))
    }

    /// Load global configuration, which is optional
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        if !path.is_file() {
            return Ok(GlobalConfig::default());
        }

        debug!(path = %path.display(), "loading global config");
        GlobalConfig::load_from_file(&path)
    }

    fn env_overrides() -> Overrides {
        Overrides {
            repository: env::var_os(REPOSITORY_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            log: env::var(LOG_ENV).ok().filter(|value| !value.is_empty()),
            json: None,
        }
    }
}

impl Config {
    /// Layer command-line values over everything else
    pub fn apply_overrides(&mut self, cli: Overrides) {
        if cli.repository.is_some() {
            self.overrides.repository = cli.repository;
        }
        if cli.log.is_some() {
            self.overrides.log = cli.log;
        }
        if cli.json.is_some() {
            self.overrides.json = cli.json;
        }
    }

    /// The repository directory to use
    ///
    /// Relative paths in a config file are resolved against the directory
    /// holding that file. Falls back to ~/.fig/repos.
    pub fn repository_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.overrides.repository {
            return Ok(path.clone());
        }
        if let (Some(path), Some(root)) = (self.project.repository_path(), &self.project_root) {
            return Ok(root.join(path));
        }
        if let Some(path) = self.global.repository_path() {
            return Ok(match &self.global_dir {
                Some(dir) => dir.join(path),
                None => path.to_path_buf(),
            });
        }
        let dir = match &self.global_dir {
            Some(dir) => dir.clone(),
            None => GlobalConfig::global_dir()?,
        };
        Ok(dir.join(DEFAULT_REPOSITORY_DIR))
    }

    /// The log filter to install, if any source sets one
    pub fn log_filter(&self) -> Option<&str> {
        self.overrides
            .log
            .as_deref()
            .or_else(|| self.project.log_level())
            .or_else(|| self.global.log_level())
    }

    /// Whether plans are printed as JSON by default
    pub fn json_output(&self) -> bool {
        self.overrides
            .json
            .or_else(|| self.project.json_output())
            .or_else(|| self.global.json_output())
            .unwrap_or(false)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has fig.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
