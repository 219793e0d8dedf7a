//! Project Configuration (fig.toml)
//!
//! Handles project-level configuration stored in `fig.toml`. A project file
//! accepts the same sections as the global file and overrides it.

use crate::global::{read_toml, validate_sections, LogSection, OutputSection, RepositorySection};
use crate::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched for when locating a project
pub const PROJECT_FILE: &str = "fig.toml";

/// Project configuration from fig.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositorySection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSection>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let config: Self = read_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        validate_sections(self.repository.as_ref(), self.log.as_ref())
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
