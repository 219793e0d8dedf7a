//! Planner failures and their diagnostic reports

use crate::backtrace::Backtrace;
use crate::descriptor::Descriptor;
use crate::repository::RepositoryError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    VersionConflict(#[from] VersionConflict),

    #[error(transparent)]
    CyclicDependency(#[from] CyclicDependency),

    #[error(transparent)]
    MissingConfig(#[from] MissingConfig),

    #[error(transparent)]
    UnpinnedVersion(#[from] UnpinnedVersion),
}

pub type PlanResult<T> = Result<T, PlanError>;

impl PlanError {
    /// Multi-line diagnostic including every backtrace the error carries
    pub fn report(&self) -> String {
        match self {
            PlanError::Repository(err) => format!("{}\n", err),
            PlanError::VersionConflict(conflict) => conflict.report(),
            PlanError::CyclicDependency(cycle) => cycle.report(),
            PlanError::MissingConfig(missing) => missing.report(),
            PlanError::UnpinnedVersion(unpinned) => unpinned.report(),
        }
    }

    /// The path through which the planner reached the failing descriptor
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            PlanError::Repository(_) => None,
            PlanError::VersionConflict(conflict) => Some(&conflict.current),
            PlanError::CyclicDependency(cycle) => Some(&cycle.backtrace),
            PlanError::MissingConfig(missing) => Some(&missing.backtrace),
            PlanError::UnpinnedVersion(unpinned) => Some(&unpinned.backtrace),
        }
    }
}

/// Two paths through the graph asked for different versions of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub package: String,
    /// The path that first registered the package
    pub first: Backtrace,
    /// The path that asked for the other version
    pub current: Backtrace,
}

impl VersionConflict {
    fn version(trace: &Backtrace) -> &str {
        trace.head().map_or("", Descriptor::version)
    }

    pub fn first_version(&self) -> &str {
        Self::version(&self.first)
    }

    pub fn current_version(&self) -> &str {
        Self::version(&self.current)
    }

    pub fn report(&self) -> String {
        format!(
            "{}\nfirst reached through:{}then reached through:{}",
            self, self.first, self.current
        )
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Version conflict for package '{}': '{}' and '{}' are both required",
            self.package,
            self.first_version(),
            self.current_version()
        )
    }
}

impl std::error::Error for VersionConflict {}

/// Configurations that include each other, directly or indirectly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicDependency {
    /// Members of the cycle, starting where the cycle was entered
    pub cycle: Vec<Descriptor>,
    /// How the planner first reached the first member
    pub backtrace: Backtrace,
}

impl CyclicDependency {
    pub fn report(&self) -> String {
        format!("{}\nreached through:{}", self, self.backtrace)
    }
}

impl fmt::Display for CyclicDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cyclic dependency: ")?;
        for descriptor in &self.cycle {
            write!(f, "{} -> ", descriptor)?;
        }
        match self.cycle.first() {
            Some(first) => write!(f, "{}", first),
            None => Ok(()),
        }
    }
}

impl std::error::Error for CyclicDependency {}

/// A descriptor named a configuration its package does not define
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingConfig {
    pub descriptor: Descriptor,
    pub backtrace: Backtrace,
}

impl MissingConfig {
    pub fn report(&self) -> String {
        format!("{}\nreached through:{}", self, self.backtrace)
    }
}

impl fmt::Display for MissingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration '{}' not found in package {}/{}",
            self.descriptor.effective_config(),
            self.descriptor.package(),
            self.descriptor.version()
        )
    }
}

impl std::error::Error for MissingConfig {}

/// A package was resolved without ever being pinned to a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpinnedVersion {
    pub descriptor: Descriptor,
    pub backtrace: Backtrace,
}

impl UnpinnedVersion {
    pub fn report(&self) -> String {
        format!("{}\nreached through:{}", self, self.backtrace)
    }
}

impl fmt::Display for UnpinnedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Package '{}' has no version; pin it with {}/<version>",
            self.descriptor.package(),
            self.descriptor.package()
        )
    }
}

impl std::error::Error for UnpinnedVersion {}
