//! Package storage
//!
//! The planner only ever asks a repository for one package version at a
//! time. Two implementations are provided: an in-memory store used by tests
//! and embedders, and a directory tree of `package.fig` definitions.

use crate::descriptor::Descriptor;
use crate::package::Package;
use crate::parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileRepository;
pub use memory::MemoryRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Package not found: {package}/{version}")]
    PackageNotFound { package: String, version: String },

    #[error("Invalid package name: {package}/{version}")]
    InvalidName { package: String, version: String },

    #[error("Package already published: {package}/{version}")]
    AlreadyPublished { package: String, version: String },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Read access to published packages
pub trait Repository {
    /// Load the package published under exactly this name and version
    fn resolve_package(&self, package: &str, version: &str) -> RepositoryResult<Package>;

    /// Every published package version, sorted, with no configuration selected
    fn list_packages(&self) -> RepositoryResult<Vec<Descriptor>>;
}

impl<R: Repository + ?Sized> Repository for &R {
    fn resolve_package(&self, package: &str, version: &str) -> RepositoryResult<Package> {
        (**self).resolve_package(package, version)
    }

    fn list_packages(&self) -> RepositoryResult<Vec<Descriptor>> {
        (**self).list_packages()
    }
}
