use super::{Repository, RepositoryError, RepositoryResult};
use crate::descriptor::Descriptor;
use crate::package::Package;
use std::collections::BTreeMap;

/// Packages held in memory, keyed by name and version
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    packages: BTreeMap<(String, String), Package>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a package, replacing any previous definition of the same version
    pub fn publish(&mut self, package: Package) {
        self.packages
            .insert((package.name.clone(), package.version.clone()), package);
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.publish(package);
        self
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl Repository for MemoryRepository {
    fn resolve_package(&self, package: &str, version: &str) -> RepositoryResult<Package> {
        self.packages
            .get(&(package.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| RepositoryError::PackageNotFound {
                package: package.to_string(),
                version: version.to_string(),
            })
    }

    fn list_packages(&self) -> RepositoryResult<Vec<Descriptor>> {
        Ok(self
            .packages
            .keys()
            .map(|(name, version)| Descriptor::new(name, version, ""))
            .collect())
    }
}
