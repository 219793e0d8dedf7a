use super::{Repository, RepositoryError, RepositoryResult};
use crate::descriptor::Descriptor;
use crate::package::Package;
use crate::{parser, unparser};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// File name of a package definition inside its version directory
pub const DEFINITION_FILE: &str = "package.fig";

/// Definition file name used by older repositories
const LEGACY_DEFINITION_FILE: &str = ".fig";

/// Repository stored as `<root>/<package>/<version>/package.fig`
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one package version
    pub fn package_dir(&self, package: &str, version: &str) -> PathBuf {
        self.root.join(package).join(version)
    }

    /// Write a package definition, refusing to replace an existing version
    pub fn publish(&self, package: &Package) -> RepositoryResult<PathBuf> {
        if !is_path_segment(&package.name) || !is_path_segment(&package.version) {
            return Err(RepositoryError::InvalidName {
                package: package.name.clone(),
                version: package.version.clone(),
            });
        }

        let dir = self.package_dir(&package.name, &package.version);
        fs::create_dir_all(&dir).map_err(|source| RepositoryError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(DEFINITION_FILE);
        let io_error = |source: io::Error| RepositoryError::Io {
            path: path.clone(),
            source,
        };

        // The definition only appears under its final name once fully written
        let mut file = NamedTempFile::new_in(&dir).map_err(io_error)?;
        file.write_all(unparser::unparse_package(package).as_bytes())
            .and_then(|()| file.flush())
            .map_err(io_error)?;
        match file.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RepositoryError::AlreadyPublished {
                    package: package.name.clone(),
                    version: package.version.clone(),
                });
            }
            Err(e) => return Err(io_error(e.error)),
        }

        debug!(package = %package.descriptor(), path = %path.display(), "published package");
        Ok(path)
    }

    fn read_definition(&self, dir: &Path) -> RepositoryResult<Option<(PathBuf, String)>> {
        for name in [DEFINITION_FILE, LEGACY_DEFINITION_FILE] {
            let path = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(text) => return Ok(Some((path, text))),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(RepositoryError::Io { path, source }),
            }
        }
        Ok(None)
    }

    fn sorted_subdirs(&self, dir: &Path) -> RepositoryResult<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(RepositoryError::Io {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RepositoryError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

impl Repository for FileRepository {
    fn resolve_package(&self, package: &str, version: &str) -> RepositoryResult<Package> {
        let not_found = || RepositoryError::PackageNotFound {
            package: package.to_string(),
            version: version.to_string(),
        };
        if !is_path_segment(package) || !is_path_segment(version) {
            return Err(not_found());
        }

        let dir = self.package_dir(package, version);
        let (path, text) = self.read_definition(&dir)?.ok_or_else(not_found)?;
        debug!(path = %path.display(), "reading package definition");

        let source = path.display().to_string();
        Ok(parser::parse_package(&source, package, version, &text)?)
    }

    fn list_packages(&self) -> RepositoryResult<Vec<Descriptor>> {
        let mut descriptors = Vec::new();
        for package in self.sorted_subdirs(&self.root)? {
            let package_dir = self.root.join(&package);
            for version in self.sorted_subdirs(&package_dir)? {
                let dir = package_dir.join(&version);
                if dir.join(DEFINITION_FILE).exists() || dir.join(LEGACY_DEFINITION_FILE).exists() {
                    descriptors.push(Descriptor::new(&package, &version, ""));
                }
            }
        }
        Ok(descriptors)
    }
}

/// Names map straight onto directories, so they must be a single plain segment
fn is_path_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
