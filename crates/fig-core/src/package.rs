//! Parsed package definitions

use crate::descriptor::Descriptor;
use serde::{Deserialize, Serialize};

/// A published package version and its statements, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub statements: Vec<PackageStatement>,
}

/// Top-level statement of a package definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PackageStatement {
    /// `package foo/1.2.3`, restating the package name and version
    Name { package: String, version: String },
    /// `resource path`
    Resource { path: String },
    /// `archive path`
    Archive { path: String },
    /// `config name ... end`
    Config(Configuration),
}

/// A named, ordered list of modifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    pub modifiers: Vec<Modifier>,
}

/// A single effect applied by a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Modifier {
    /// Assign an environment variable
    Set { name: String, value: String },
    /// Append to a path-style environment variable
    Path { name: String, value: String },
    /// Apply another configuration first
    Include { descriptor: Descriptor },
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        statements: Vec<PackageStatement>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            statements,
        }
    }

    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> PackageBuilder {
        PackageBuilder {
            package: Package::new(name, version, Vec::new()),
        }
    }

    /// Descriptor of this package version with no configuration selected
    pub fn descriptor(&self) -> Descriptor {
        Descriptor::new(&self.name, &self.version, "")
    }

    /// Find a configuration block by name
    pub fn find_config(&self, name: &str) -> Option<&Configuration> {
        self.configs().find(|config| config.name == name)
    }

    /// All configuration blocks, in source order
    pub fn configs(&self) -> impl Iterator<Item = &Configuration> {
        self.statements.iter().filter_map(|statement| match statement {
            PackageStatement::Config(config) => Some(config),
            _ => None,
        })
    }
}

impl Configuration {
    pub fn new(name: impl Into<String>, modifiers: Vec<Modifier>) -> Self {
        Self {
            name: name.into(),
            modifiers,
        }
    }

    /// Targets of this configuration's `include` modifiers, in order
    pub fn includes(&self) -> impl Iterator<Item = &Descriptor> {
        self.modifiers.iter().filter_map(Modifier::as_include)
    }
}

impl Modifier {
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Modifier::Set {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn path(name: impl Into<String>, value: impl Into<String>) -> Self {
        Modifier::Path {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn include(descriptor: Descriptor) -> Self {
        Modifier::Include { descriptor }
    }

    pub fn as_include(&self) -> Option<&Descriptor> {
        match self {
            Modifier::Include { descriptor } => Some(descriptor),
            Modifier::Set { .. } | Modifier::Path { .. } => None,
        }
    }
}

/// Incremental construction of a [`Package`], mostly for tests and tooling
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    package: Package,
}

impl PackageBuilder {
    pub fn name(mut self, package: impl Into<String>, version: impl Into<String>) -> Self {
        self.package.statements.push(PackageStatement::Name {
            package: package.into(),
            version: version.into(),
        });
        self
    }

    pub fn resource(mut self, path: impl Into<String>) -> Self {
        self.package
            .statements
            .push(PackageStatement::Resource { path: path.into() });
        self
    }

    pub fn archive(mut self, path: impl Into<String>) -> Self {
        self.package
            .statements
            .push(PackageStatement::Archive { path: path.into() });
        self
    }

    pub fn config(
        mut self,
        name: impl Into<String>,
        build: impl FnOnce(ConfigBuilder) -> ConfigBuilder,
    ) -> Self {
        let builder = build(ConfigBuilder {
            config: Configuration::new(name, Vec::new()),
        });
        self.package
            .statements
            .push(PackageStatement::Config(builder.build()));
        self
    }

    pub fn build(self) -> Package {
        self.package
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Configuration,
}

impl ConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: Configuration::new(name, Vec::new()),
        }
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.modifiers.push(Modifier::set(name, value));
        self
    }

    pub fn path(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.modifiers.push(Modifier::path(name, value));
        self
    }

    pub fn include(mut self, descriptor: Descriptor) -> Self {
        self.config.modifiers.push(Modifier::include(descriptor));
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}
