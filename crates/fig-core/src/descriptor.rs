//! Package/version/configuration references

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::parser::{self, ParseError};

/// Name of the configuration used when a descriptor leaves it out
pub const DEFAULT_CONFIG: &str = "default";

/// A reference to one configuration of one package version.
///
/// Any segment may be empty: an empty version means "not pinned here", an
/// empty configuration means [`DEFAULT_CONFIG`], and an empty package name
/// (only meaningful inside an `include`) refers to the including package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Descriptor {
    package: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    config: String,
}

impl Descriptor {
    pub fn new(
        package: impl Into<String>,
        version: impl Into<String>,
        config: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            config: config.into(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    /// The configuration this descriptor selects, with the default filled in
    pub fn effective_config(&self) -> &str {
        if self.config.is_empty() {
            DEFAULT_CONFIG
        } else {
            &self.config
        }
    }

    /// Copy of this descriptor with the configuration name filled in
    pub fn with_effective_config(&self) -> Self {
        Self::new(&self.package, &self.version, self.effective_config())
    }

    /// Resolve an `include` target against the descriptor that includes it.
    ///
    /// A target without a package name (`:other`) refers to another
    /// configuration of the same package version.
    pub fn relative_to(&self, parent: &Descriptor) -> Self {
        if self.package.is_empty() {
            Self::new(&parent.package, &parent.version, &self.config)
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package)?;
        if !self.version.is_empty() {
            write!(f, "/{}", self.version)?;
        }
        if !self.config.is_empty() {
            write!(f, ":{}", self.config)?;
        }
        Ok(())
    }
}

impl FromStr for Descriptor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_descriptor(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Descriptor::new("foo", "1.2.3", "debug"), "foo/1.2.3:debug")]
    #[case(Descriptor::new("foo", "1.2.3", ""), "foo/1.2.3")]
    #[case(Descriptor::new("foo", "", "debug"), "foo:debug")]
    #[case(Descriptor::new("foo", "", ""), "foo")]
    #[case(Descriptor::new("", "", "debug"), ":debug")]
    fn test_display_omits_empty_segments(#[case] descriptor: Descriptor, #[case] expected: &str) {
        assert_eq!(descriptor.to_string(), expected);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Descriptor::new("foo", "1.0", "default");
        assert_eq!(a, Descriptor::new("foo", "1.0", "default"));
        assert_ne!(a, Descriptor::new("foo", "1.0", ""));
        assert_ne!(a, Descriptor::new("foo", "1.0.0", "default"));
    }

    #[test]
    fn test_effective_config() {
        assert_eq!(Descriptor::new("foo", "1.0", "").effective_config(), "default");
        assert_eq!(Descriptor::new("foo", "1.0", "debug").effective_config(), "debug");
        assert_eq!(
            Descriptor::new("foo", "1.0", "").with_effective_config(),
            Descriptor::new("foo", "1.0", "default")
        );
    }

    #[test]
    fn test_relative_to_fills_package_and_version() {
        let parent = Descriptor::new("foo", "1.0", "default");
        let sibling = Descriptor::new("", "", "debug").relative_to(&parent);
        assert_eq!(sibling, Descriptor::new("foo", "1.0", "debug"));

        let other = Descriptor::new("bar", "", "").relative_to(&parent);
        assert_eq!(other, Descriptor::new("bar", "", ""));
    }

    #[test]
    fn test_from_str() {
        let descriptor: Descriptor = "foo/1.2.3:debug".parse().unwrap();
        assert_eq!(descriptor, Descriptor::new("foo", "1.2.3", "debug"));
    }
}
