//! Applying a resolution to environment variables

use crate::package::Modifier;
use crate::planner::Resolution;
use std::collections::BTreeMap;

/// Separator between entries of path-style variables on this platform
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// A set of environment variables built up by applying configurations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    separator: char,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
            separator: PATH_SEPARATOR,
        }
    }

    /// Start from existing variables, such as the current process environment
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            separator: PATH_SEPARATOR,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Apply every configuration of a resolution, dependencies first
    pub fn apply(&mut self, resolution: &Resolution) {
        for config in resolution {
            self.apply_modifiers(&config.modifiers);
        }
    }

    pub fn apply_modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            match modifier {
                Modifier::Set { name, value } => {
                    self.vars.insert(name.clone(), value.clone());
                }
                Modifier::Path { name, value } => {
                    let entry = self.vars.entry(name.clone()).or_default();
                    if !entry.is_empty() {
                        entry.push(self.separator);
                    }
                    entry.push_str(value);
                }
                // Already expanded into the resolution
                Modifier::Include { .. } => {}
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn into_vars(self) -> BTreeMap<String, String> {
        self.vars
    }
}
