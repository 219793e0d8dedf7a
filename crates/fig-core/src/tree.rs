//! Include trees, as opposed to flattened plans
//!
//! A plan answers "what gets applied"; the functions here answer "who
//! includes whom". They walk the repository without registering versions, so
//! they still work on graphs that would fail to plan.

use crate::backtrace::Backtrace;
use crate::descriptor::Descriptor;
use crate::planner::{MissingConfig, PlanResult};
use crate::repository::Repository;
use std::fmt::Write;
use tracing::debug;

/// The include targets of one configuration, made relative to `descriptor`
pub fn direct_dependencies(
    repository: &dyn Repository,
    descriptor: &Descriptor,
) -> PlanResult<Vec<Descriptor>> {
    let package = repository.resolve_package(descriptor.package(), descriptor.version())?;
    let config = package
        .find_config(descriptor.effective_config())
        .ok_or_else(|| MissingConfig {
            descriptor: descriptor.clone(),
            backtrace: Backtrace::root().push(descriptor.clone()),
        })?;

    Ok(config
        .includes()
        .map(|include| include.relative_to(descriptor))
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEntry {
    /// Expanded from the repository
    Resolved,
    /// No version to look up
    Unresolved,
    /// Already on the path from the root
    Cycle,
}

/// One descriptor and everything it includes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTree {
    pub descriptor: Descriptor,
    pub entry: TreeEntry,
    pub children: Vec<DependencyTree>,
}

impl DependencyTree {
    pub fn build(repository: &dyn Repository, root: &Descriptor) -> PlanResult<Self> {
        let mut path = Vec::new();
        Self::expand(repository, root.clone(), &mut path)
    }

    fn leaf(descriptor: Descriptor, entry: TreeEntry) -> Self {
        Self {
            descriptor,
            entry,
            children: Vec::new(),
        }
    }

    fn expand(
        repository: &dyn Repository,
        descriptor: Descriptor,
        path: &mut Vec<Descriptor>,
    ) -> PlanResult<Self> {
        if descriptor.version().is_empty() {
            return Ok(Self::leaf(descriptor, TreeEntry::Unresolved));
        }
        let qualified = descriptor.with_effective_config();
        if path.contains(&qualified) {
            debug!(descriptor = %descriptor, "include cycle in tree");
            return Ok(Self::leaf(descriptor, TreeEntry::Cycle));
        }

        path.push(qualified);
        let mut children = Vec::new();
        for child in direct_dependencies(repository, &descriptor)? {
            children.push(Self::expand(repository, child, path)?);
        }
        path.pop();

        Ok(Self {
            descriptor,
            entry: TreeEntry::Resolved,
            children,
        })
    }

    /// One line per entry, indented two spaces per level
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let marker = match self.entry {
            TreeEntry::Resolved => "",
            TreeEntry::Unresolved => "...",
            TreeEntry::Cycle => " (cycle)",
        };
        let _ = writeln!(out, "{}{}{}", "  ".repeat(depth), self.descriptor, marker);
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}
