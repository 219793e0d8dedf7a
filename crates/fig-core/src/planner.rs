//! Dependency planning
//!
//! The planner walks `include` modifiers outward from a root descriptor,
//! fetching each package version from a [`Repository`] once, and returns the
//! reachable configurations in the order they must be applied: every
//! configuration comes after everything it includes.
//!
//! A package may appear in the closure at only one version. Asking for a
//! second version aborts the walk with a [`VersionConflict`] carrying the
//! paths to both requests. Include cycles are detected once the closure is
//! complete.

use crate::backtrace::Backtrace;
use crate::descriptor::Descriptor;
use crate::graph::{self, Node};
use crate::package::{Modifier, Package};
use crate::repository::Repository;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info};

mod error;

pub use error::{
    CyclicDependency, MissingConfig, PlanError, PlanResult, UnpinnedVersion, VersionConflict,
};

/// Resolves descriptors against a repository
#[derive(Clone, Copy)]
pub struct Planner<'r> {
    repository: &'r dyn Repository,
}

impl<'r> Planner<'r> {
    pub fn new(repository: &'r dyn Repository) -> Self {
        Self { repository }
    }

    /// Descriptors of every configuration reachable from `root`, dependencies
    /// first. Each descriptor names its configuration explicitly, so planning
    /// `foo/1.0` yields `foo/1.0:default` rather than the input itself.
    pub fn plan(&self, root: &Descriptor) -> PlanResult<Vec<Descriptor>> {
        Ok(self.resolve(root)?.descriptors())
    }

    /// Like [`Planner::plan`], keeping each configuration's modifiers and the
    /// path that first reached it
    pub fn resolve(&self, root: &Descriptor) -> PlanResult<Resolution> {
        info!(root = %root, "planning");

        let mut state = PlanState::new(self.repository);
        let root_index = state.visit(root, None, &Backtrace::root())?;
        let config_graph = state.graph;
        let root_node = ConfigRef {
            graph: &config_graph,
            index: root_index,
        };

        if let Some(members) = graph::find_cycles(root_node).into_iter().next() {
            let backtrace = members
                .first()
                .map(|member| member.node().backtrace.clone())
                .unwrap_or_default();
            return Err(CyclicDependency {
                cycle: members
                    .iter()
                    .map(|member| member.node().descriptor.clone())
                    .collect(),
                backtrace,
            }
            .into());
        }

        let configs: Vec<ResolvedConfig> = graph::sort(root_node)
            .into_iter()
            .map(|config| {
                let node = config.node();
                ResolvedConfig {
                    descriptor: node.descriptor.clone(),
                    modifiers: node.modifiers.clone(),
                    backtrace: node.backtrace.clone(),
                }
            })
            .collect();

        info!(root = %root, configs = configs.len(), "plan complete");
        Ok(Resolution { configs })
    }
}

/// A configuration selected by the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Fully qualified: package, version and configuration name
    pub descriptor: Descriptor,
    pub modifiers: Vec<Modifier>,
    /// The path that first reached this configuration
    pub backtrace: Backtrace,
}

/// Every configuration reachable from a root, dependencies first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    configs: Vec<ResolvedConfig>,
}

impl Resolution {
    pub fn descriptors(&self) -> Vec<Descriptor> {
        self.configs
            .iter()
            .map(|config| config.descriptor.clone())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedConfig> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl<'a> IntoIterator for &'a Resolution {
    type Item = &'a ResolvedConfig;
    type IntoIter = std::slice::Iter<'a, ResolvedConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Graph identity of a configuration: one node per package and config name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub package: String,
    pub config: String,
}

struct ConfigNode {
    key: NodeKey,
    descriptor: Descriptor,
    modifiers: Vec<Modifier>,
    backtrace: Backtrace,
    children: Vec<usize>,
}

#[derive(Default)]
struct ConfigGraph {
    nodes: Vec<ConfigNode>,
    index: HashMap<NodeKey, usize>,
}

#[derive(Clone, Copy)]
struct ConfigRef<'g> {
    graph: &'g ConfigGraph,
    index: usize,
}

impl<'g> ConfigRef<'g> {
    fn node(&self) -> &'g ConfigNode {
        &self.graph.nodes[self.index]
    }
}

impl Node for ConfigRef<'_> {
    type Id = NodeKey;

    fn id(&self) -> NodeKey {
        self.node().key.clone()
    }

    fn children(&self) -> Vec<Self> {
        self.node()
            .children
            .iter()
            .map(|&index| ConfigRef {
                graph: self.graph,
                index,
            })
            .collect()
    }
}

struct RegisteredPackage {
    package: Package,
    backtrace: Backtrace,
}

/// State for one `plan` call
struct PlanState<'r> {
    repository: &'r dyn Repository,
    packages: HashMap<String, RegisteredPackage>,
    graph: ConfigGraph,
}

impl<'r> PlanState<'r> {
    fn new(repository: &'r dyn Repository) -> Self {
        Self {
            repository,
            packages: HashMap::new(),
            graph: ConfigGraph::default(),
        }
    }

    fn visit(
        &mut self,
        descriptor: &Descriptor,
        parent: Option<&Descriptor>,
        backtrace: &Backtrace,
    ) -> PlanResult<usize> {
        let descriptor = match parent {
            Some(parent) => descriptor.relative_to(parent),
            None => descriptor.clone(),
        };
        let backtrace = backtrace.push(descriptor.clone());
        debug!(descriptor = %descriptor, depth = backtrace.len(), "visiting");

        let package = self.register(&descriptor, &backtrace)?;
        if descriptor.version().is_empty() {
            return Err(UnpinnedVersion {
                descriptor,
                backtrace,
            }
            .into());
        }

        let key = NodeKey {
            package: descriptor.package().to_string(),
            config: descriptor.effective_config().to_string(),
        };
        if let Some(&index) = self.graph.index.get(&key) {
            return Ok(index);
        }

        let Some(config) = package.find_config(&key.config) else {
            return Err(MissingConfig {
                descriptor,
                backtrace,
            }
            .into());
        };
        let modifiers = config.modifiers.clone();
        let descriptor = descriptor.with_effective_config();

        let index = self.graph.nodes.len();
        self.graph.nodes.push(ConfigNode {
            key: key.clone(),
            descriptor: descriptor.clone(),
            modifiers: modifiers.clone(),
            backtrace: backtrace.clone(),
            children: Vec::new(),
        });
        self.graph.index.insert(key, index);

        for include in modifiers.iter().filter_map(Modifier::as_include) {
            let child = self.visit(include, Some(&descriptor), &backtrace)?;
            self.graph.nodes[index].children.push(child);
        }

        Ok(index)
    }

    /// Register the descriptor's package version, fetching it on first sight
    fn register(&mut self, descriptor: &Descriptor, backtrace: &Backtrace) -> PlanResult<Package> {
        match self.packages.entry(descriptor.package().to_string()) {
            Entry::Occupied(entry) => {
                let registered = entry.get();
                if registered.package.version != descriptor.version() {
                    return Err(VersionConflict {
                        package: descriptor.package().to_string(),
                        first: registered.backtrace.clone(),
                        current: backtrace.clone(),
                    }
                    .into());
                }
                Ok(registered.package.clone())
            }
            Entry::Vacant(entry) => {
                debug!(
                    package = descriptor.package(),
                    version = descriptor.version(),
                    "fetching package"
                );
                let package = self
                    .repository
                    .resolve_package(descriptor.package(), descriptor.version())?;
                entry.insert(RegisteredPackage {
                    package: package.clone(),
                    backtrace: backtrace.clone(),
                });
                Ok(package)
            }
        }
    }
}
