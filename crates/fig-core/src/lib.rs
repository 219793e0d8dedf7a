//! Fig package configuration resolver
//!
//! Packages are published as `package.fig` definitions holding named
//! configurations. A configuration sets environment variables, extends
//! path-style variables and includes configurations of other packages. The
//! [`Planner`] expands a root descriptor into the ordered list of
//! configurations to apply, enforcing a single version per package and
//! rejecting include cycles.

pub mod backtrace;
pub mod descriptor;
pub mod environment;
pub mod graph;
pub mod package;
pub mod parser;
pub mod planner;
pub mod repository;
pub mod tree;
pub mod unparser;

pub use backtrace::Backtrace;
pub use descriptor::{Descriptor, DEFAULT_CONFIG};
pub use environment::Environment;
pub use package::{Configuration, Modifier, Package, PackageStatement};
pub use parser::ParseError;
pub use planner::{
    CyclicDependency, MissingConfig, NodeKey, PlanError, PlanResult, Planner, Resolution,
    ResolvedConfig, UnpinnedVersion, VersionConflict,
};
pub use repository::{
    FileRepository, MemoryRepository, Repository, RepositoryError, RepositoryResult,
};
pub use tree::{direct_dependencies, DependencyTree, TreeEntry};
