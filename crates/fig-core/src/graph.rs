//! Directed graph algorithms over dependency nodes
//!
//! The algorithms here only need to know how to identify a node and how to
//! enumerate the nodes it depends on; they know nothing about packages or
//! descriptors. Child order is significant: it decides traversal order, and
//! therefore the order of the sorted output and which cycle is found first.

use std::hash::Hash;

mod cycles;
mod sort;

pub use cycles::find_cycles;
pub use sort::sort;

/// A node of a dependency graph.
///
/// Nodes are usually cheap handles (an index plus a reference to the owning
/// graph), so they are cloned freely during traversal.
pub trait Node: Clone {
    /// Stable identity of the node within its graph
    type Id: Eq + Hash + Clone;

    fn id(&self) -> Self::Id;

    /// The nodes this node depends on, in declaration order
    fn children(&self) -> Vec<Self>;
}
