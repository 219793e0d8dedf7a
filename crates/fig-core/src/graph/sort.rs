//! Dependency-first ordering

use super::Node;
use std::collections::HashSet;

/// Topologically sort every node reachable from `root`.
///
/// A node appears only after all of its children, so the root comes last.
/// Shared dependencies appear once, at the position of their first
/// completed visit. The graph must already be known to be acyclic; on a
/// cyclic graph the walk still terminates but the order is meaningless.
pub fn sort<N: Node>(root: N) -> Vec<N> {
    let mut visited = HashSet::new();
    let mut sorted = Vec::new();
    visit(root, &mut visited, &mut sorted);
    sorted
}

fn visit<N: Node>(node: N, visited: &mut HashSet<N::Id>, sorted: &mut Vec<N>) {
    if !visited.insert(node.id()) {
        return;
    }
    for child in node.children() {
        visit(child, visited, sorted);
    }
    sorted.push(node);
}
