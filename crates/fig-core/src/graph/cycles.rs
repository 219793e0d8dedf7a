//! Cycle detection using Tarjan's strongly-connected-components algorithm

use super::Node;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy)]
struct NodeState {
    index: usize,
    lowlink: usize,
}

struct Tarjan<N: Node> {
    next_index: usize,
    stack: Vec<N>,
    on_stack: HashSet<N::Id>,
    states: HashMap<N::Id, NodeState>,
    cycles: Vec<Vec<N>>,
}

/// Find every cycle reachable from `root`.
///
/// A cycle is a strongly-connected component with at least two members, or a
/// single node that lists itself as a child. Cycles are returned in the order
/// their components are completed; members are listed in the order they were
/// pushed, starting with the node through which the cycle was entered.
pub fn find_cycles<N: Node>(root: N) -> Vec<Vec<N>> {
    let mut tarjan = Tarjan {
        next_index: 0,
        stack: Vec::new(),
        on_stack: HashSet::new(),
        states: HashMap::new(),
        cycles: Vec::new(),
    };
    tarjan.visit(root);
    tarjan.cycles
}

impl<N: Node> Tarjan<N> {
    fn visit(&mut self, node: N) -> NodeState {
        let id = node.id();
        let mut state = NodeState {
            index: self.next_index,
            lowlink: self.next_index,
        };
        self.next_index += 1;
        self.states.insert(id.clone(), state);
        self.stack.push(node.clone());
        self.on_stack.insert(id.clone());

        let mut self_loop = false;
        for child in node.children() {
            let child_id = child.id();
            if child_id == id {
                self_loop = true;
            }
            match self.states.get(&child_id).copied() {
                None => {
                    let child_state = self.visit(child);
                    state.lowlink = state.lowlink.min(child_state.lowlink);
                }
                Some(child_state) if self.on_stack.contains(&child_id) => {
                    state.lowlink = state.lowlink.min(child_state.index);
                }
                Some(_) => {}
            }
        }
        self.states.insert(id.clone(), state);

        if state.lowlink == state.index {
            let start = self
                .stack
                .iter()
                .rposition(|member| member.id() == id)
                .unwrap_or(0);
            let component = self.stack.split_off(start);
            for member in &component {
                self.on_stack.remove(&member.id());
            }
            if component.len() > 1 || self_loop {
                self.cycles.push(component);
            }
        }

        state
    }
}
