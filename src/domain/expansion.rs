//! Per-node expand/collapse state.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::domain::arena::{TreeArena, TreeNode};

/// Default expansion derived from a node's depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionPolicy {
    /// Nodes at this depth or shallower start expanded
    pub expand_depth: usize,
}

impl Default for ExpansionPolicy {
    /// Roots expanded, everything below collapsed.
    fn default() -> Self {
        Self { expand_depth: 0 }
    }
}

impl ExpansionPolicy {
    pub fn initial_state(&self, depth: usize) -> bool {
        depth <= self.expand_depth
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeInfo {
    depth: usize,
    has_children: bool,
}

/// Tracks which nodes currently show their children.
///
/// State is keyed by node identifier and independent per node: collapsing a
/// node leaves the flags of its descendants untouched. Nodes without an
/// explicit flag report the policy default for their depth.
#[derive(Debug, Default)]
pub struct ExpansionController {
    policy: ExpansionPolicy,
    nodes: HashMap<String, NodeInfo>,
    expanded: HashMap<String, bool>,
}

impl ExpansionController {
    pub fn new(policy: ExpansionPolicy) -> Self {
        Self {
            policy,
            nodes: HashMap::new(),
            expanded: HashMap::new(),
        }
    }

    pub fn policy(&self) -> ExpansionPolicy {
        self.policy
    }

    /// Register the nodes of `tree`.
    ///
    /// Flags of identifiers that are still present survive; flags of nodes
    /// that left the tree are dropped.
    #[instrument(level = "debug", skip(self, tree), fields(nodes = tree.len()))]
    pub fn attach(&mut self, tree: &TreeArena) {
        self.nodes = tree
            .iter()
            .map(|(_, node)| {
                (
                    node.data.id.clone(),
                    NodeInfo {
                        depth: node.data.depth,
                        has_children: node.has_children(),
                    },
                )
            })
            .collect();

        let before = self.expanded.len();
        let nodes = &self.nodes;
        self.expanded.retain(|id, _| nodes.contains_key(id));
        debug!("dropped {} stale expansion flags", before - self.expanded.len());
    }

    /// Flip the expanded flag of `id` and return the resulting state.
    ///
    /// Leaves and unknown identifiers are left alone.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.nodes.get(id) {
            Some(info) if info.has_children => {
                let next = !self.is_expanded(id);
                self.expanded.insert(id.to_string(), next);
                debug!("{} -> {}", id, if next { "expanded" } else { "collapsed" });
                next
            }
            Some(_) => {
                trace!("{} is a leaf, nothing to toggle", id);
                self.is_expanded(id)
            }
            None => {
                trace!("{} is not part of the tree", id);
                self.is_expanded(id)
            }
        }
    }

    /// Current state of `id`, falling back to the depth policy.
    ///
    /// Unknown identifiers are treated as not-yet-seen non-root nodes.
    pub fn is_expanded(&self, id: &str) -> bool {
        if let Some(&state) = self.expanded.get(id) {
            return state;
        }
        match self.nodes.get(id) {
            Some(info) => self.policy.initial_state(info.depth),
            None => false,
        }
    }

    /// Whether `node` has anything to reveal, i.e. whether it is interactive.
    pub fn has_children(node: &TreeNode) -> bool {
        node.has_children()
    }

    /// Set an explicit state for every node with children.
    pub fn set_all(&mut self, expanded: bool) {
        for (id, info) in &self.nodes {
            if info.has_children {
                self.expanded.insert(id.clone(), expanded);
            }
        }
    }

    /// Forget explicit flags; every node reverts to the policy default.
    pub fn reset(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeData;
    use crate::domain::entities::{EntityKind, RootReason};

    fn data(id: &str, depth: usize) -> NodeData {
        NodeData {
            id: id.to_string(),
            name: id.to_string(),
            kind: EntityKind::Object,
            depth,
        }
    }

    // r -> a -> b
    fn chain() -> TreeArena {
        let mut tree = TreeArena::new();
        let r = tree.insert_node(data("r", 0), None, Some(RootReason::NoParent));
        let a = tree.insert_node(data("a", 1), Some(r), None);
        tree.insert_node(data("b", 2), Some(a), None);
        tree
    }

    #[test]
    fn given_fresh_controller_when_querying_then_uses_depth_policy() {
        let mut controller = ExpansionController::default();
        controller.attach(&chain());
        assert!(controller.is_expanded("r"));
        assert!(!controller.is_expanded("a"));
        assert!(!controller.is_expanded("b"));
    }

    #[test]
    fn given_deeper_policy_when_querying_then_expands_through_depth() {
        let mut controller = ExpansionController::new(ExpansionPolicy { expand_depth: 1 });
        controller.attach(&chain());
        assert!(controller.is_expanded("a"));
        assert!(!controller.is_expanded("b"));
    }

    #[test]
    fn given_leaf_when_toggling_then_state_unchanged() {
        let mut controller = ExpansionController::default();
        controller.attach(&chain());
        assert!(!controller.toggle("b"));
        assert!(!controller.is_expanded("b"));
    }

    #[test]
    fn given_rebuilt_tree_when_attaching_then_drops_flags_of_removed_nodes() {
        let mut controller = ExpansionController::default();
        controller.attach(&chain());
        controller.toggle("a");

        let mut smaller = TreeArena::new();
        smaller.insert_node(data("r", 0), None, Some(RootReason::NoParent));
        controller.attach(&smaller);

        assert!(!controller.is_expanded("a"));
        assert!(controller.is_expanded("r"));
    }

    #[test]
    fn given_expanded_nodes_when_resetting_then_policy_applies_again() {
        let mut controller = ExpansionController::default();
        controller.attach(&chain());
        controller.set_all(true);
        assert!(controller.is_expanded("a"));
        controller.reset();
        assert!(!controller.is_expanded("a"));
    }
}
