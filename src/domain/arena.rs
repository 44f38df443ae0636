//! Arena-backed forest produced by the tree builder.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{EntityKind, RootReason};

/// Data payload for tree nodes representing hierarchy members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Record identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Type tag, carried verbatim from the record
    pub kind: EntityKind,
    /// Distance from the node's root (root = 0)
    pub depth: usize,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Tree node in the arena-based forest.
#[derive(Debug)]
pub struct TreeNode {
    /// Hierarchy member data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in source order
    pub children: Vec<Index>,
    /// Set for roots only
    pub root_reason: Option<RootReason>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Parent edge dropped by the cycle guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleEdge {
    /// Record whose descent was stopped
    pub child: String,
    /// Ancestor on the path that the record points back to
    pub ancestor: String,
}

/// Arena-based forest for an organizational hierarchy.
///
/// Every record of the source set appears at most once. Nodes are looked up
/// by arena index or by record identifier.
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
    by_id: HashMap<String, Index>,
    cycle_edges: Vec<CycleEdge>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node below `parent`, or as a new root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(
        &mut self,
        data: NodeData,
        parent: Option<Index>,
        root_reason: Option<RootReason>,
    ) -> Index {
        let id = data.id.clone();
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
            root_reason,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }
        self.by_id.insert(id, node_idx);

        node_idx
    }

    pub(crate) fn record_cycle_edge(&mut self, edge: CycleEdge) {
        self.cycle_edges.push(edge);
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.by_id.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn index_of(&self, id: &str) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Root indices in source order.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn cycle_edges(&self) -> &[CycleEdge] {
        &self.cycle_edges
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Child nodes of `id` in order; empty for leaves and unknown ids.
    pub fn children_of(&self, id: &str) -> Vec<&TreeNode> {
        self.find(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.arena.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True if `candidate` is `start` or one of its ancestors.
    ///
    /// Walks the parent links, so the cost is bounded by the depth of `start`.
    pub fn is_on_path(&self, start: Index, candidate: &str) -> bool {
        let mut current = Some(start);
        while let Some(idx) = current {
            match self.arena.get(idx) {
                Some(node) if node.data.id == candidate => return true,
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        false
    }

    /// Pre-order traversal across all roots, left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels in the deepest tree (0 for an empty forest).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Identifiers of all leaf nodes, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| !node.has_children())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(id: &str, depth: usize) -> NodeData {
        NodeData {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind: EntityKind::Person,
            depth,
        }
    }

    // root
    // ├── child1
    // │   └── grandchild1
    // └── child2
    fn sample_arena() -> TreeArena {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(data("root", 0), None, Some(RootReason::NoParent));
        let child1 = tree.insert_node(data("child1", 1), Some(root), None);
        tree.insert_node(data("grandchild1", 2), Some(child1), None);
        tree.insert_node(data("child2", 1), Some(root), None);
        tree
    }

    #[test]
    fn given_tree_when_iterating_then_yields_preorder() {
        let tree = sample_arena();
        let ids: Vec<&str> = tree.iter().map(|(_, n)| n.data.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "child1", "grandchild1", "child2"]);
    }

    #[test]
    fn given_tree_when_measuring_then_reports_depth_and_leaves() {
        let tree = sample_arena();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_nodes(), vec!["grandchild1", "child2"]);
    }

    #[test]
    fn given_node_when_checking_path_then_walks_ancestors_only() {
        let tree = sample_arena();
        let grandchild = tree.index_of("grandchild1").unwrap();
        assert!(tree.is_on_path(grandchild, "root"));
        assert!(tree.is_on_path(grandchild, "grandchild1"));
        assert!(!tree.is_on_path(grandchild, "child2"));
    }

    #[test]
    fn given_empty_forest_when_measuring_then_depth_is_zero() {
        let tree = TreeArena::new();
        assert_eq!(tree.depth(), 0);
        assert!(tree.is_empty());
        assert!(tree.children_of("missing").is_empty());
    }
}
