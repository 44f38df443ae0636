//! Tree builder turning flat parent-pointer records into a forest.

use std::collections::HashSet;

use generational_arena::Index;
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{CycleEdge, NodeData, TreeArena};
use crate::domain::entities::{RecordSet, RootReason, NO_PARENT};

/// Constructs hierarchical trees from a record set.
///
/// Building never fails: missing parents and self references turn records
/// into roots, and parent cycles are cut by an ancestor guard.
pub struct TreeBuilder {
    sentinel: String,
    relationship_cache: IndexMap<String, Vec<String>>,
    placed: HashSet<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_sentinel(NO_PARENT)
    }

    /// Builder treating `sentinel` as the "no parent" marker.
    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
            relationship_cache: IndexMap::new(),
            placed: HashSet::new(),
        }
    }

    /// Build the forest for `records`.
    ///
    /// Roots come first in source order, followed by one promoted root for
    /// every parent cycle that no regular root reaches.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&mut self, records: &RecordSet) -> TreeArena {
        // Reset state for a fresh build
        self.relationship_cache.clear();
        self.placed.clear();

        self.scan_records(records);

        let mut tree = TreeArena::new();
        for (root, reason) in self.find_root_nodes(records) {
            self.build_tree(&mut tree, records, &root, reason);
        }

        // Whatever is left hangs off a parent cycle
        for id in records.keys() {
            if self.placed.contains(id) {
                continue;
            }
            let entry = cycle_entry(records, id);
            warn!("no root reaches {}, promoting {} to break the cycle", id, entry);
            self.build_tree(&mut tree, records, &entry, RootReason::CycleBreak);
        }

        debug!(
            "built {} nodes in {} trees, {} cycle edges cut",
            tree.len(),
            tree.roots().len(),
            tree.cycle_edges().len()
        );
        tree
    }

    /// Classify a record as a root, if it is one.
    pub fn root_reason(&self, id: &str, parent: &str, records: &RecordSet) -> Option<RootReason> {
        if parent == self.sentinel {
            Some(RootReason::NoParent)
        } else if !records.contains_key(parent) {
            Some(RootReason::DanglingParent)
        } else if parent == id {
            Some(RootReason::SelfParent)
        } else {
            None
        }
    }

    /// Group records under their parent; roots are nobody's child.
    fn scan_records(&mut self, records: &RecordSet) {
        for (id, record) in records {
            if self.root_reason(id, &record.parent, records).is_some() {
                continue;
            }
            self.relationship_cache
                .entry(record.parent.clone())
                .or_default()
                .push(id.clone());
        }
    }

    fn find_root_nodes(&self, records: &RecordSet) -> Vec<(String, RootReason)> {
        records
            .iter()
            .filter_map(|(id, record)| {
                self.root_reason(id, &record.parent, records)
                    .map(|reason| (id.clone(), reason))
            })
            .collect()
    }

    fn build_tree(
        &mut self,
        tree: &mut TreeArena,
        records: &RecordSet,
        root_id: &str,
        reason: RootReason,
    ) {
        let mut stack: Vec<(String, Option<Index>, usize)> = vec![(root_id.to_string(), None, 0)];

        while let Some((current_id, parent_idx, depth)) = stack.pop() {
            // never place a record twice
            if !self.placed.insert(current_id.clone()) {
                debug!("{} already placed, skipping", current_id);
                continue;
            }
            let Some(record) = records.get(&current_id) else {
                continue;
            };

            let node_data = NodeData {
                id: current_id.clone(),
                name: record.name.clone(),
                kind: record.kind.clone(),
                depth,
            };
            let root_reason = parent_idx.is_none().then_some(reason);
            let current_idx = tree.insert_node(node_data, parent_idx, root_reason);

            let Some(children) = self.relationship_cache.get(&current_id) else {
                continue;
            };
            let mut accepted = Vec::with_capacity(children.len());
            for child in children {
                if tree.is_on_path(current_idx, child) {
                    warn!("cycle: {} points back to ancestor {}", current_id, child);
                    tree.record_cycle_edge(CycleEdge {
                        child: current_id.clone(),
                        ancestor: child.clone(),
                    });
                    continue;
                }
                accepted.push(child.clone());
            }
            // Reverse so siblings pop in source order
            for child in accepted.into_iter().rev() {
                stack.push((child, Some(current_idx), depth + 1));
            }
        }
    }
}

/// Member of the parent cycle reached from `start` that comes first in
/// source order.
fn cycle_entry(records: &RecordSet, start: &str) -> String {
    let mut seen = HashSet::new();
    let mut current = start.to_string();
    while seen.insert(current.clone()) {
        match records.get(&current) {
            Some(record) => current = record.parent.clone(),
            None => return start.to_string(),
        }
    }

    // `current` is on the cycle; collect its members
    let mut members = vec![current.clone()];
    let mut next = records
        .get(&current)
        .map(|r| r.parent.clone())
        .unwrap_or_else(|| current.clone());
    while next != current {
        members.push(next.clone());
        next = match records.get(&next) {
            Some(record) => record.parent.clone(),
            None => break,
        };
    }

    members
        .into_iter()
        .min_by_key(|id| records.get_index_of(id).unwrap_or(usize::MAX))
        .unwrap_or_else(|| start.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntityKind, EntityRecord};

    fn records(entries: &[(&str, &str)]) -> RecordSet {
        entries
            .iter()
            .map(|(id, parent)| {
                (
                    id.to_string(),
                    EntityRecord::new(id.to_uppercase(), *parent, EntityKind::Person),
                )
            })
            .collect()
    }

    #[test]
    fn given_tail_into_cycle_when_finding_entry_then_picks_cycle_member() {
        // c -> a -> b -> a
        let set = records(&[("c", "a"), ("b", "a"), ("a", "b")]);
        assert_eq!(cycle_entry(&set, "c"), "b");
    }

    #[test]
    fn given_custom_sentinel_when_building_then_detects_roots_by_it() {
        let set = records(&[("root", ""), ("child", "root")]);
        let tree = TreeBuilder::with_sentinel("").build(&set);
        let root = tree.find("root").unwrap();
        assert_eq!(root.root_reason, Some(RootReason::NoParent));
        assert_eq!(tree.children_of("root").len(), 1);
    }

    #[test]
    fn given_sentinel_used_as_identifier_when_building_then_both_are_roots() {
        let set = records(&[("-1", "-1"), ("r", "-1")]);
        let tree = TreeBuilder::new().build(&set);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.roots().len(), 2);
        let r = tree.find("r").unwrap();
        assert_eq!(r.root_reason, Some(RootReason::NoParent));
        assert_eq!(r.data.depth, 0);
        assert!(tree.children_of("-1").is_empty());
        assert!(tree.cycle_edges().is_empty());
    }

    #[test]
    fn given_root_whose_parent_is_a_child_when_building_then_no_cycle_cut() {
        // "a" is a root by sentinel, "-1" hangs below it
        let set = records(&[("-1", "a"), ("a", "-1")]);
        let tree = TreeBuilder::new().build(&set);
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.find("a").unwrap().root_reason, Some(RootReason::NoParent));
        assert_eq!(tree.children_of("a").len(), 1);
        assert!(tree.cycle_edges().is_empty());
    }
}
