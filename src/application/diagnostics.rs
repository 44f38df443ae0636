//! Data quality report for a built hierarchy.

use crate::domain::{CycleEdge, RecordSet, RootReason, TreeArena};

/// Records that the builder had to resolve rather than take at face value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// (id, missing parent id)
    pub dangling: Vec<(String, String)>,
    /// Records naming themselves as parent
    pub self_parents: Vec<String>,
    /// Records promoted to root to break a cycle
    pub cycle_breaks: Vec<String>,
    /// Parent edges cut by the cycle guard
    pub cycle_edges: Vec<CycleEdge>,
    /// (id, tag) for type tags outside the known set
    pub unknown_kinds: Vec<(String, String)>,
}

impl Diagnostics {
    pub fn collect(records: &RecordSet, tree: &TreeArena) -> Self {
        let mut report = Self {
            cycle_edges: tree.cycle_edges().to_vec(),
            ..Default::default()
        };

        for &root in tree.roots() {
            let Some(node) = tree.get_node(root) else {
                continue;
            };
            let id = node.data.id.clone();
            match node.root_reason {
                Some(RootReason::DanglingParent) => {
                    let parent = records
                        .get(&id)
                        .map(|r| r.parent.clone())
                        .unwrap_or_default();
                    report.dangling.push((id, parent));
                }
                Some(RootReason::SelfParent) => report.self_parents.push(id),
                Some(RootReason::CycleBreak) => report.cycle_breaks.push(id),
                Some(RootReason::NoParent) | None => {}
            }
        }

        report.unknown_kinds = records
            .iter()
            .filter(|(_, r)| !r.kind.is_known())
            .map(|(id, r)| (id.clone(), r.kind.tag().to_string()))
            .collect();

        report
    }

    /// Number of parent edges the cycle guard had to cut.
    pub fn cycles_cut(&self) -> usize {
        self.cycle_edges.len()
    }

    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
            && self.self_parents.is_empty()
            && self.cycle_breaks.is_empty()
            && self.cycle_edges.is_empty()
            && self.unknown_kinds.is_empty()
    }
}
