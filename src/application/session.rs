//! A render session: records, the forest built from them, and the
//! expansion state layered on top.

use tracing::{debug, instrument};

use crate::domain::{
    EntityKind, ExpansionController, ExpansionPolicy, RecordSet, TreeArena, TreeBuilder,
};

/// One line of the decorated tree as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Owns the record set, the built forest and the expansion controller.
///
/// All mutation goes through `&mut self`, so a toggle is fully applied
/// before the next `visible_rows` call can observe it.
#[derive(Debug)]
pub struct HierarchySession {
    records: RecordSet,
    sentinel: String,
    tree: TreeArena,
    expansion: ExpansionController,
}

impl HierarchySession {
    pub fn new(records: RecordSet, policy: ExpansionPolicy) -> Self {
        Self::with_sentinel(records, policy, crate::domain::NO_PARENT)
    }

    pub fn with_sentinel(
        records: RecordSet,
        policy: ExpansionPolicy,
        sentinel: impl Into<String>,
    ) -> Self {
        let sentinel = sentinel.into();
        let tree = TreeBuilder::with_sentinel(sentinel.clone()).build(&records);
        let mut expansion = ExpansionController::new(policy);
        expansion.attach(&tree);
        Self {
            records,
            sentinel,
            tree,
            expansion,
        }
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    /// Replace the records and rebuild; flags of surviving nodes are kept.
    #[instrument(level = "debug", skip(self, records))]
    pub fn rebuild(&mut self, records: RecordSet) {
        self.tree = TreeBuilder::with_sentinel(self.sentinel.clone()).build(&records);
        self.records = records;
        self.expansion.attach(&self.tree);
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.expansion.toggle(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expansion.is_expanded(id)
    }

    /// False for leaves and for identifiers outside the tree.
    pub fn has_children(&self, id: &str) -> bool {
        self.tree
            .find(id)
            .map(ExpansionController::has_children)
            .unwrap_or(false)
    }

    pub fn expand_all(&mut self) {
        self.expansion.set_all(true);
    }

    pub fn collapse_all(&mut self) {
        self.expansion.set_all(false);
    }

    pub fn reset_expansion(&mut self) {
        self.expansion.reset();
    }

    /// Pre-order walk that only descends into expanded nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<_> = self.tree.roots().iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            let Some(node) = self.tree.get_node(idx) else {
                continue;
            };
            let expanded = self.expansion.is_expanded(&node.data.id);
            rows.push(VisibleRow {
                id: node.data.id.clone(),
                name: node.data.name.clone(),
                kind: node.data.kind.clone(),
                depth: node.data.depth,
                has_children: node.has_children(),
                expanded,
            });
            if expanded {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        debug!("{} of {} nodes visible", rows.len(), self.tree.len());
        rows
    }
}
