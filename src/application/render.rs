//! Terminal rendering of the decorated tree.
//!
//! Presentation per type tag is a lookup table; tags without an entry render
//! as a bare name.

use std::collections::HashMap;

use colored::{Color, Colorize};
use termtree::Tree;
use tracing::instrument;

use crate::application::session::HierarchySession;
use crate::domain::EntityKind;

const EXPANDED_MARK: &str = "▲";
const COLLAPSED_MARK: &str = "▼";

/// Badge shown next to a node of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindStyle {
    pub label: &'static str,
    pub color: Color,
}

fn default_styles() -> HashMap<EntityKind, KindStyle> {
    HashMap::from([
        (
            EntityKind::Object,
            KindStyle {
                label: "object",
                color: Color::Blue,
            },
        ),
        (
            EntityKind::Person,
            KindStyle {
                label: "person",
                color: Color::Green,
            },
        ),
        (
            EntityKind::Department,
            KindStyle {
                label: "department",
                color: Color::Magenta,
            },
        ),
        (
            EntityKind::Store,
            KindStyle {
                label: "store",
                color: Color::TrueColor {
                    r: 255,
                    g: 165,
                    b: 0,
                },
            },
        ),
    ])
}

/// Turns a session's visible nodes into `termtree` trees.
#[derive(Debug, Clone)]
pub struct TreeRenderer {
    styles: HashMap<EntityKind, KindStyle>,
    color: bool,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TreeRenderer {
    pub fn new(color: bool) -> Self {
        Self {
            styles: default_styles(),
            color,
        }
    }

    pub fn style(&self, kind: &EntityKind) -> Option<&KindStyle> {
        self.styles.get(kind)
    }

    /// One tree per root, children shown only below expanded nodes.
    #[instrument(level = "debug", skip_all)]
    pub fn render(&self, session: &HierarchySession) -> Vec<Tree<String>> {
        let mut forest = Vec::new();
        // (depth, tree) of the nodes still waiting for children
        let mut open: Vec<(usize, Tree<String>)> = Vec::new();

        for row in session.visible_rows() {
            close_to_depth(&mut open, &mut forest, row.depth);
            let label = self.label(&row.name, &row.kind, row.has_children, row.expanded);
            open.push((row.depth, Tree::new(label)));
        }
        close_to_depth(&mut open, &mut forest, 0);
        forest
    }

    pub fn render_to_string(&self, session: &HierarchySession) -> String {
        self.render(session)
            .iter()
            .map(|tree| tree.to_string())
            .collect()
    }

    /// Single line for a node: expand mark, name and kind badge.
    pub fn label(&self, name: &str, kind: &EntityKind, has_children: bool, expanded: bool) -> String {
        let mut parts = Vec::with_capacity(3);
        if has_children {
            let mark = if expanded { EXPANDED_MARK } else { COLLAPSED_MARK };
            parts.push(mark.to_string());
        }

        match self.styles.get(kind) {
            Some(style) if self.color => {
                parts.push(name.bold().to_string());
                parts.push(format!("[{}]", style.label).color(style.color).to_string());
            }
            Some(style) => {
                parts.push(name.to_string());
                parts.push(format!("[{}]", style.label));
            }
            None => parts.push(name.to_string()),
        }

        parts.join(" ")
    }
}

/// Attach every open tree at `depth` or deeper to its parent.
fn close_to_depth(
    open: &mut Vec<(usize, Tree<String>)>,
    forest: &mut Vec<Tree<String>>,
    depth: usize,
) {
    while open.last().is_some_and(|(d, _)| *d >= depth) {
        let Some((_, tree)) = open.pop() else {
            break;
        };
        match open.last_mut() {
            Some((_, parent)) => {
                parent.push(tree);
            }
            None => forest.push(tree),
        }
    }
}
