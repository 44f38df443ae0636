//! Domain entities: flat hierarchy records

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parent identifier marking a record without a parent.
pub const NO_PARENT: &str = "-1";

/// Flat record set keyed by identifier.
///
/// Iteration order is insertion order; every ordering decision of the
/// builder (root order, sibling order) follows it.
pub type RecordSet = IndexMap<String, EntityRecord>;

/// Type tag of a hierarchy member.
///
/// The set is closed, but tags outside it are kept as `Unknown` so the
/// rendering layer can decide what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    Object,
    Person,
    Department,
    Store,
    Unknown(String),
}

impl EntityKind {
    /// Wire tag, as found in the source data.
    pub fn tag(&self) -> &str {
        match self {
            EntityKind::Object => "obj",
            EntityKind::Person => "person",
            EntityKind::Department => "department",
            EntityKind::Store => "store",
            EntityKind::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EntityKind::Unknown(_))
    }
}

impl From<&str> for EntityKind {
    fn from(tag: &str) -> Self {
        match tag {
            "obj" | "object" => EntityKind::Object,
            "person" => EntityKind::Person,
            "department" => EntityKind::Department,
            "store" => EntityKind::Store,
            other => EntityKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for EntityKind {
    fn from(tag: String) -> Self {
        EntityKind::from(tag.as_str())
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One member of the hierarchy, pointing at its parent by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Display name
    pub name: String,
    /// Parent identifier, `NO_PARENT` for none
    pub parent: String,
    /// Type tag
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>, parent: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            kind,
        }
    }
}

/// Why a record ended up as a root of the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootReason {
    /// Parent is the no-parent sentinel
    NoParent,
    /// Parent identifier does not exist in the record set
    DanglingParent,
    /// Parent identifier equals the record's own identifier
    SelfParent,
    /// Record sits on a parent cycle with no other root; promoted to break it
    CycleBreak,
}

impl fmt::Display for RootReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RootReason::NoParent => "no parent",
            RootReason::DanglingParent => "dangling parent",
            RootReason::SelfParent => "self parent",
            RootReason::CycleBreak => "cycle break",
        };
        write!(f, "{}", s)
    }
}
