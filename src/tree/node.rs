//! Schema tree nodes and their identifiers.

use crate::schema::SchemaKind;
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a node in a [`SchemaTree`](super::SchemaTree).
///
/// Identifiers are generated when a node is created and never reused;
/// they carry no positional information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Structural role of a node within the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// The single non-deletable root of a schema side
    Root,
    /// A named property of an object
    Property,
    /// The synthetic single child of an array node
    Items,
}

/// One node of an editable schema tree.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// Stable identifier
    pub id: NodeId,
    /// Parent node; `None` only for the root
    pub parent: Option<NodeId>,
    /// Ordered child identifiers
    pub children: Vec<NodeId>,
    /// The property's own name (root: the schema side's display label)
    pub label: String,
    /// Structural role
    pub role: NodeRole,
    /// Declared type tag
    pub kind: SchemaKind,
    /// Property description, editable as free text
    pub description: String,
    /// Default value as raw edit-field text, type-coerced on encode
    pub default_value: String,
    /// Required flag; meaningful only for direct children of the root
    pub required: bool,
    /// Source-fragment fields the tree does not otherwise expose, preserved
    /// for round-tripping (`format`, `enum`, nested `properties` of an
    /// object that was never expanded, ...)
    pub extra: Map<String, Value>,
}

impl SchemaNode {
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>, label: &str, role: NodeRole) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            label: label.to_owned(),
            role,
            kind: SchemaKind::String,
            description: String::new(),
            default_value: String::new(),
            required: false,
            extra: Map::new(),
        }
    }

    /// Whether this node is the schema root.
    pub fn is_root(&self) -> bool {
        self.role == NodeRole::Root
    }

    /// Whether this node is the synthetic items child of an array.
    pub fn is_items(&self) -> bool {
        self.role == NodeRole::Items
    }
}
