//! In-memory editing operations over a schema tree.
//!
//! Every operation is a defensive no-op on invalid input (unknown id, wrong
//! kind) and returns a signal distinguishing a no-op from a successful
//! mutation, so callers and tests never have to guess whether anything
//! changed. Selection handling stays with the caller: deletion reports when
//! the caller's selected node stopped being valid, nothing more.

use super::arena::SchemaTree;
use super::codec;
use super::node::{NodeId, NodeRole};
use crate::schema::SchemaKind;
use serde_json::{Map, Value};

/// Result of a [`SchemaTree::delete_node`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether anything was removed (false for the root or unknown ids)
    pub removed: bool,
    /// Whether the caller-supplied selection no longer denotes a valid,
    /// unrelated node and must be reset by the caller
    pub selection_invalidated: bool,
}

impl DeleteOutcome {
    fn noop() -> Self {
        Self {
            removed: false,
            selection_invalidated: false,
        }
    }
}

/// The persisted form of one schema side, recomputed on save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSchema {
    /// JSON-Schema `properties` map in current tree order
    pub properties: Map<String, Value>,
    /// Labels of required direct root children, in current order
    pub required: Vec<String>,
}

impl SchemaTree {
    /// Insert a fresh `string` property under an `object` node.
    ///
    /// The generated name is `newProperty{N}` with `N` one past the current
    /// child count; sibling label collisions are not checked (identity lives
    /// in the arena id, not the name). Returns the new node's id, or `None`
    /// when `parent` is unknown or not an object.
    pub fn insert_child(&mut self, parent: NodeId) -> Option<NodeId> {
        let parent_node = self.get(parent)?;
        if parent_node.kind != SchemaKind::Object {
            return None;
        }
        let label = format!("newProperty{}", parent_node.children.len() + 1);
        let id = self.attach(parent, &label, NodeRole::Property);
        self.set_expanded(parent, true);
        Some(id)
    }

    /// Change a node's declared type.
    ///
    /// Leaving a container type clears the subtree; entering `array` seeds
    /// the single synthetic items child, entering `object` seeds a
    /// `property1` placeholder. The root is never retyped. Returns whether
    /// the node was changed.
    pub fn retype(&mut self, id: NodeId, new_kind: SchemaKind) -> bool {
        match self.get(id) {
            Some(node) if !node.is_root() => {}
            _ => return false,
        }
        self.clear_children(id);
        match new_kind {
            SchemaKind::Array => {
                self.attach(id, "items", NodeRole::Items);
            }
            SchemaKind::Object => {
                self.attach(id, "property1", NodeRole::Property);
            }
            _ => {}
        }
        if let Some(node) = self.get_mut(id) {
            node.kind = new_kind;
            // A stale nested payload from a previous container life must not
            // resurface in the encoded schema.
            node.extra.remove("properties");
            node.extra.remove("items");
        }
        self.set_expanded(id, true);
        true
    }

    /// Delete a node and its whole subtree.
    ///
    /// Refused for the root. When the removal leaves a non-root `object`
    /// ancestor with no children, that ancestor is deleted too,
    /// recursively. `selection` is the caller's currently selected node, if
    /// any; the outcome reports whether it was invalidated (it was the
    /// deleted node, one of its ancestors or descendants, or got pruned).
    pub fn delete_node(&mut self, id: NodeId, selection: Option<NodeId>) -> DeleteOutcome {
        if id == self.root() || !self.contains(id) {
            return DeleteOutcome::noop();
        }

        let selection_related = selection.is_some_and(|selected| {
            selected == id || self.is_ancestor(selected, id) || self.is_ancestor(id, selected)
        });

        let mut target = id;
        loop {
            let parent = self.get(target).and_then(|node| node.parent);
            self.remove_subtree(target);
            if let Some(parent) = parent {
                if let Some(parent_node) = self.get_mut(parent) {
                    parent_node.children.retain(|child| *child != target);
                }
                // Empty-object pruning walks up until the root or a
                // still-populated ancestor.
                let prune = match self.get(parent) {
                    Some(parent_node) => {
                        !parent_node.is_root()
                            && parent_node.kind == SchemaKind::Object
                            && parent_node.children.is_empty()
                    }
                    None => false,
                };
                if prune {
                    target = parent;
                    continue;
                }
            }
            break;
        }

        let selection_invalidated = match selection {
            Some(selected) => selection_related || !self.contains(selected),
            None => false,
        };
        DeleteOutcome {
            removed: true,
            selection_invalidated,
        }
    }

    /// Mark a direct root child as required or optional.
    ///
    /// Required is meaningful at the root level only; any other node is a
    /// no-op. Returns whether the flag was applied.
    pub fn set_required(&mut self, id: NodeId, required: bool) -> bool {
        let root = self.root();
        let applies = self
            .get(id)
            .is_some_and(|node| node.parent == Some(root) && node.role == NodeRole::Property);
        if !applies {
            return false;
        }
        if let Some(node) = self.get_mut(id) {
            node.required = required;
        }
        true
    }

    /// Recompute the persisted `properties`/`required` pair from the tree.
    pub fn save(&self) -> SavedSchema {
        let children = self.children(self.root());
        let properties = codec::encode(self, &children);
        let required = children
            .iter()
            .filter_map(|id| self.get(*id))
            .filter(|node| node.required)
            .map(|node| node.label.clone())
            .collect();
        SavedSchema {
            properties,
            required,
        }
    }
}
