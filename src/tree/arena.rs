//! The schema tree arena.

use super::node::{NodeId, NodeRole, SchemaNode};
use crate::schema::SchemaKind;
use std::collections::{HashMap, HashSet};

/// Arena of schema nodes for one schema side (input or output).
///
/// The arena map is the sole lookup structure; every mutation keeps it and
/// each node's position inside its parent's `children` consistent. A tree is
/// exclusively owned by one editing session at a time.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    nodes: HashMap<NodeId, SchemaNode>,
    root: NodeId,
    /// Presentation-only set of nodes shown expanded in a tree widget.
    expanded: HashSet<NodeId>,
}

impl SchemaTree {
    /// Create a tree holding only a root node.
    ///
    /// The root is an `object` that is never deletable or retypable;
    /// `root_label` is its display name (conventionally the schema side,
    /// e.g. `"args"` or `"out"`).
    pub fn new(root_label: &str) -> Self {
        let id = NodeId::generate();
        let mut root = SchemaNode::new(id, None, root_label, NodeRole::Root);
        root.kind = SchemaKind::Object;
        let mut nodes = HashMap::new();
        nodes.insert(id, root);
        let mut expanded = HashSet::new();
        expanded.insert(id);
        Self {
            nodes,
            root: id,
            expanded,
        }
    }

    /// The root node's identifier.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut SchemaNode> {
        self.nodes.get_mut(&id)
    }

    /// Whether the arena still holds `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes in the arena, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every node id currently in the arena, in no particular order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Ordered children of a node; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|node| node.children.clone()).unwrap_or_default()
    }

    /// Find a direct child by its property name.
    ///
    /// Name lookup is scoped to one parent; names are not unique globally.
    pub fn child_by_label(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.get(parent)?
            .children
            .iter()
            .copied()
            .find(|child| self.get(*child).is_some_and(|node| node.label == label))
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Dotted label path from the root, for diagnostics.
    pub fn path(&self, id: NodeId) -> String {
        let mut labels = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            match self.get(id) {
                Some(node) => {
                    labels.push(node.label.clone());
                    current = node.parent;
                }
                None => break,
            }
        }
        labels.reverse();
        labels.join(".")
    }

    /// Whether a node is shown expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Mark a node expanded or collapsed. Presentation only.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if expanded {
            self.expanded.insert(id);
        } else {
            self.expanded.remove(&id);
        }
    }

    /// Register a fresh node under `parent` and append it to the parent's
    /// child list. The parent must exist.
    pub(crate) fn attach(&mut self, parent: NodeId, label: &str, role: NodeRole) -> NodeId {
        let id = NodeId::generate();
        let node = SchemaNode::new(id, Some(parent), label, role);
        self.nodes.insert(id, node);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        id
    }

    /// Remove `id` and every descendant from the arena.
    ///
    /// Does not touch the parent's child list; callers detach first.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        self.expanded.remove(&id);
        for child in node.children {
            self.remove_subtree(child);
        }
    }

    /// Detach every child of `id` and drop their subtrees.
    pub(crate) fn clear_children(&mut self, id: NodeId) {
        let children = self.children(id);
        for child in children {
            self.remove_subtree(child);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children.clear();
        }
    }
}
