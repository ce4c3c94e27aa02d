//! Codec between JSON-Schema property maps and the editable tree.
//!
//! `decode` flattens a `properties`/`required` pair into arena nodes;
//! `encode` rebuilds the properties map from the nodes. Fragment fields the
//! tree does not expose (`format`, `enum`, ...) ride along on each node and
//! are re-emitted verbatim, so the round trip only normalizes what the
//! editor actually manages.
//!
//! Nested (non-root) `required` lists are read but never written back:
//! only the top-level `required` argument marks nodes, and `save` emits a
//! `required` list for direct root children alone. Schemas relying on
//! nested `required` will not round-trip it.

use super::arena::SchemaTree;
use super::node::{NodeId, NodeRole};
use crate::schema::{SchemaKind, SchemaType};
use serde_json::{Map, Value, json};

impl SchemaTree {
    /// Decode a JSON-Schema `properties` map into an editable tree.
    ///
    /// `required` is the schema's top-level required list; it marks direct
    /// children of the root only.
    pub fn decode(properties: &Map<String, Value>, root_label: &str, required: &[String]) -> Self {
        let mut tree = Self::new(root_label);
        let root = tree.root();
        for (name, fragment) in properties {
            decode_fragment(
                &mut tree,
                root,
                name,
                fragment,
                NodeRole::Property,
                Some(required),
            );
        }
        tree
    }

    /// Decode, seeding one `string` child named `seed_label` when the
    /// source schema has no properties, so an editing session never starts
    /// on a bare root.
    pub fn decode_or_default(
        properties: Option<&Map<String, Value>>,
        root_label: &str,
        required: &[String],
        seed_label: &str,
    ) -> Self {
        let mut tree = match properties {
            Some(properties) => Self::decode(properties, root_label, required),
            None => Self::new(root_label),
        };
        if tree.children(tree.root()).is_empty() {
            let root = tree.root();
            tree.attach(root, seed_label, NodeRole::Property);
        }
        tree
    }
}

fn decode_fragment(
    tree: &mut SchemaTree,
    parent: NodeId,
    name: &str,
    fragment: &Value,
    role: NodeRole,
    required: Option<&[String]>,
) {
    let typed = SchemaType::from_fragment(fragment);
    let kind = typed.kind();
    let id = tree.attach(parent, name, role);
    if let Some(node) = tree.get_mut(id) {
        node.kind = kind;
        node.description = fragment
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        node.default_value = typed.default_text().unwrap_or_default();
        node.required = required.is_some_and(|names| names.iter().any(|n| n == name));
        node.extra = unmanaged_fields(fragment);
    }
    match kind {
        SchemaKind::Object => {
            // Nested required lists are deliberately not forwarded.
            if let Some(properties) = fragment.get("properties").and_then(Value::as_object) {
                for (child_name, child_fragment) in properties {
                    decode_fragment(tree, id, child_name, child_fragment, NodeRole::Property, None);
                }
            }
        }
        SchemaKind::Array => {
            let items = fragment.get("items").cloned().unwrap_or(Value::Null);
            decode_fragment(tree, id, "items", &items, NodeRole::Items, None);
        }
        _ => {}
    }
}

// Everything except the fields the tree edits directly. Nested
// `properties`/`items` stay here too: encode overrides them whenever the
// tree carries children, and passes them through untouched otherwise
// (an object whose properties were never decoded keeps them verbatim).
fn unmanaged_fields(fragment: &Value) -> Map<String, Value> {
    fragment
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter(|(key, _)| !matches!(key.as_str(), "type" | "description" | "default"))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Encode tree nodes back into a JSON-Schema `properties` map keyed by each
/// node's label.
pub fn encode(tree: &SchemaTree, ids: &[NodeId]) -> Map<String, Value> {
    let mut properties = Map::new();
    for &id in ids {
        let Some(node) = tree.get(id) else { continue };
        let mut fragment = node.extra.clone();
        fragment.insert("type".into(), json!(node.kind.as_str()));
        // Items nodes never carry a description or default.
        if !node.is_items() {
            if !node.description.is_empty() {
                fragment.insert("description".into(), json!(node.description));
            }
            if !node.default_value.is_empty() {
                if let Some(default) = coerce_default(node.kind, &node.default_value) {
                    fragment.insert("default".into(), default);
                }
            }
        }
        match node.kind {
            SchemaKind::Object if !node.children.is_empty() => {
                fragment.insert(
                    "properties".into(),
                    Value::Object(encode(tree, &node.children)),
                );
            }
            SchemaKind::Array => {
                if let Some(&items) = node.children.first() {
                    let encoded = encode(tree, &[items]);
                    if let Some((_, items_fragment)) = encoded.into_iter().next() {
                        fragment.insert("items".into(), items_fragment);
                    }
                }
            }
            _ => {}
        }
        properties.insert(node.label.clone(), Value::Object(fragment));
    }
    properties
}

// Coerce raw edit-field text into a typed default. Non-numeric text for the
// numeric kinds is ignored; any other kind takes the raw string.
fn coerce_default(kind: SchemaKind, text: &str) -> Option<Value> {
    match kind {
        SchemaKind::Boolean => Some(json!(text == "true")),
        SchemaKind::Number => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| json!(n)),
        SchemaKind::Integer => text
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| {
                text.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(|n| n.trunc() as i64)
            })
            .map(|n| json!(n)),
        SchemaKind::String | SchemaKind::Array | SchemaKind::Object => Some(json!(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn properties(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn decode_marks_required_on_root_children_only() {
        let source = properties(json!({
            "profile": {
                "type": "object",
                "properties": { "name": { "type": "string" } },
                "required": ["name"]
            },
            "id": { "type": "string" }
        }));
        let tree = SchemaTree::decode(&source, "args", &["id".to_string()]);
        let root = tree.root();

        let id = tree.child_by_label(root, "id").unwrap();
        assert!(tree.get(id).unwrap().required);

        let profile = tree.child_by_label(root, "profile").unwrap();
        let name = tree.child_by_label(profile, "name").unwrap();
        assert!(!tree.get(name).unwrap().required, "nested required is ignored");
    }

    #[test]
    fn decode_builds_a_single_items_child_for_arrays() {
        let source = properties(json!({
            "tags": { "type": "array", "items": { "type": "integer" } }
        }));
        let tree = SchemaTree::decode(&source, "args", &[]);
        let tags = tree.child_by_label(tree.root(), "tags").unwrap();
        let children = tree.children(tags);
        assert_eq!(children.len(), 1);
        let items = tree.get(children[0]).unwrap();
        assert!(items.is_items());
        assert_eq!(items.kind, SchemaKind::Integer);
    }

    #[test]
    fn encode_round_trips_unmanaged_fields() {
        let source = properties(json!({
            "when": { "type": "string", "format": "date-time", "description": "Start time" }
        }));
        let tree = SchemaTree::decode(&source, "args", &[]);
        let encoded = encode(&tree, &tree.children(tree.root()));
        assert_eq!(encoded["when"]["format"], json!("date-time"));
        assert_eq!(encoded["when"]["description"], json!("Start time"));
    }

    #[test]
    fn encode_coerces_defaults_per_kind() {
        assert_eq!(coerce_default(SchemaKind::Boolean, "true"), Some(json!(true)));
        assert_eq!(coerce_default(SchemaKind::Boolean, "yes"), Some(json!(false)));
        assert_eq!(coerce_default(SchemaKind::Number, "2.5"), Some(json!(2.5)));
        assert_eq!(coerce_default(SchemaKind::Number, "many"), None);
        assert_eq!(coerce_default(SchemaKind::Integer, "7"), Some(json!(7)));
        assert_eq!(coerce_default(SchemaKind::Integer, "3.7"), Some(json!(3)));
        assert_eq!(coerce_default(SchemaKind::Integer, "x"), None);
        assert_eq!(coerce_default(SchemaKind::String, "keep"), Some(json!("keep")));
    }

    #[test]
    fn encode_drops_description_and_default_on_items() {
        let source = properties(json!({
            "tags": {
                "type": "array",
                "items": { "type": "string", "description": "ignored", "default": "x" }
            }
        }));
        let tree = SchemaTree::decode(&source, "args", &[]);
        let encoded = encode(&tree, &tree.children(tree.root()));
        let items = &encoded["tags"]["items"];
        assert_eq!(items.get("description"), None);
        assert_eq!(items.get("default"), None);
    }

    #[test]
    fn round_trip_preserves_a_nested_schema() {
        let source = properties(json!({
            "filter": {
                "type": "object",
                "description": "Search filter",
                "properties": {
                    "terms": { "type": "array", "items": { "type": "string" } },
                    "limit": { "type": "integer", "default": 10 }
                }
            },
            "verbose": { "type": "boolean", "default": false }
        }));
        let tree = SchemaTree::decode(&source, "args", &[]);
        let encoded = encode(&tree, &tree.children(tree.root()));
        assert_eq!(Value::Object(encoded), Value::Object(source));
    }

    #[test]
    fn decode_or_default_seeds_an_empty_schema() {
        let tree = SchemaTree::decode_or_default(None, "out", &[], "result");
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 1);
        assert_eq!(tree.get(children[0]).unwrap().label, "result");
        assert_eq!(tree.get(children[0]).unwrap().kind, SchemaKind::String);
    }
}
