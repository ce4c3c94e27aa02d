//! The persisted tool specification.
//!
//! A server's tools are stored as one JSON document: the `tools` list
//! (name, description, schemas) the protocol layer advertises, and the
//! `toolsMeta` map carrying per-tool runtime configuration: whether the
//! tool is enabled, its invocation context, its request/response template
//! and its security binding.

use crate::compiler::ToolArg;
use crate::template::types::is_false;
use crate::template::{SecurityScheme, TEMPLATE_VARIANT, ToolTemplate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// One advertised tool: name, description and its JSON schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// `{type: "object", properties, required}` JSON value
    pub input_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

impl ToolDefinition {
    /// Build a definition whose input schema is derived from a positioned
    /// argument list.
    pub fn from_args(name: &str, description: &str, args: &[ToolArg]) -> Self {
        let mut properties = Map::new();
        for arg in args {
            let mut fragment = arg.schema.to_fragment();
            if !arg.description.is_empty() {
                if let Some(fields) = fragment.as_object_mut() {
                    fields.insert("description".into(), json!(arg.description));
                }
            }
            properties.insert(arg.name.clone(), fragment);
        }
        let required: Vec<&str> = args
            .iter()
            .filter(|arg| arg.required)
            .map(|arg| arg.name.as_str())
            .collect();
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
            output_schema: None,
        }
    }
}

/// Per-tool runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolsMetaEntry {
    pub enabled: bool,
    /// Opaque key/value pairs handed to the gateway on every invocation
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub invoke_context: Map<String, Value>,
    /// Template variants; this crate writes the `json-go-template` variant
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<String, ToolTemplate>,
    /// Pass client credentials through to the backend
    #[serde(default, skip_serializing_if = "is_false")]
    pub transparent_auth: bool,
    /// Backend security scheme id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub security_scheme_id: String,
    /// Client-facing scheme id; meaningful only with `transparent_auth`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_security_scheme_id: String,
}

impl ToolsMetaEntry {
    /// An enabled entry carrying one template under the standard variant.
    pub fn with_template(template: ToolTemplate) -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(TEMPLATE_VARIANT.to_owned(), template);
        Self {
            enabled: true,
            templates,
            ..Default::default()
        }
    }

    /// The standard-variant template, when present.
    pub fn template(&self) -> Option<&ToolTemplate> {
        self.templates.get(TEMPLATE_VARIANT)
    }
}

/// The whole persisted specification: advertised tools plus their runtime
/// configuration, and the security schemes an import extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpecification {
    pub tools: Vec<ToolDefinition>,
    pub tools_meta: BTreeMap<String, ToolsMetaEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_schemes: Vec<SecurityScheme>,
}

impl ToolSpecification {
    /// Insert or replace a tool and its meta entry, keyed by tool name.
    ///
    /// Editing an existing tool replaces it in place, keeping its position
    /// in the advertised list; a new tool is appended.
    pub fn upsert(&mut self, tool: ToolDefinition, meta: ToolsMetaEntry) {
        self.tools_meta.insert(tool.name.clone(), meta);
        match self.tools.iter_mut().find(|existing| existing.name == tool.name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Remove a tool and its meta entry. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let had_meta = self.tools_meta.remove(name).is_some();
        let before = self.tools.len();
        self.tools.retain(|tool| tool.name != name);
        had_meta || self.tools.len() != before
    }

    /// Pretty 2-space JSON, the persisted form.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaType;
    use crate::template::ArgPosition;

    fn definition(name: &str) -> ToolDefinition {
        ToolDefinition::from_args(
            name,
            "a tool",
            &[
                ToolArg::new("q", ArgPosition::Query).required(),
                ToolArg::new("limit", ArgPosition::Query)
                    .with_schema(SchemaType::Integer { default: Some(10) }),
            ],
        )
    }

    #[test]
    fn input_schema_carries_types_defaults_and_required() {
        let tool = definition("search");
        assert_eq!(tool.input_schema["type"], json!("object"));
        assert_eq!(tool.input_schema["required"], json!(["q"]));
        assert_eq!(tool.input_schema["properties"]["limit"]["type"], json!("integer"));
        assert_eq!(tool.input_schema["properties"]["limit"]["default"], json!(10));
    }

    #[test]
    fn upsert_replaces_by_name_and_appends_otherwise() {
        let mut specification = ToolSpecification::default();
        specification.upsert(definition("a"), ToolsMetaEntry::default());
        specification.upsert(definition("b"), ToolsMetaEntry::default());

        let mut replacement = definition("a");
        replacement.description = "updated".into();
        specification.upsert(replacement, ToolsMetaEntry::with_template(ToolTemplate::default()));

        assert_eq!(specification.tools.len(), 2);
        assert_eq!(specification.tools[0].name, "a");
        assert_eq!(specification.tools[0].description, "updated");
        assert!(specification.tools_meta["a"].template().is_some());
    }

    #[test]
    fn remove_drops_both_sides() {
        let mut specification = ToolSpecification::default();
        specification.upsert(definition("a"), ToolsMetaEntry::default());
        assert!(specification.remove("a"));
        assert!(!specification.remove("a"));
        assert!(specification.tools.is_empty());
        assert!(specification.tools_meta.is_empty());
    }

    #[test]
    fn specification_json_round_trips() {
        let mut specification = ToolSpecification::default();
        specification.upsert(
            definition("search"),
            ToolsMetaEntry::with_template(ToolTemplate::default()),
        );
        let text = specification.to_pretty_json();
        let reparsed: ToolSpecification = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, specification);
    }
}
