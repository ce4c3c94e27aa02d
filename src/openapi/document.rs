//! Document parsing, reference resolution and the Swagger upgrade seam.

use crate::error::{DocumentError, DocumentResult};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

/// External Swagger 2.0 to OpenAPI 3 upgrade.
///
/// The converter is a black box: the import pipeline hands it the parsed
/// Swagger document and trusts it to return a valid OpenAPI 3 document.
pub trait SwaggerConverter {
    fn convert(&self, document: Value) -> DocumentResult<Value>;
}

impl<F> SwaggerConverter for F
where
    F: Fn(Value) -> DocumentResult<Value>,
{
    fn convert(&self, document: Value) -> DocumentResult<Value> {
        self(document)
    }
}

/// Converter for deployments without Swagger 2.0 support; rejects every
/// document handed to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaggerUnsupported;

impl SwaggerConverter for SwaggerUnsupported {
    fn convert(&self, _document: Value) -> DocumentResult<Value> {
        Err(DocumentError::Conversion {
            reason: "Swagger 2.0 conversion is not available".into(),
        })
    }
}

/// Parse uploaded document text into a resolved OpenAPI 3 document.
///
/// JSON is tried first, then YAML. Internal `$ref` references are resolved
/// in place; Swagger 2.0 documents go through `converter`. Anything that is
/// neither OpenAPI 3 nor Swagger 2.0 is rejected.
pub fn parse_document(text: &str, converter: &dyn SwaggerConverter) -> DocumentResult<Value> {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(json_error) => serde_yaml::from_str(text).map_err(|yaml_error| {
            DocumentError::format(format!("not JSON ({json_error}) nor YAML ({yaml_error})"))
        })?,
    };

    let resolved = resolve_refs(&parsed, &parsed, &mut HashSet::new());

    if resolved.get("swagger").is_some() {
        return converter.convert(resolved);
    }
    if resolved.get("openapi").is_some() {
        return Ok(resolved);
    }
    Err(DocumentError::unsupported(
        "document declares neither 'openapi' nor 'swagger'",
    ))
}

/// Resolve internal `#/`-prefixed `$ref` references against `root`.
///
/// A circular reference resolves to an error marker object; an
/// unresolvable path or a non-internal reference is returned unchanged so
/// the surrounding data survives. Both cases are logged.
pub fn resolve_refs(value: &Value, root: &Value, visited: &mut HashSet<String>) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_refs(item, root, visited))
                .collect(),
        ),
        Value::Object(fields) => {
            if let Some(reference) = fields.get("$ref").and_then(Value::as_str) {
                return resolve_reference(reference, value, root, visited);
            }
            let mut resolved = Map::new();
            for (key, field) in fields {
                resolved.insert(key.clone(), resolve_refs(field, root, visited));
            }
            Value::Object(resolved)
        }
        other => other.clone(),
    }
}

fn resolve_reference(
    reference: &str,
    original: &Value,
    root: &Value,
    visited: &mut HashSet<String>,
) -> Value {
    if visited.contains(reference) {
        log::warn!("circular reference detected: {reference}");
        return json!({ "error": "Circular reference detected" });
    }

    let Some(path) = reference.strip_prefix("#/") else {
        log::warn!("unsupported reference: {reference}");
        return original.clone();
    };

    let mut target = root;
    for part in path.split('/') {
        match target.get(part) {
            Some(next) => target = next,
            None => {
                log::warn!("unresolvable reference path: {reference}");
                return original.clone();
            }
        }
    }

    visited.insert(reference.to_owned());
    let resolved = resolve_refs(target, root, visited);
    visited.remove(reference);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn passthrough() -> impl SwaggerConverter {
        |document: Value| Ok(document)
    }

    #[test]
    fn parses_json_documents() {
        let doc = parse_document(r#"{ "openapi": "3.0.0", "paths": {} }"#, &SwaggerUnsupported)
            .unwrap();
        assert_eq!(doc["openapi"], json!("3.0.0"));
    }

    #[test]
    fn parses_yaml_documents() {
        let doc = parse_document("openapi: 3.0.0\npaths: {}\n", &SwaggerUnsupported).unwrap();
        assert_eq!(doc["openapi"], json!("3.0.0"));
    }

    #[test]
    fn rejects_text_that_is_neither_json_nor_yaml() {
        let error = parse_document("{ not: valid: json: or: yaml }", &SwaggerUnsupported)
            .unwrap_err();
        assert!(matches!(error, DocumentError::Format { .. }));
    }

    #[test]
    fn rejects_unrecognized_documents() {
        let error = parse_document(r#"{ "title": "something else" }"#, &SwaggerUnsupported)
            .unwrap_err();
        assert!(matches!(error, DocumentError::Unsupported { .. }));
    }

    #[test]
    fn swagger_documents_go_through_the_converter() {
        let converted = parse_document(
            r#"{ "swagger": "2.0", "paths": {} }"#,
            &|mut document: Value| {
                document["openapi"] = json!("3.0.0");
                Ok(document)
            },
        )
        .unwrap();
        assert_eq!(converted["openapi"], json!("3.0.0"));

        let error = parse_document(r#"{ "swagger": "2.0" }"#, &SwaggerUnsupported).unwrap_err();
        assert!(matches!(error, DocumentError::Conversion { .. }));
    }

    #[test]
    fn internal_refs_are_resolved() {
        let text = json!({
            "openapi": "3.0.0",
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [{ "$ref": "#/components/parameters/Limit" }]
                    }
                }
            },
            "components": {
                "parameters": {
                    "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                }
            }
        })
        .to_string();
        let doc = parse_document(&text, &passthrough()).unwrap();
        assert_eq!(
            doc["paths"]["/pets"]["get"]["parameters"][0]["name"],
            json!("limit")
        );
    }

    #[test]
    fn circular_refs_resolve_to_an_error_marker() {
        let doc = json!({
            "a": { "$ref": "#/b" },
            "b": { "nested": { "$ref": "#/b" } }
        });
        let resolved = resolve_refs(&doc, &doc, &mut HashSet::new());
        assert_eq!(
            resolved["a"]["nested"]["error"],
            json!("Circular reference detected")
        );
    }

    #[test]
    fn unresolvable_refs_are_kept_verbatim() {
        let doc = json!({ "a": { "$ref": "#/missing/path" } });
        let resolved = resolve_refs(&doc, &doc, &mut HashSet::new());
        assert_eq!(resolved["a"]["$ref"], json!("#/missing/path"));
    }
}
