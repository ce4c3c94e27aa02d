//! Extraction of tools from a resolved OpenAPI 3 document.

use crate::compiler::ToolArg;
use crate::schema::SchemaType;
use crate::template::{ArgPosition, HeaderEntry, RequestTemplate, ResponseTemplate, SecurityScheme};
use serde_json::Value;
use std::str::FromStr;

const METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "head", "options"];

/// One operation extracted from the document, ready for compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedTool {
    pub name: String,
    pub description: String,
    pub args: Vec<ToolArg>,
    /// Skeleton request template as authored from the source document
    pub request_template: RequestTemplate,
    pub response_template: ResponseTemplate,
}

/// Everything an import produces before compilation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportedConfig {
    pub tools: Vec<ImportedTool>,
    pub security_schemes: Vec<SecurityScheme>,
}

/// Extract every path operation of a resolved OpenAPI 3 document.
pub fn extract_tools(doc: &Value) -> ImportedConfig {
    let base_url = doc
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(|server| server.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_owned();

    let security_schemes = extract_security_schemes(doc);

    let mut tools = Vec::new();
    if let Some(paths) = doc.get("paths").and_then(Value::as_object) {
        for (path, item) in paths {
            let shared_parameters: Vec<&Value> = item
                .get("parameters")
                .and_then(Value::as_array)
                .map(|parameters| parameters.iter().collect())
                .unwrap_or_default();

            for method in METHODS {
                let Some(operation) = item.get(method).filter(|op| op.is_object()) else {
                    continue;
                };
                tools.push(extract_operation(
                    &base_url,
                    path,
                    method,
                    operation,
                    &shared_parameters,
                ));
            }
        }
    }

    ImportedConfig {
        tools,
        security_schemes,
    }
}

fn extract_security_schemes(doc: &Value) -> Vec<SecurityScheme> {
    let Some(schemes) = doc
        .get("components")
        .and_then(|components| components.get("securitySchemes"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };
    schemes
        .iter()
        .map(|(id, scheme)| {
            let text = |field: &str| {
                scheme
                    .get(field)
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            };
            SecurityScheme {
                id: id.clone(),
                scheme_type: text("type"),
                scheme: text("scheme"),
                location: text("in"),
                name: text("name"),
                default_credential: None,
            }
        })
        .collect()
}

fn extract_operation(
    base_url: &str,
    path: &str,
    method: &str,
    operation: &Value,
    shared_parameters: &[&Value],
) -> ImportedTool {
    let name = operation
        .get("operationId")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| fallback_name(method, path));
    let description = ["summary", "description"]
        .iter()
        .find_map(|field| operation.get(*field).and_then(Value::as_str))
        .unwrap_or_default()
        .to_owned();

    let mut args = Vec::new();
    let own_parameters: Vec<&Value> = operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(|parameters| parameters.iter().collect())
        .unwrap_or_default();
    for parameter in shared_parameters.iter().copied().chain(own_parameters.iter().copied()) {
        if let Some(arg) = extract_parameter(parameter) {
            // An operation-level parameter overrides a path-level one with
            // the same name and position.
            args.retain(|existing: &ToolArg| {
                existing.name != arg.name || existing.position != arg.position
            });
            args.push(arg);
        }
    }

    let mut headers = Vec::new();
    if let Some((media_type, schema)) = request_body(operation) {
        headers.push(HeaderEntry::new("Content-Type", media_type));
        extract_body_args(&schema, &mut args);
    }

    ImportedTool {
        name,
        description,
        args,
        request_template: RequestTemplate {
            url: format!("{base_url}{path}"),
            method: method.to_ascii_uppercase(),
            headers,
            ..Default::default()
        },
        response_template: ResponseTemplate::default(),
    }
}

fn extract_parameter(parameter: &Value) -> Option<ToolArg> {
    let name = parameter.get("name").and_then(Value::as_str)?;
    let location = parameter.get("in").and_then(Value::as_str)?;
    let Ok(position) = ArgPosition::from_str(location) else {
        log::debug!("parameter '{name}' has unsupported location '{location}', skipping");
        return None;
    };
    let schema = parameter.get("schema").cloned().unwrap_or(Value::Null);
    Some(ToolArg {
        name: name.to_owned(),
        position,
        required: parameter
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        description: parameter
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        schema: SchemaType::from_fragment(&schema),
    })
}

// The JSON media type wins when the body offers several; otherwise the
// first one declared is taken.
fn request_body(operation: &Value) -> Option<(String, Value)> {
    let content = operation
        .get("requestBody")
        .and_then(|body| body.get("content"))
        .and_then(Value::as_object)?;
    let (media_type, media) = content
        .iter()
        .find(|(media_type, _)| media_type.contains("application/json"))
        .or_else(|| content.iter().next())?;
    let schema = media.get("schema").cloned().unwrap_or(Value::Null);
    Some((media_type.clone(), schema))
}

fn extract_body_args(schema: &Value, args: &mut Vec<ToolArg>) {
    let required: Vec<String> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    match schema.get("properties").and_then(Value::as_object) {
        Some(properties) => {
            for (name, fragment) in properties {
                args.push(ToolArg {
                    name: name.clone(),
                    position: ArgPosition::Body,
                    required: required.iter().any(|n| n == name),
                    description: fragment
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                    schema: SchemaType::from_fragment(fragment),
                });
            }
        }
        // A non-object body schema becomes a single argument carrying it.
        None => args.push(ToolArg {
            name: "body".to_owned(),
            position: ArgPosition::Body,
            required: true,
            description: String::new(),
            schema: SchemaType::from_fragment(schema),
        }),
    }
}

fn fallback_name(method: &str, path: &str) -> String {
    let mut sanitized = String::with_capacity(path.len());
    for character in path.chars() {
        if character.is_ascii_alphanumeric() {
            sanitized.push(character);
        } else if !sanitized.ends_with('_') {
            sanitized.push('_');
        }
    }
    let sanitized = sanitized.trim_matches('_');
    if sanitized.is_empty() {
        method.to_owned()
    } else {
        format!("{method}_{sanitized}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn petstore() -> Value {
        json!({
            "openapi": "3.0.0",
            "servers": [{ "url": "https://api.example.com/v1/" }],
            "components": {
                "securitySchemes": {
                    "apiKey": { "type": "apiKey", "in": "header", "name": "X-Api-Key" }
                }
            },
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        { "name": "petId", "in": "path", "required": true,
                          "schema": { "type": "string" } }
                    ],
                    "get": {
                        "operationId": "getPet",
                        "summary": "Fetch one pet",
                        "parameters": [
                            { "name": "verbose", "in": "query",
                              "schema": { "type": "boolean" } }
                        ]
                    },
                    "put": {
                        "summary": "Replace one pet",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "required": ["name"],
                                        "properties": {
                                            "name": { "type": "string" },
                                            "age": { "type": "integer" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn extracts_operations_with_inherited_parameters() {
        let config = extract_tools(&petstore());
        assert_eq!(config.tools.len(), 2);

        let get = config.tools.iter().find(|t| t.name == "getPet").unwrap();
        assert_eq!(get.description, "Fetch one pet");
        assert_eq!(get.request_template.url, "https://api.example.com/v1/pets/{petId}");
        assert_eq!(get.request_template.method, "GET");
        assert_eq!(get.args.len(), 2);
        let pet_id = get.args.iter().find(|a| a.name == "petId").unwrap();
        assert_eq!(pet_id.position, ArgPosition::Path);
        assert!(pet_id.required);
    }

    #[test]
    fn missing_operation_id_falls_back_to_method_and_path() {
        let config = extract_tools(&petstore());
        let put = config
            .tools
            .iter()
            .find(|t| t.name == "put_pets_petId")
            .unwrap();
        assert_eq!(put.request_template.method, "PUT");
    }

    #[test]
    fn request_body_properties_become_body_args() {
        let config = extract_tools(&petstore());
        let put = config.tools.iter().find(|t| t.name == "put_pets_petId").unwrap();

        let name = put.args.iter().find(|a| a.name == "name").unwrap();
        assert_eq!(name.position, ArgPosition::Body);
        assert!(name.required);
        let age = put.args.iter().find(|a| a.name == "age").unwrap();
        assert!(!age.required);
        assert_eq!(
            put.request_template.header("content-type"),
            Some("application/json")
        );
    }

    #[test]
    fn security_schemes_take_their_id_from_the_map_key() {
        let config = extract_tools(&petstore());
        assert_eq!(config.security_schemes.len(), 1);
        let scheme = &config.security_schemes[0];
        assert_eq!(scheme.id, "apiKey");
        assert_eq!(scheme.location.as_deref(), Some("header"));
    }

    #[test]
    fn unsupported_parameter_locations_are_skipped() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {
                "/x": {
                    "get": {
                        "operationId": "x",
                        "parameters": [
                            { "name": "weird", "in": "matrix", "schema": { "type": "string" } }
                        ]
                    }
                }
            }
        });
        let config = extract_tools(&doc);
        assert!(config.tools[0].args.is_empty());
    }
}
