//! Structural validation of persisted template text.
//!
//! Validation runs over the raw parsed JSON rather than the typed structs so
//! that an out-of-enum position string or a misshapen field produces a
//! per-field error the form layer can surface, instead of a deserialization
//! failure. All violations for one template are collected and returned
//! together; these are deterministic pure checks with nothing to retry.

use crate::error::{TemplateValidationError, ValidationResult};
use serde_json::Value;
use std::str::FromStr;

use super::types::ArgPosition;

const REQUEST_MUTEX_FIELDS: [&str; 4] =
    ["body", "argsToJsonBody", "argsToUrlParam", "argsToFormBody"];

/// Validate template text: JSON well-formedness plus every structural rule.
pub fn validate_template_text(text: &str) -> ValidationResult<()> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|error| vec![TemplateValidationError::format(error.to_string())])?;
    validate_template_value(&parsed)
}

/// Validate an already-parsed template object.
pub fn validate_template_value(template: &Value) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if let Some(request) = template.get("requestTemplate") {
        for field in ["url", "method"] {
            if !is_set(request.get(field)) {
                errors.push(TemplateValidationError::required(field));
            }
        }

        let conflicting: Vec<String> = REQUEST_MUTEX_FIELDS
            .iter()
            .filter(|field| is_set(request.get(**field)))
            .map(|field| (*field).to_owned())
            .collect();
        if conflicting.len() > 1 {
            errors.push(TemplateValidationError::mutex("requestTemplate", conflicting));
        }
    }

    match template.get("argsPosition") {
        None => {}
        Some(Value::Object(positions)) => {
            let invalid: Vec<String> = positions
                .values()
                .filter(|value| {
                    value
                        .as_str()
                        .map(|tag| ArgPosition::from_str(tag).is_err())
                        .unwrap_or(true)
                })
                .map(|value| match value.as_str() {
                    Some(tag) => tag.to_owned(),
                    None => value.to_string(),
                })
                .collect();
            if !invalid.is_empty() {
                errors.push(TemplateValidationError::InvalidEnum { values: invalid });
            }
        }
        Some(_) => errors.push(TemplateValidationError::InvalidShape),
    }

    if let Some(servers) = template.get("mcpServers").and_then(Value::as_array) {
        if servers.len() != 1 {
            errors.push(TemplateValidationError::Cardinality {
                field: "mcpServers".into(),
                count: servers.len(),
            });
        }
    }

    if let Some(response) = template.get("responseTemplate") {
        let has_body = is_set(response.get("body"));
        let wrapping: Vec<String> = ["prependBody", "appendBody"]
            .iter()
            .filter(|field| is_set(response.get(**field)))
            .map(|field| (*field).to_owned())
            .collect();
        if has_body && !wrapping.is_empty() {
            let mut conflicting = vec!["body".to_owned()];
            conflicting.extend(wrapping);
            errors.push(TemplateValidationError::mutex("responseTemplate", conflicting));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// A field counts as set under the same rules the original form applied:
// absent, null, false, zero and the empty string do not count.
fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0) != 0.0,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_template_passes() {
        let template = json!({
            "requestTemplate": {
                "url": "https://api.example.com/search",
                "method": "GET",
                "argsToUrlParam": true
            },
            "responseTemplate": { "body": "{{.}}" }
        });
        assert!(validate_template_value(&template).is_ok());
    }

    #[test]
    fn missing_url_and_method_are_both_reported() {
        let template = json!({ "requestTemplate": { "headers": [] } });
        let errors = validate_template_value(&template).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            TemplateValidationError::RequiredFieldMissing { field } if field == "url"
        ));
    }

    #[test]
    fn body_and_json_flag_violate_the_mutex() {
        let template = json!({
            "requestTemplate": {
                "url": "https://h/p",
                "method": "POST",
                "body": "{}",
                "argsToJsonBody": true
            }
        });
        let errors = validate_template_value(&template).unwrap_err();
        let message = errors[0].to_string();
        assert!(message.contains("body"));
        assert!(message.contains("argsToJsonBody"));
    }

    #[test]
    fn empty_body_string_does_not_count_as_set() {
        let template = json!({
            "requestTemplate": {
                "url": "https://h/p",
                "method": "POST",
                "body": "",
                "argsToJsonBody": true
            }
        });
        assert!(validate_template_value(&template).is_ok());
    }

    #[test]
    fn invalid_positions_are_enumerated() {
        let template = json!({
            "requestTemplate": { "url": "https://h/p", "method": "GET" },
            "argsPosition": { "a": "query", "b": "form", "c": "fragment" }
        });
        let errors = validate_template_value(&template).unwrap_err();
        assert_eq!(
            errors,
            vec![TemplateValidationError::InvalidEnum {
                values: vec!["form".into(), "fragment".into()]
            }]
        );
    }

    #[test]
    fn args_position_must_be_an_object() {
        let template = json!({ "argsPosition": ["query"] });
        let errors = validate_template_value(&template).unwrap_err();
        assert_eq!(errors, vec![TemplateValidationError::InvalidShape]);
    }

    #[test]
    fn mcp_servers_arity_must_be_one() {
        let template = json!({ "mcpServers": [{}, {}] });
        let errors = validate_template_value(&template).unwrap_err();
        assert!(matches!(
            &errors[0],
            TemplateValidationError::Cardinality { field, count: 2 } if field == "mcpServers"
        ));
    }

    #[test]
    fn response_body_conflicts_with_wrapping_fields() {
        let template = json!({
            "responseTemplate": { "body": "{{.}}", "prependBody": "pre" }
        });
        let errors = validate_template_value(&template).unwrap_err();
        let message = errors[0].to_string();
        assert!(message.contains("prependBody"));
    }

    #[test]
    fn malformed_text_is_a_format_error() {
        let errors = validate_template_text("{not json").unwrap_err();
        assert!(matches!(&errors[0], TemplateValidationError::Format { .. }));
    }
}
