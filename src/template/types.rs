//! Serde models for the persisted template object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The variant key templates are stored under in a tool's meta entry.
pub const TEMPLATE_VARIANT: &str = "json-go-template";

/// The HTTP location an argument is placed into at invocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgPosition {
    /// URL query parameter
    Query,
    /// URL path segment placeholder
    Path,
    /// Request header
    Header,
    /// Cookie header pair
    Cookie,
    /// Request body field
    Body,
}

impl ArgPosition {
    /// All valid positions, in the order error messages list them.
    pub const ALL: [ArgPosition; 5] = [
        Self::Query,
        Self::Path,
        Self::Header,
        Self::Cookie,
        Self::Body,
    ];

    /// The lowercase tag used in persisted `argsPosition` maps.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgPosition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            "body" => Ok(Self::Body),
            _ => Err(()),
        }
    }
}

/// One request header. Keys compare case-insensitively for lookup but are
/// persisted exactly as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive key match.
    pub fn key_is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// Reference to a backend security scheme by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRef {
    pub id: String,
}

/// Client-facing security reference; `passthrough` marks transparent auth
/// (client credentials forwarded to the backend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecurityRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub passthrough: bool,
}

/// A named authentication method as extracted from an OpenAPI document.
///
/// Only `id` matters to this crate; the remaining fields ride along for the
/// gateway's benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_credential: Option<String>,
}

impl SecurityScheme {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scheme_type: None,
            scheme: None,
            location: None,
            name: None,
            default_credential: None,
        }
    }
}

/// The request side of a template.
///
/// At most one of `body`, `argsToJsonBody`, `argsToUrlParam`,
/// `argsToFormBody` may be set; they are alternative encodings of the same
/// concern and the validator rejects combinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestTemplate {
    /// Placeholder-bearing URL
    pub url: String,
    /// HTTP method, uppercase by convention
    pub method: String,
    /// Ordered headers, omitted from JSON while empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderEntry>,
    /// Explicit body: a template string or a structured value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Encode all arguments as a JSON body at invocation time
    #[serde(default, skip_serializing_if = "is_false")]
    pub args_to_json_body: bool,
    /// Append all arguments as URL query parameters at invocation time
    #[serde(default, skip_serializing_if = "is_false")]
    pub args_to_url_param: bool,
    /// Encode all arguments as a form body at invocation time
    #[serde(default, skip_serializing_if = "is_false")]
    pub args_to_form_body: bool,
    /// Backend security scheme reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityRef>,
}

impl RequestTemplate {
    /// Look up a header value by case-insensitive key.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|entry| entry.key_is(key))
            .map(|entry| entry.value.as_str())
    }

    /// Whether a header with this key exists, case-insensitively.
    pub fn has_header(&self, key: &str) -> bool {
        self.headers.iter().any(|entry| entry.key_is(key))
    }

    /// The Content-Type header value, lowercased; empty when absent.
    pub fn content_type(&self) -> String {
        self.header("content-type")
            .map(str::to_ascii_lowercase)
            .unwrap_or_default()
    }
}

/// The response side of a template.
///
/// `body` replaces the upstream response wholesale and is mutually
/// exclusive with the `prependBody`/`appendBody` pair, which wrap it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepend_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_body: Option<String>,
}

/// The whole persisted template object (`json-go-template` variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_template: Option<RequestTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_template: Option<ResponseTemplate>,
    /// Argument-name → position map; dropped once the compiled template
    /// captures every argument through flags or explicit placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args_position: Option<Map<String, Value>>,
    /// Client-facing security reference (transparent auth)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<ClientSecurityRef>,
    /// Local-server configs; arity must be exactly one when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_servers: Option<Vec<Value>>,
}

impl ToolTemplate {
    /// Build an `argsPosition` map from name/position pairs, preserving
    /// argument order.
    pub fn args_position_from<'a>(
        pairs: impl IntoIterator<Item = (&'a str, ArgPosition)>,
    ) -> Map<String, Value> {
        pairs
            .into_iter()
            .map(|(name, position)| (name.to_owned(), Value::String(position.as_str().to_owned())))
            .collect()
    }

    /// Pretty 2-space JSON, the form templates are persisted and shown in.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

pub(crate) fn is_false(flag: &bool) -> bool {
    !*flag
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_and_empty_headers_are_omitted_from_json() {
        let template = ToolTemplate {
            request_template: Some(RequestTemplate {
                url: "https://h/p".into(),
                method: "GET".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(
            value,
            json!({ "requestTemplate": { "url": "https://h/p", "method": "GET" } })
        );
    }

    #[test]
    fn set_flags_serialize_camel_case() {
        let request = RequestTemplate {
            url: "https://h/p".into(),
            method: "GET".into(),
            args_to_url_param: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["argsToUrlParam"], json!(true));
        assert_eq!(value.get("argsToJsonBody"), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request = RequestTemplate {
            url: String::new(),
            method: String::new(),
            headers: vec![HeaderEntry::new("Content-Type", "Application/JSON")],
            ..Default::default()
        };
        assert!(request.has_header("content-type"));
        assert_eq!(request.content_type(), "application/json");
    }

    #[test]
    fn persisted_template_round_trips() {
        let text = r#"{
  "requestTemplate": {
    "url": "https://api.example.com/{id}",
    "method": "POST",
    "headers": [{ "key": "Content-Type", "value": "application/json" }],
    "argsToJsonBody": true
  },
  "responseTemplate": { "body": "{{.}}" },
  "argsPosition": { "id": "path" }
}"#;
        let template: ToolTemplate = serde_json::from_str(text).unwrap();
        let request = template.request_template.as_ref().unwrap();
        assert!(request.args_to_json_body);
        assert_eq!(request.headers.len(), 1);
        assert_eq!(
            template.args_position.as_ref().unwrap()["id"],
            json!("path")
        );

        let reparsed: ToolTemplate =
            serde_json::from_str(&template.to_pretty_json()).unwrap();
        assert_eq!(reparsed, template);
    }
}
