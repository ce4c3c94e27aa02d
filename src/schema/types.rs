//! Schema type tags and the typed fragment model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// The six JSON-Schema subset types a tool argument may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// String value
    String,
    /// Floating-point number
    Number,
    /// Integer number
    Integer,
    /// Boolean value
    Boolean,
    /// Array with a single item schema
    Array,
    /// Object with named properties
    Object,
}

impl SchemaKind {
    /// Whether this kind carries child schemas (`array` or `object`).
    pub fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }

    /// Parse a fragment's `type` field, tolerating absent or unknown tags.
    ///
    /// Only the six subset types are supported; anything else decodes as
    /// `string` and is logged at debug level.
    pub fn parse_lenient(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) => tag.parse().unwrap_or_else(|_| {
                log::debug!("unsupported schema type '{tag}', treating as string");
                Self::String
            }),
            None => Self::String,
        }
    }

    /// The lowercase tag written into persisted schemas.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            _ => Err(()),
        }
    }
}

impl Default for SchemaKind {
    fn default() -> Self {
        Self::String
    }
}

/// Tagged union of a schema fragment's per-type payload.
///
/// Replaces a loosely-shaped `{type, default?, items?, properties?}` object:
/// each variant carries exactly the fields its type permits, so consumers
/// match exhaustively instead of probing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    /// String value with an optional default
    String { default: Option<String> },
    /// Floating-point number with an optional default
    Number { default: Option<f64> },
    /// Integer number with an optional default
    Integer { default: Option<i64> },
    /// Boolean value with an optional default
    Boolean { default: Option<bool> },
    /// Array of a single item schema
    Array { items: Box<SchemaType> },
    /// Object with ordered named properties
    Object { properties: Vec<(String, SchemaType)> },
}

impl SchemaType {
    /// The type tag of this payload.
    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::String { .. } => SchemaKind::String,
            Self::Number { .. } => SchemaKind::Number,
            Self::Integer { .. } => SchemaKind::Integer,
            Self::Boolean { .. } => SchemaKind::Boolean,
            Self::Array { .. } => SchemaKind::Array,
            Self::Object { .. } => SchemaKind::Object,
        }
    }

    /// Whether embedding a value of this type inline in template text is
    /// unsafe (arrays and objects are).
    pub fn is_complex(&self) -> bool {
        self.kind().is_container()
    }

    /// An empty payload of the given kind.
    pub fn empty(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::String => Self::String { default: None },
            SchemaKind::Number => Self::Number { default: None },
            SchemaKind::Integer => Self::Integer { default: None },
            SchemaKind::Boolean => Self::Boolean { default: None },
            SchemaKind::Array => Self::Array {
                items: Box::new(Self::String { default: None }),
            },
            SchemaKind::Object => Self::Object { properties: vec![] },
        }
    }

    /// Parse a raw JSON-Schema fragment into its typed payload.
    ///
    /// Defaults of the wrong JSON type are dropped rather than coerced.
    pub fn from_fragment(fragment: &Value) -> Self {
        let kind = SchemaKind::parse_lenient(fragment.get("type").and_then(Value::as_str));
        match kind {
            SchemaKind::String => Self::String {
                default: fragment
                    .get("default")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            SchemaKind::Number => Self::Number {
                default: fragment.get("default").and_then(Value::as_f64),
            },
            SchemaKind::Integer => Self::Integer {
                default: fragment.get("default").and_then(Value::as_i64),
            },
            SchemaKind::Boolean => Self::Boolean {
                default: fragment.get("default").and_then(Value::as_bool),
            },
            SchemaKind::Array => Self::Array {
                items: Box::new(
                    fragment
                        .get("items")
                        .map(Self::from_fragment)
                        .unwrap_or(Self::String { default: None }),
                ),
            },
            SchemaKind::Object => Self::Object {
                properties: fragment
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|properties| {
                        properties
                            .iter()
                            .map(|(name, value)| (name.clone(), Self::from_fragment(value)))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        }
    }

    /// Render the payload back into a raw JSON-Schema fragment.
    pub fn to_fragment(&self) -> Value {
        let mut fragment = Map::new();
        fragment.insert("type".into(), json!(self.kind().as_str()));
        match self {
            Self::String { default } => {
                if let Some(default) = default {
                    fragment.insert("default".into(), json!(default));
                }
            }
            Self::Number { default } => {
                if let Some(default) = default {
                    fragment.insert("default".into(), json!(default));
                }
            }
            Self::Integer { default } => {
                if let Some(default) = default {
                    fragment.insert("default".into(), json!(default));
                }
            }
            Self::Boolean { default } => {
                if let Some(default) = default {
                    fragment.insert("default".into(), json!(default));
                }
            }
            Self::Array { items } => {
                fragment.insert("items".into(), items.to_fragment());
            }
            Self::Object { properties } => {
                if !properties.is_empty() {
                    let mut map = Map::new();
                    for (name, schema) in properties {
                        map.insert(name.clone(), schema.to_fragment());
                    }
                    fragment.insert("properties".into(), Value::Object(map));
                }
            }
        }
        Value::Object(fragment)
    }

    /// The default value rendered as raw edit-field text, if one is set.
    pub fn default_text(&self) -> Option<String> {
        match self {
            Self::String { default } => default.clone(),
            Self::Number { default } => default.map(|n| format_number(n)),
            Self::Integer { default } => default.map(|n| n.to_string()),
            Self::Boolean { default } => default.map(|b| b.to_string()),
            Self::Array { .. } | Self::Object { .. } => None,
        }
    }
}

impl Default for SchemaType {
    fn default() -> Self {
        Self::String { default: None }
    }
}

// Integral f64 defaults render without a trailing ".0" so the text matches
// what the author typed.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
