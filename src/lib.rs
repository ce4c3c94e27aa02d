//! Tool schema and template authoring library for MCP gateways.
//!
//! Provides the data model and pure transformations behind a tool-authoring
//! console: an editable schema tree with a JSON-Schema codec, an OpenAPI
//! import pipeline that compiles per-argument HTTP positions into gateway
//! request templates, and a security overlay applied to persisted template
//! text at read time.
//!
//! # Core Components
//!
//! - [`SchemaTree`] - Arena-backed editable tree over a tool's input/output schema
//! - [`tree::codec`] - Bidirectional codec between JSON-Schema properties and the tree
//! - [`compiler`] - Compiles positioned arguments into a request/response template
//! - [`security::overlay_template`] - Idempotent security-reference injection
//!
//! # Quick Start
//!
//! ```rust
//! use mcp_toolspec::SchemaTree;
//! use serde_json::json;
//!
//! let properties = json!({
//!     "city": { "type": "string", "description": "City name" }
//! });
//! let required = vec!["city".to_string()];
//! let tree = SchemaTree::decode(properties.as_object().unwrap(), "args", &required);
//! let saved = tree.save();
//! assert_eq!(saved.required, vec!["city"]);
//! ```

pub mod compiler;
pub mod error;
pub mod openapi;
pub mod schema;
pub mod security;
pub mod spec;
pub mod template;
pub mod tree;

// Re-export commonly used types for convenience
pub use compiler::{ToolArg, compile, compile_best_effort};
pub use error::{
    CompileError, DocumentError, DocumentResult, TemplateValidationError, ValidationResult,
};
pub use openapi::{ImportedConfig, ImportedTool, SwaggerConverter, build_tool_specification};
pub use schema::{SchemaKind, SchemaType};
pub use security::{SecurityBindings, extract_security, overlay_template};
pub use spec::{ToolDefinition, ToolSpecification, ToolsMetaEntry};
pub use template::{
    ArgPosition, HeaderEntry, RequestTemplate, ResponseTemplate, SecurityScheme, ToolTemplate,
    validate_template_text,
};
pub use tree::{DeleteOutcome, NodeId, SavedSchema, SchemaNode, SchemaTree};
