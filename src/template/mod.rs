//! Persisted request/response template model and its structural validation.
//!
//! A tool's HTTP translation is stored as a template object under the
//! `json-go-template` variant key: a request side (url, method, headers,
//! body or one mutually-exclusive encoding flag), a response side, an
//! optional per-argument position map, and optional security references. A
//! separate gateway substitutes the `{{.args.name}}` placeholders at
//! invocation time; this crate only authors and validates the shape.
//!
//! # Key Types
//!
//! - [`ToolTemplate`] - The whole persisted template object
//! - [`RequestTemplate`] / [`ResponseTemplate`] - The two sides
//! - [`ArgPosition`] - Where an argument lands in the HTTP request
//! - [`validate_template_text`] - Per-field structural validation

pub mod types;
pub mod validation;

pub use types::{
    ArgPosition, ClientSecurityRef, HeaderEntry, RequestTemplate, ResponseTemplate, SecurityRef,
    SecurityScheme, TEMPLATE_VARIANT, ToolTemplate,
};
pub use validation::{validate_template_text, validate_template_value};
