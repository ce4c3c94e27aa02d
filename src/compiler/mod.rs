//! Compiles positioned tool arguments into a request/response template.
//!
//! An imported OpenAPI operation arrives as an argument list, each argument
//! tagged with the HTTP position it belongs in, plus a skeleton template
//! authored from the source document. The compiler produces the final
//! template: path placeholders substituted, query/header/cookie arguments
//! merged in, and the body either synthesized as literal template text or
//! delegated to one of the mutually-exclusive encoding flags the consuming
//! gateway understands.
//!
//! [`compile`] is a pure function over an immutable skeleton; every call
//! returns a fully-populated new template. [`compile_best_effort`] is the
//! import-flow entry point: a failure is logged and the authored skeleton
//! returned unchanged, because a cosmetic template problem must never abort
//! a tool import.

use crate::error::{CompileError, CompileResult};
use crate::schema::SchemaType;
use crate::template::{ArgPosition, HeaderEntry, ToolTemplate};
use serde_json::Value;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// One tool argument as seen by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArg {
    /// Argument name, unique within the tool
    pub name: String,
    /// Where the argument lands in the HTTP request
    pub position: ArgPosition,
    /// Whether the argument is required
    pub required: bool,
    /// Human-readable description, surfaced in the tool's input schema
    pub description: String,
    /// Typed schema of the argument
    pub schema: SchemaType,
}

impl ToolArg {
    /// A required-less string argument at the given position.
    pub fn new(name: impl Into<String>, position: ArgPosition) -> Self {
        Self {
            name: name.into(),
            position,
            required: false,
            description: String::new(),
            schema: SchemaType::default(),
        }
    }

    /// Replace the argument's schema.
    pub fn with_schema(mut self, schema: SchemaType) -> Self {
        self.schema = schema;
        self
    }

    /// Mark the argument required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The placeholder the gateway substitutes with an argument's value.
pub fn placeholder(name: &str) -> String {
    format!("{{{{.args.{name}}}}}")
}

/// Compile a tool's skeleton template against its positioned arguments.
///
/// Pure: the skeleton is never mutated. Strict: failures are returned so
/// tests can pin individual branches; the import flow goes through
/// [`compile_best_effort`] instead.
pub fn compile(tool_name: &str, args: &[ToolArg], skeleton: &ToolTemplate) -> CompileResult<ToolTemplate> {
    if args.iter().any(|arg| arg.name.is_empty()) {
        return Err(CompileError::EmptyArgumentName {
            tool: tool_name.to_owned(),
        });
    }

    let mut template = skeleton.clone();
    let Some(request) = template.request_template.as_mut() else {
        return Err(CompileError::MissingRequestTemplate {
            tool: tool_name.to_owned(),
        });
    };

    let by_position = |position: ArgPosition| -> Vec<&ToolArg> {
        args.iter().filter(|arg| arg.position == position).collect()
    };
    let path_args = by_position(ArgPosition::Path);
    let query_args = by_position(ArgPosition::Query);
    let header_args = by_position(ArgPosition::Header);
    let cookie_args = by_position(ArgPosition::Cookie);
    let body_args = by_position(ArgPosition::Body);

    let total = args.len();
    let all_in_query = total > 0 && query_args.len() == total;
    let all_in_body = total > 0 && body_args.len() == total;

    // Path: exact-brace literal substitution, every occurrence.
    for arg in &path_args {
        let literal = format!("{{{}}}", arg.name);
        request.url = request.url.replace(&literal, &placeholder(&arg.name));
    }

    // Query: the all-query case is delegated to the gateway via the flag;
    // mixed positions append pairs to the URL.
    if all_in_query {
        request.args_to_url_param = true;
    } else if !query_args.is_empty() {
        let pairs: Vec<String> = query_args
            .iter()
            .map(|arg| format!("{}={}", arg.name, placeholder(&arg.name)))
            .collect();
        let connector = if request.url.contains('?') { '&' } else { '?' };
        request.url = format!("{}{}{}", request.url, connector, pairs.join("&"));
    }

    // Headers: one entry per argument unless the skeleton already binds it.
    for arg in &header_args {
        if !request.has_header(&arg.name) {
            request
                .headers
                .push(HeaderEntry::new(&arg.name, placeholder(&arg.name)));
        }
    }

    // Cookies: all cookie arguments merge into one Cookie header.
    if !cookie_args.is_empty() {
        let cookie_value = cookie_args
            .iter()
            .map(|arg| format!("{}={}", arg.name, placeholder(&arg.name)))
            .collect::<Vec<_>>()
            .join("; ");
        match request.headers.iter_mut().find(|entry| entry.key_is("cookie")) {
            Some(entry) => {
                entry.value = if entry.value.is_empty() {
                    cookie_value
                } else {
                    format!("{}; {}", entry.value, cookie_value)
                };
            }
            None => request.headers.push(HeaderEntry::new("Cookie", cookie_value)),
        }
    }

    // Body: an explicit body or encoding flag in the skeleton suppresses
    // synthesis in the mixed case.
    let has_explicit = request.body.is_some()
        || request.args_to_json_body
        || request.args_to_form_body
        || request.args_to_url_param;
    let mut keep_args_position = false;
    let mut produced_body: Option<String> = None;

    if !body_args.is_empty() {
        let content_type = request.content_type();
        if all_in_body {
            if content_type.contains("form-urlencoded")
                || content_type.contains("multipart/form-data")
            {
                request.args_to_form_body = true;
            } else {
                request.args_to_json_body = true;
                if !request.has_header("content-type") {
                    request
                        .headers
                        .push(HeaderEntry::new("Content-Type", JSON_CONTENT_TYPE));
                }
            }
        } else if !has_explicit {
            if content_type.contains("form-urlencoded") {
                let pairs: Vec<String> = body_args
                    .iter()
                    .map(|arg| format!("{}={}", arg.name, placeholder(&arg.name)))
                    .collect();
                produced_body = Some(pairs.join("&"));
            } else {
                let has_complex = body_args.iter().any(|arg| arg.schema.is_complex());
                if has_complex {
                    // Embedding an object or array as inline template text is
                    // unsafe; delegate to the flag and keep the position map,
                    // since the flag alone cannot express partial positioning.
                    request.args_to_json_body = true;
                    keep_args_position = true;
                    if !request.has_header("content-type") {
                        request
                            .headers
                            .push(HeaderEntry::new("Content-Type", JSON_CONTENT_TYPE));
                    }
                } else {
                    let fields: Vec<String> = body_args
                        .iter()
                        .map(|arg| {
                            let value = match arg.schema {
                                SchemaType::String { .. } => {
                                    format!("\"{}\"", placeholder(&arg.name))
                                }
                                _ => placeholder(&arg.name),
                            };
                            format!("  \"{}\": {}", arg.name, value)
                        })
                        .collect();
                    produced_body = Some(format!("{{\n{}\n}}", fields.join(",\n")));
                    if !request.has_header("content-type") {
                        request
                            .headers
                            .push(HeaderEntry::new("Content-Type", JSON_CONTENT_TYPE));
                    }
                }
            }
        }
    }

    if let Some(body) = produced_body {
        request.body = Some(Value::String(body));
    }
    if request.body.is_some() {
        // Mutual exclusivity is enforced here, at the end: a body always
        // wins over whatever flags accumulated along the way.
        request.args_to_json_body = false;
        request.args_to_url_param = false;
        request.args_to_form_body = false;
    } else if !all_in_body
        && !body_args.is_empty()
        && request.content_type().contains("form-urlencoded")
    {
        // Mixed positions with an explicit encoding already present: the
        // form flag still applies and partial positioning must survive.
        request.args_to_form_body = true;
        keep_args_position = true;
    }

    if keep_args_position && !(all_in_query || all_in_body) {
        template.args_position = Some(ToolTemplate::args_position_from(
            args.iter().map(|arg| (arg.name.as_str(), arg.position)),
        ));
    } else {
        template.args_position = None;
    }

    Ok(template)
}

/// Compile, never failing the surrounding import.
///
/// Any compiler failure is logged and the authored skeleton returned
/// unchanged; the tool is still imported with whatever template it had.
pub fn compile_best_effort(tool_name: &str, args: &[ToolArg], skeleton: &ToolTemplate) -> ToolTemplate {
    match compile(tool_name, args, skeleton) {
        Ok(template) => template,
        Err(error) => {
            log::warn!("template compilation for tool '{tool_name}' failed: {error}; keeping the authored skeleton");
            skeleton.clone()
        }
    }
}
