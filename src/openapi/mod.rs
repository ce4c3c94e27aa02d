//! OpenAPI import pipeline.
//!
//! An uploaded document is parsed (JSON or YAML), internal `$ref`s are
//! resolved, Swagger 2.0 documents are upgraded through an external
//! converter, and each path operation is extracted into a tool: an argument
//! list with per-argument HTTP positions plus a skeleton request template.
//! [`build_tool_specification`] then compiles every tool's skeleton and
//! assembles the persisted tool specification.
//!
//! # Key Types
//!
//! - [`parse_document`] - Text to a resolved OpenAPI 3 document
//! - [`SwaggerConverter`] - External 2-to-3 upgrade, called as a black box
//! - [`extract_tools`] - Document to [`ImportedConfig`]
//! - [`build_tool_specification`] - Config to a persisted [`ToolSpecification`](crate::ToolSpecification)

pub mod document;
pub mod extract;

pub use document::{SwaggerConverter, SwaggerUnsupported, parse_document};
pub use extract::{ImportedConfig, ImportedTool, extract_tools};

use crate::compiler::compile_best_effort;
use crate::spec::{ToolDefinition, ToolSpecification, ToolsMetaEntry};
use crate::template::ToolTemplate;

/// Assemble the persisted tool specification from an imported config,
/// compiling each tool's skeleton template against its positioned
/// arguments.
///
/// Compilation is best-effort per tool: a failure is logged and that tool
/// keeps its authored skeleton; the import itself never fails here.
pub fn build_tool_specification(config: &ImportedConfig) -> ToolSpecification {
    let mut specification = ToolSpecification {
        security_schemes: config.security_schemes.clone(),
        ..Default::default()
    };

    for tool in &config.tools {
        let skeleton = ToolTemplate {
            request_template: Some(tool.request_template.clone()),
            response_template: Some(tool.response_template.clone()),
            args_position: Some(ToolTemplate::args_position_from(
                tool.args.iter().map(|arg| (arg.name.as_str(), arg.position)),
            )),
            ..Default::default()
        };
        let compiled = compile_best_effort(&tool.name, &tool.args, &skeleton);

        let definition = ToolDefinition::from_args(&tool.name, &tool.description, &tool.args);
        let meta = ToolsMetaEntry::with_template(compiled);
        specification.upsert(definition, meta);
    }

    specification
}
