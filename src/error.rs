//! Error types for tool schema and template operations.
//!
//! Structural validation errors are deterministic and reported per-field to
//! the caller; compiler failures are a separate kind because the import flow
//! treats them as soft (logged, never fatal).

/// Errors raised while parsing an uploaded OpenAPI/Swagger document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Input text is neither valid JSON nor valid YAML
    #[error("Invalid JSON/YAML format: {reason}")]
    Format { reason: String },

    /// Parsed document is neither an OpenAPI 3.x nor a Swagger 2.0 document
    #[error("Unsupported document: {reason}")]
    Unsupported { reason: String },

    /// The external Swagger 2.0 upgrade step failed
    #[error("Swagger conversion failed: {reason}")]
    Conversion { reason: String },
}

/// Structural validation errors for a persisted template object.
///
/// Each variant corresponds to one rule the surrounding form layer surfaces
/// per-field. Validation collects every violation for a template rather than
/// stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateValidationError {
    /// Template text is not valid JSON
    #[error("Invalid template format: {reason}")]
    Format { reason: String },

    /// A mandatory requestTemplate field is absent
    #[error("requestTemplate.{field} is a required field")]
    RequiredFieldMissing { field: String },

    /// More than one alternative encoding of the same concern is set
    #[error("mutually exclusive fields set in {scope}: {}", .conflicting.join(", "))]
    MutexViolation {
        scope: String,
        conflicting: Vec<String>,
    },

    /// An argsPosition value outside query/path/header/cookie/body
    #[error("argsPosition values must be one of query, path, header, cookie, body; found: {}", .values.join(", "))]
    InvalidEnum { values: Vec<String> },

    /// argsPosition is present but not an object
    #[error("argsPosition must be an object mapping argument names to positions")]
    InvalidShape,

    /// An array field whose arity must be exactly one
    #[error("{field} must contain exactly one entry, found {count}")]
    Cardinality { field: String, count: usize },
}

/// Failures inside the position compiler.
///
/// In best-effort mode these are logged and swallowed; strict mode returns
/// them so tests can pin individual branches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The skeleton template has no requestTemplate to compile into
    #[error("tool '{tool}' has no request template to compile")]
    MissingRequestTemplate { tool: String },

    /// An argument with an empty name cannot be placed anywhere
    #[error("tool '{tool}' declares an argument with an empty name")]
    EmptyArgumentName { tool: String },
}

// Convenience constructors, mirroring how callers build these inline.
impl DocumentError {
    /// Create a format error from any parser failure.
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    /// Create an unsupported-document error.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }
}

impl TemplateValidationError {
    /// Create a format error from a JSON parse failure.
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    /// Create a missing-required-field error for a requestTemplate field.
    pub fn required(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    /// Create a mutex violation naming every conflicting field.
    pub fn mutex(scope: impl Into<String>, conflicting: Vec<String>) -> Self {
        Self::MutexViolation {
            scope: scope.into(),
            conflicting,
        }
    }
}

// Result type aliases for convenience
pub type DocumentResult<T> = Result<T, DocumentError>;
pub type ValidationResult<T> = Result<T, Vec<TemplateValidationError>>;
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutex_violation_names_conflicting_fields() {
        let error = TemplateValidationError::mutex(
            "requestTemplate",
            vec!["body".into(), "argsToJsonBody".into()],
        );
        let message = error.to_string();
        assert!(message.contains("body"));
        assert!(message.contains("argsToJsonBody"));
    }

    #[test]
    fn required_field_message_names_the_field() {
        let error = TemplateValidationError::required("url");
        assert_eq!(error.to_string(), "requestTemplate.url is a required field");
    }

    #[test]
    fn invalid_enum_lists_offending_values() {
        let error = TemplateValidationError::InvalidEnum {
            values: vec!["form".into(), "fragment".into()],
        };
        assert!(error.to_string().contains("form, fragment"));
    }
}
