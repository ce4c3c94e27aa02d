//! Security-reference overlay over persisted template text.
//!
//! Transparent auth means client-supplied credentials are passed through to
//! the backend instead of the gateway's own credential. The overlay injects
//! the scheme references into a template's JSON at read time; the stored
//! source is never mutated, and a template that gains nothing is returned
//! byte-for-byte so no spurious re-formatting reaches the author.

use crate::template::SecurityScheme;
use serde_json::{Map, Value, json};

/// Security fields read back out of a persisted template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityBindings {
    /// Backend scheme id (`requestTemplate.security.id`)
    pub scheme_id: Option<String>,
    /// Client-facing scheme id (top-level `security.id`)
    pub client_scheme_id: Option<String>,
    /// Whether the template marks client credentials as passed through
    pub transparent_auth: bool,
}

/// Project security scheme references into template text.
///
/// Returns `base` unchanged when transparent auth is off, the text is
/// empty, the text is not valid JSON (validation is a separate concern), or
/// neither id resolves against `schemes`. Otherwise the backend scheme is
/// injected as `requestTemplate.security` and the client scheme as a
/// top-level passthrough `security`, and the result is re-serialized as
/// pretty 2-space JSON. Idempotent: applying the overlay to its own output
/// with the same arguments yields the same text.
pub fn overlay_template(
    base: &str,
    transparent_auth: bool,
    backend_scheme_id: Option<&str>,
    client_scheme_id: Option<&str>,
    schemes: &[SecurityScheme],
) -> String {
    if !transparent_auth || base.is_empty() {
        return base.to_owned();
    }

    let Ok(mut template) = serde_json::from_str::<Value>(base) else {
        return base.to_owned();
    };
    if !template.is_object() {
        return base.to_owned();
    }

    fn resolves<'a>(id: Option<&'a str>, schemes: &[SecurityScheme]) -> Option<&'a str> {
        id.filter(|id| schemes.iter().any(|scheme| scheme.id == *id))
    }
    let mut modified = false;

    if let Some(id) = resolves(backend_scheme_id, schemes) {
        if let Some(fields) = template.as_object_mut() {
            let request = fields
                .entry("requestTemplate")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(request) = request.as_object_mut() {
                request.insert("security".into(), json!({ "id": id }));
                modified = true;
            }
        }
    }

    if let Some(id) = resolves(client_scheme_id, schemes) {
        if let Some(fields) = template.as_object_mut() {
            fields.insert("security".into(), json!({ "id": id, "passthrough": true }));
            modified = true;
        }
    }

    if modified {
        serde_json::to_string_pretty(&template).unwrap_or_else(|_| base.to_owned())
    } else {
        base.to_owned()
    }
}

/// Read the security bindings back out of persisted template text.
///
/// The inverse of [`overlay_template`], used when re-opening a tool for
/// editing. Malformed text yields empty bindings.
pub fn extract_security(template_text: &str) -> SecurityBindings {
    let Ok(template) = serde_json::from_str::<Value>(template_text) else {
        return SecurityBindings::default();
    };

    let scheme_id = template
        .get("requestTemplate")
        .and_then(|request| request.get("security"))
        .and_then(|security| security.get("id"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    let client_security = template.get("security");
    let client_scheme_id = client_security
        .and_then(|security| security.get("id"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let transparent_auth = client_security
        .and_then(|security| security.get("passthrough"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    SecurityBindings {
        scheme_id,
        client_scheme_id,
        transparent_auth,
    }
}
