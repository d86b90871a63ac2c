//! Single-resource envelope handling.
//!
//! Create, get, update, and enable all exchange an extension wrapped in a
//! one-key JSON object: `{"extension": {...}}`.

use pagerduty::{ApiError, ApiResponse};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::Extension;

/// Envelope key for a single extension.
pub const EXTENSION_KEY: &str = "extension";

#[derive(Serialize)]
struct ExtensionEnvelope<'a> {
    extension: &'a Extension,
}

/// Wraps `extension` as a request body under [`EXTENSION_KEY`].
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] if the extension cannot be represented as JSON.
pub fn wrap_extension(extension: &Extension) -> Result<Value, ApiError> {
    serde_json::to_value(ExtensionEnvelope { extension }).map_err(|err| {
        ApiError::InvalidRequest {
            message: err.to_string(),
        }
    })
}

/// Decodes `response` as a JSON object and projects the extension out of it.
///
/// A missing or `null` `"extension"` key is a contract violation by the
/// server and is reported as [`ApiError::Protocol`], never as an empty
/// extension.
///
/// # Errors
///
/// - [`ApiError::Decode`] if the body is not a JSON object, or the value
///   under the key is not an extension.
/// - [`ApiError::Protocol`] if the key is absent.
pub fn unwrap_extension_envelope(response: &ApiResponse) -> Result<Extension, ApiError> {
    let mut body: Map<String, Value> = response.decode_json()?;
    match body.remove(EXTENSION_KEY) {
        Some(Value::Null) | None => Err(ApiError::missing_field(EXTENSION_KEY)),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}
