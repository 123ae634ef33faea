//! Envelope decoding.
//!
//! Shape checks only: the body must be a JSON object. Missing or `null`
//! fields take their zero value and unknown fields are ignored.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::types::Envelope;

/// Decode a response body into an [`Envelope`].
pub fn decode(body: &[u8]) -> ClientResult<Envelope> {
    let value: JsonValue = serde_json::from_slice(body).map_err(|e| ClientError::Decode {
        message: if body.is_empty() {
            "empty response body".to_string()
        } else {
            e.to_string()
        },
    })?;

    if !value.is_object() {
        return Err(ClientError::Decode {
            message: format!("expected JSON object, got {}", json_type_name(&value)),
        });
    }

    let envelope: Envelope = serde_json::from_value(value).map_err(|e| ClientError::Decode {
        message: e.to_string(),
    })?;

    debug!(?envelope, "decoded envelope");
    Ok(envelope)
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
