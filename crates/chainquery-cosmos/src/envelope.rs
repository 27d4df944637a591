//! Error-envelope detection for Tendermint REST-RPC payloads.
//!
//! A node signals failure in-band in one of two ways:
//! - a top-level non-zero `code` with `message` / `data` beside it;
//! - a JSON-RPC envelope `{"jsonrpc","id","error":{code,message,data}}`,
//!   often delivered with a non-success HTTP status.
//!
//! Successful JSON-RPC envelopes are unwrapped to their `result`.

use serde_json::Value;

use chainquery_core::error::{QueryError, TransportError};

/// Tendermint's "internal error" code, used for unknown heights and hashes.
pub const CODE_INTERNAL_ERROR: i64 = -32603;

/// Unwrap a payload, or classify the error it carries.
pub fn unwrap_payload(body: Value) -> Result<Value, QueryError> {
    if let Some(err) = detect_error(&body) {
        return Err(err);
    }
    match body {
        Value::Object(mut map) if map.contains_key("jsonrpc") && map.contains_key("result") => {
            Ok(map.remove("result").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

/// Classify a transport failure, preferring an error envelope in its body.
pub fn classify_transport(err: TransportError) -> QueryError {
    if let Some(classified) = err.body().and_then(detect_error) {
        return classified;
    }
    QueryError::from_transport(err)
}

/// The classified error carried by `body`, if it is an error envelope.
pub fn detect_error(body: &Value) -> Option<QueryError> {
    if let Some(inner) = body.get("error").filter(|e| e.is_object()) {
        return Some(classify(inner, body));
    }
    if body.get("code").is_some_and(is_error_code) {
        return Some(classify(body, body));
    }
    None
}

fn is_error_code(code: &Value) -> bool {
    match code {
        Value::Null => false,
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// `-32603` or a message mentioning "not found" is `NotFound`; anything
/// else is `BadGateway` carrying the node's message.
fn classify(error: &Value, upstream: &Value) -> QueryError {
    let message = error_message(error);
    let code = error.get("code").and_then(Value::as_i64);

    if code == Some(CODE_INTERNAL_ERROR) || message.to_lowercase().contains("not found") {
        QueryError::not_found(message)
    } else {
        QueryError::bad_gateway_with(format!("RPC Error: {message}"), upstream.clone())
    }
}

/// `data` when it is a string, else `message`, else a placeholder.
fn error_message(error: &Value) -> String {
    let text = |key: &str| {
        error
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    text("data")
        .or_else(|| text("message"))
        .unwrap_or("Unknown RPC error")
        .to_string()
}
