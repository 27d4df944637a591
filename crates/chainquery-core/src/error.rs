//! Transport failures and the two-kind query error taxonomy.
//!
//! Every failure a caller can observe from an adapter is a [`QueryError`]:
//! either the requested block/transaction does not exist (`NotFound`) or the
//! backend could not give a usable answer (`BadGateway`). Raw transport
//! failures are turned into one of the two by [`QueryError::from_transport`].

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to a node, before any
/// backend-specific interpretation of the payload.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The node could not be reached (connection refused, DNS failure).
    #[error("cannot connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The node answered with a non-success HTTP status.
    ///
    /// `body` holds the response body when it was valid JSON.
    #[error("HTTP {status}")]
    Status { status: u16, body: Option<Value> },

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Any other HTTP-level failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be decoded.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Returns `true` if the node was unreachable.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// The decoded JSON body of a non-success response, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// The kind of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadGateway,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Not Found"),
            Self::BadGateway => write!(f, "Bad Gateway"),
        }
    }
}

/// A classified query failure.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The requested height or hash does not exist on the backend.
    #[error("{message}")]
    NotFound { message: String },

    /// The backend is unreachable, malformed, or reported an unrecognized error.
    #[error("{message}")]
    BadGateway {
        message: String,
        /// Diagnostic payload from the node, when one was returned.
        upstream: Option<Value>,
    },
}

impl QueryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::BadGateway {
            message: message.into(),
            upstream: None,
        }
    }

    /// A `BadGateway` that keeps the node's error payload for diagnostics.
    pub fn bad_gateway_with(message: impl Into<String>, upstream: Value) -> Self {
        Self::BadGateway {
            message: message.into(),
            upstream: Some(upstream),
        }
    }

    /// The node answered, but not with the shape we expected.
    pub fn invalid_response() -> Self {
        Self::bad_gateway("Invalid response from RPC node")
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::BadGateway { .. } => ErrorKind::BadGateway,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message } | Self::BadGateway { message, .. } => message,
        }
    }

    pub fn upstream(&self) -> Option<&Value> {
        match self {
            Self::BadGateway { upstream, .. } => upstream.as_ref(),
            Self::NotFound { .. } => None,
        }
    }

    /// Classify a transport failure.
    ///
    /// HTTP 404 is the only transport failure that maps to `NotFound`; an
    /// unreachable node is always `BadGateway`.
    pub fn from_transport(err: TransportError) -> Self {
        match err {
            TransportError::Connect { .. } => Self::bad_gateway("Cannot connect to RPC node"),
            TransportError::Status { status: 404, .. } => Self::not_found("Resource not found"),
            TransportError::Status { status, body } => {
                let detail = body
                    .as_ref()
                    .and_then(body_message)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                Self::BadGateway {
                    message: format!("RPC Error: {detail}"),
                    upstream: body,
                }
            }
            TransportError::Timeout { ms } => {
                Self::bad_gateway(format!("RPC request failed: timed out after {ms}ms"))
            }
            TransportError::Http(msg) => Self::bad_gateway(format!("RPC request failed: {msg}")),
            TransportError::Deserialization(e) => {
                Self::bad_gateway(format!("Failed to communicate with RPC node: {e}"))
            }
        }
    }
}

impl From<TransportError> for QueryError {
    fn from(err: TransportError) -> Self {
        Self::from_transport(err)
    }
}

/// Human-readable detail from an error body: `error`, then `message`.
fn body_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}
