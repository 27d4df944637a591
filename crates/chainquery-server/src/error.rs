//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use chainquery_core::{ErrorKind, QueryError};

/// Anything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// The path parameter is malformed.
    BadRequest(String),
    /// The adapter failed.
    Query(QueryError),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Query(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::BadGateway => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, message) = match self {
            Self::BadRequest(msg) => ("Bad Request".to_string(), msg.clone()),
            Self::Query(e) => (e.kind().to_string(), e.message().to_string()),
        };
        ErrorBody {
            status_code: self.status().as_u16(),
            error,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Query(QueryError::BadGateway { message, upstream }) = &self {
            tracing::warn!(%message, upstream = ?upstream, "upstream node failure");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
