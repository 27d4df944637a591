//! Route table and handlers.
//!
//! ```text
//! GET /health
//! GET /evm/block/:height
//! GET /evm/transactions/:hash
//! GET /cosmos/block/:height
//! GET /cosmos/transactions/:hash
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use chainquery_core::ChainAdapter;

use crate::error::ApiError;

/// Accepted shape of a transaction hash path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFormat {
    /// `0x` followed by 64 hex digits.
    Prefixed,
    /// 64 hex digits, `0x` optional, any case.
    OptionalPrefix,
}

impl HashFormat {
    pub fn validate(self, hash: &str) -> Result<(), ApiError> {
        let (digits, message) = match self {
            Self::Prefixed => (
                hash.strip_prefix("0x"),
                "Hash must be a valid 64-character hex string starting with 0x",
            ),
            Self::OptionalPrefix => (
                Some(
                    hash.strip_prefix("0x")
                        .or_else(|| hash.strip_prefix("0X"))
                        .unwrap_or(hash),
                ),
                "Hash must be a valid 64-character hex string",
            ),
        };
        match digits {
            Some(d) if d.len() == 64 && d.bytes().all(|b| b.is_ascii_hexdigit()) => Ok(()),
            _ => Err(ApiError::BadRequest(message.to_string())),
        }
    }
}

/// Parse a block height path parameter (decimal digits only).
pub fn parse_height(raw: &str) -> Result<u64, ApiError> {
    let invalid = || ApiError::BadRequest("Validation failed (numeric string is expected)".into());
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

/// The full application router.
pub fn router<E, C>(evm: Arc<E>, cosmos: Arc<C>) -> Router
where
    E: ChainAdapter,
    C: ChainAdapter,
{
    Router::new()
        .route("/health", get(health))
        .nest("/evm", chain_routes(evm, HashFormat::Prefixed))
        .nest("/cosmos", chain_routes(cosmos, HashFormat::OptionalPrefix))
        .layer(TraceLayer::new_for_http())
}

struct ChainState<A> {
    adapter: Arc<A>,
    hashes: HashFormat,
}

impl<A> Clone for ChainState<A> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
            hashes: self.hashes,
        }
    }
}

fn chain_routes<A: ChainAdapter>(adapter: Arc<A>, hashes: HashFormat) -> Router {
    Router::new()
        .route("/block/:height", get(block::<A>))
        .route("/transactions/:hash", get(transaction::<A>))
        .with_state(ChainState { adapter, hashes })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn block<A: ChainAdapter>(
    State(state): State<ChainState<A>>,
    Path(height): Path<String>,
) -> Result<Json<A::Block>, ApiError> {
    let height = parse_height(&height)?;
    tracing::debug!(backend = %state.adapter.backend(), height, "block lookup");
    Ok(Json(state.adapter.block_by_height(height).await?))
}

async fn transaction<A: ChainAdapter>(
    State(state): State<ChainState<A>>,
    Path(hash): Path<String>,
) -> Result<Json<A::Transaction>, ApiError> {
    state.hashes.validate(&hash)?;
    tracing::debug!(backend = %state.adapter.backend(), hash = %hash, "transaction lookup");
    Ok(Json(state.adapter.transaction_by_hash(&hash).await?))
}
