//! chainquery-server: HTTP API over the EVM and Cosmos adapters.
//!
//! `NotFound` maps to 404, `BadGateway` to 502, malformed path parameters
//! to 400. Every error body is `{"statusCode", "error", "message"}`.

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;

use chainquery_core::TransportError;
use chainquery_cosmos::CosmosAdapter;
use chainquery_evm::EvmAdapter;
use chainquery_http::{HttpTransport, HttpTransportConfig};

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use routes::{router, HashFormat};
pub use telemetry::{init_tracing, LogConfig};

/// Build HTTP transports and adapters for both nodes and wire the router.
pub fn build_app(config: &ServerConfig) -> Result<Router, TransportError> {
    let transport_config = HttpTransportConfig {
        request_timeout: config.rpc_timeout,
    };
    let evm = HttpTransport::new(&config.evm_rpc, transport_config.clone())?;
    let cosmos = HttpTransport::new(&config.cosmos_rpc, transport_config)?;

    Ok(router(
        Arc::new(EvmAdapter::new(Arc::new(evm))),
        Arc::new(CosmosAdapter::new(Arc::new(cosmos))),
    ))
}
