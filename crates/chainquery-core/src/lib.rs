//! chainquery-core: foundation traits and types for ChainQuery.
//!
//! # Overview
//!
//! ChainQuery answers two questions, "block at height N" and "transaction
//! with hash H", over structurally different node APIs (EVM JSON-RPC and
//! Tendermint/Cosmos REST-RPC). The core crate defines:
//!
//! - [`RpcTransport`]: the async trait every transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: wire types
//! - [`TransportError`]: raw transport failures
//! - [`QueryError`]: the NotFound / BadGateway taxonomy callers observe
//! - [`ChainAdapter`]: the uniform query interface
//! - [`types`]: canonical block and transaction views

pub mod adapter;
pub mod error;
pub mod request;
pub mod transport;
pub mod types;

pub use adapter::ChainAdapter;
pub use error::{ErrorKind, QueryError, TransportError};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::{normalize_base_url, RpcTransport};
pub use types::{
    Backend, CanonicalBlock, CanonicalTransaction, CosmosBlock, CosmosTransaction, EvmBlock,
    EvmTransaction,
};
