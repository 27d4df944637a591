//! EVM adapter: `eth_getBlockByNumber` / `eth_getTransactionByHash` over JSON-RPC.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use chainquery_core::error::QueryError;
use chainquery_core::request::JsonRpcError;
use chainquery_core::transport::RpcTransport;
use chainquery_core::types::{Backend, EvmBlock, EvmTransaction};
use chainquery_core::ChainAdapter;

use crate::hex::{encode_height, parse_hex_u64};

/// Block object as returned by `eth_getBlockByNumber(_, false)`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcBlock {
    number: Option<String>,
    hash: Option<String>,
    parent_hash: Option<String>,
    gas_limit: Option<String>,
    gas_used: Option<String>,
    size: Option<String>,
}

/// Transaction object as returned by `eth_getTransactionByHash`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcTransaction {
    hash: Option<String>,
    to: Option<String>,
    from: Option<String>,
    value: Option<String>,
    input: Option<String>,
    max_fee_per_gas: Option<String>,
    max_priority_fee_per_gas: Option<String>,
    gas_price: Option<String>,
    block_number: Option<String>,
    gas: Option<String>,
}

/// Query adapter for an Ethereum-style JSON-RPC node.
pub struct EvmAdapter {
    transport: Arc<dyn RpcTransport>,
}

impl EvmAdapter {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        tracing::info!(url = %transport.url(), "initializing EVM adapter");
        Self { transport }
    }

    /// Call `method` and return a non-null `result`.
    async fn call_rpc(&self, method: &str, params: Vec<Value>) -> Result<Value, QueryError> {
        let resp = self.transport.call(method, params).await.map_err(|e| {
            tracing::error!(method, url = %self.transport.url(), error = %e, "RPC call failed");
            QueryError::from_transport(e)
        })?;

        match resp.into_result() {
            Err(err) => {
                tracing::debug!(method, error = %err, "node returned an error object");
                Err(classify_rpc_error(err))
            }
            Ok(Value::Null) => Err(QueryError::not_found("Resource not found")),
            Ok(result) => Ok(result),
        }
    }
}

#[async_trait]
impl ChainAdapter for EvmAdapter {
    type Block = EvmBlock;
    type Transaction = EvmTransaction;

    fn backend(&self) -> Backend {
        Backend::Evm
    }

    async fn block_by_height(&self, height: u64) -> Result<EvmBlock, QueryError> {
        let result = self
            .call_rpc("eth_getBlockByNumber", vec![json!(encode_height(height)), json!(false)])
            .await?;
        normalize_block(decode(result)?)
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<EvmTransaction, QueryError> {
        let result = self
            .call_rpc("eth_getTransactionByHash", vec![json!(hash)])
            .await?;
        normalize_transaction(decode(result)?)
    }
}

/// Classify a JSON-RPC error object.
///
/// A message containing "not found" (any case) is `NotFound`; anything else
/// is `BadGateway` carrying the code and message.
pub fn classify_rpc_error(err: JsonRpcError) -> QueryError {
    if err.message.to_lowercase().contains("not found") {
        return QueryError::not_found(format!("Resource not found: {}", err.message));
    }
    QueryError::BadGateway {
        message: format!("RPC Error: {} (code: {})", err.message, err.code),
        upstream: serde_json::to_value(&err).ok(),
    }
}

fn decode<T: DeserializeOwned>(result: Value) -> Result<T, QueryError> {
    serde_json::from_value(result).map_err(|e| {
        tracing::error!(error = %e, "unexpected result shape");
        QueryError::bad_gateway(format!("Invalid response from RPC node: {e}"))
    })
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn parse_quantity(field: Option<&str>) -> Result<Option<u64>, QueryError> {
    field
        .map(parse_hex_u64)
        .transpose()
        .map_err(|e| QueryError::bad_gateway(format!("Invalid response from RPC node: {e}")))
}

fn normalize_block(raw: RpcBlock) -> Result<EvmBlock, QueryError> {
    let height = parse_quantity(raw.number.as_deref())?.ok_or_else(QueryError::invalid_response)?;
    let hash = non_empty(raw.hash).ok_or_else(QueryError::invalid_response)?;

    Ok(EvmBlock {
        height,
        hash,
        parent_hash: raw.parent_hash,
        gas_limit: raw.gas_limit,
        gas_used: raw.gas_used,
        size: parse_quantity(raw.size.as_deref())?,
    })
}

fn normalize_transaction(raw: RpcTransaction) -> Result<EvmTransaction, QueryError> {
    let hash = non_empty(raw.hash).ok_or_else(QueryError::invalid_response)?;

    Ok(EvmTransaction {
        hash,
        to: raw.to,
        from: raw.from.unwrap_or_default(),
        value: raw.value.unwrap_or_default(),
        input: raw.input.unwrap_or_default(),
        max_fee_per_gas: non_empty(raw.max_fee_per_gas),
        max_priority_fee_per_gas: non_empty(raw.max_priority_fee_per_gas),
        gas_price: non_empty(raw.gas_price),
        block_number: parse_quantity(raw.block_number.as_deref())?,
        gas: non_empty(raw.gas),
    })
}
