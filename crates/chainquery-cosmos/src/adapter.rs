//! Cosmos adapter: `/block` and `/tx` over Tendermint REST-RPC.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use chainquery_core::error::QueryError;
use chainquery_core::transport::RpcTransport;
use chainquery_core::types::{Backend, CosmosBlock, CosmosTransaction};
use chainquery_core::ChainAdapter;

use crate::envelope;
use crate::events::{extract_fee, extract_sender, gas_string, TxResult};

// ─── Wire payloads ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct BlockResponse {
    #[serde(default)]
    block_id: Option<BlockId>,
    #[serde(default)]
    block: Option<BlockBody>,
}

#[derive(Debug, Deserialize)]
struct BlockId {
    #[serde(default)]
    hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlockBody {
    #[serde(default)]
    header: Option<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(default)]
    height: Option<Value>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    proposer_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    height: Option<Value>,
    #[serde(default)]
    tx_result: Option<TxResult>,
}

// ─── Adapter ──────────────────────────────────────────────────────────────────

/// Query adapter for a Tendermint/Cosmos RPC node.
pub struct CosmosAdapter {
    transport: Arc<dyn RpcTransport>,
}

impl CosmosAdapter {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        tracing::info!(url = %transport.url(), "initializing Cosmos adapter");
        Self { transport }
    }

    /// GET `path` and return the payload with any envelope stripped.
    async fn fetch(&self, path: &str) -> Result<Value, QueryError> {
        let body = self.transport.get(path).await.map_err(|e| {
            tracing::error!(path, url = %self.transport.url(), error = %e, "RPC call failed");
            envelope::classify_transport(e)
        })?;
        envelope::unwrap_payload(body)
    }

    /// GET `/tx?hash=…`, retrying once with the lower-case hash on `NotFound`.
    async fn fetch_tx(&self, upper: &str) -> Result<Value, QueryError> {
        let original = match self.fetch(&format!("/tx?hash={upper}")).await {
            Ok(payload) => return Ok(payload),
            Err(e) if e.is_not_found() => e,
            Err(e) => return Err(e),
        };

        let lower = upper.to_lowercase();
        tracing::warn!(hash = %upper, "transaction not found, retrying with lower-case hash");
        match self.fetch(&format!("/tx?hash={lower}")).await {
            Ok(payload) => Ok(payload),
            Err(retry) => {
                tracing::debug!(hash = %lower, error = %retry, "lower-case lookup failed");
                Err(original)
            }
        }
    }

    /// Time of the block at `height`, or now if the block cannot be fetched.
    async fn block_time(&self, height: u64) -> String {
        match self.block_by_height(height).await {
            Ok(block) if !block.time.is_empty() => block.time,
            Ok(_) => {
                tracing::warn!(height, "block header has no timestamp, using current time");
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            }
            Err(e) => {
                tracing::warn!(height, error = %e, "failed to get block timestamp, using current time");
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            }
        }
    }
}

#[async_trait]
impl ChainAdapter for CosmosAdapter {
    type Block = CosmosBlock;
    type Transaction = CosmosTransaction;

    fn backend(&self) -> Backend {
        Backend::Cosmos
    }

    async fn block_by_height(&self, height: u64) -> Result<CosmosBlock, QueryError> {
        let payload = self.fetch(&format!("/block?height={height}")).await?;
        let raw: BlockResponse = decode(payload)?;

        let hash = raw.block_id.and_then(|id| id.hash).filter(|h| !h.is_empty());
        let header = raw.block.and_then(|b| b.header);
        let (Some(header), Some(hash)) = (header, hash) else {
            tracing::error!(height, "invalid block structure");
            return Err(QueryError::invalid_response());
        };

        Ok(CosmosBlock {
            height: parse_height(header.height.as_ref())?,
            time: header.time.unwrap_or_default(),
            hash: hash.to_uppercase(),
            proposer_address: header.proposer_address.unwrap_or_default().to_uppercase(),
        })
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<CosmosTransaction, QueryError> {
        let upper = strip_0x(hash).to_uppercase();
        let raw: TxResponse = decode(self.fetch_tx(&upper).await?)?;

        let Some(tx_result) = raw.tx_result else {
            tracing::error!(hash, "invalid transaction structure");
            return Err(QueryError::bad_gateway(
                "Invalid transaction response from RPC node",
            ));
        };
        let height = parse_height(raw.height.as_ref())?;

        Ok(CosmosTransaction {
            hash: raw.hash.filter(|h| !h.is_empty()).unwrap_or(upper),
            height,
            time: self.block_time(height).await,
            gas_used: gas_string(tx_result.gas_used.as_ref()),
            gas_wanted: gas_string(tx_result.gas_wanted.as_ref()),
            fee: extract_fee(tx_result.events.as_deref()),
            sender: extract_sender(&tx_result),
        })
    }
}

fn strip_0x(hash: &str) -> &str {
    hash.strip_prefix("0x")
        .or_else(|| hash.strip_prefix("0X"))
        .unwrap_or(hash)
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, QueryError> {
    serde_json::from_value(payload).map_err(|e| {
        tracing::error!(error = %e, "unexpected payload shape");
        QueryError::bad_gateway(format!("Invalid response from RPC node: {e}"))
    })
}

/// Heights are decimal strings on Tendermint; plain numbers are accepted too.
fn parse_height(raw: Option<&Value>) -> Result<u64, QueryError> {
    let parsed = match raw {
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        QueryError::bad_gateway(format!(
            "Invalid height in RPC response: {}",
            raw.map(Value::to_string).unwrap_or_else(|| "missing".into())
        ))
    })
}
