//! Canonical block and transaction views returned to callers.
//!
//! Each entity lives for exactly one request: built after a successful
//! backend call, handed to the caller, dropped. Field names serialize in
//! camelCase.

use serde::{Deserialize, Serialize};

// ─── Backend ──────────────────────────────────────────────────────────────────

/// The RPC dialect an adapter speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Ethereum-style JSON-RPC 2.0.
    Evm,
    /// Tendermint/Cosmos-style REST-RPC.
    Cosmos,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Evm => write!(f, "evm"),
            Self::Cosmos => write!(f, "cosmos"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "evm" => Ok(Self::Evm),
            "cosmos" => Ok(Self::Cosmos),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

// ─── EVM ──────────────────────────────────────────────────────────────────────

/// Block view for an EVM node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmBlock {
    pub height: u64,
    pub hash: String,
    pub parent_hash: Option<String>,
    /// Opaque node-native quantity (usually `0x…`).
    pub gas_limit: Option<String>,
    /// Opaque node-native quantity (usually `0x…`).
    pub gas_used: Option<String>,
    /// Block size in bytes.
    pub size: Option<u64>,
}

/// Transaction view for an EVM node.
///
/// The three pricing fields are `None` when the node omits them; which of
/// them are present depends on the transaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransaction {
    pub hash: String,
    /// `None` for contract creation.
    pub to: Option<String>,
    pub from: String,
    /// Value in wei, as returned by the node.
    pub value: String,
    pub input: String,
    pub max_fee_per_gas: Option<String>,
    pub max_priority_fee_per_gas: Option<String>,
    pub gas_price: Option<String>,
    /// `None` while the transaction is pending.
    pub block_number: Option<u64>,
    pub gas: Option<String>,
}

// ─── Cosmos ───────────────────────────────────────────────────────────────────

/// Block view for a Tendermint/Cosmos node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosBlock {
    pub height: u64,
    /// Block time as reported by the header (RFC 3339).
    pub time: String,
    /// Upper-case hex.
    pub hash: String,
    /// Upper-case hex; empty when the header has none.
    pub proposer_address: String,
}

/// Transaction view for a Tendermint/Cosmos node.
///
/// `gas_used`, `gas_wanted` and `fee` are never absent: they fall back to
/// `"0"`. `sender` falls back to `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosTransaction {
    pub hash: String,
    pub height: u64,
    /// Time of the containing block, or the lookup time if that block
    /// could not be fetched.
    pub time: String,
    pub gas_used: String,
    pub gas_wanted: String,
    /// Fee with denomination, e.g. `"5000uatom"`.
    pub fee: String,
    pub sender: String,
}

// ─── Canonical ────────────────────────────────────────────────────────────────

/// A block from either backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CanonicalBlock {
    Evm(EvmBlock),
    Cosmos(CosmosBlock),
}

impl CanonicalBlock {
    pub fn backend(&self) -> Backend {
        match self {
            Self::Evm(_) => Backend::Evm,
            Self::Cosmos(_) => Backend::Cosmos,
        }
    }

    pub fn height(&self) -> u64 {
        match self {
            Self::Evm(b) => b.height,
            Self::Cosmos(b) => b.height,
        }
    }

    pub fn hash(&self) -> &str {
        match self {
            Self::Evm(b) => &b.hash,
            Self::Cosmos(b) => &b.hash,
        }
    }
}

impl From<EvmBlock> for CanonicalBlock {
    fn from(block: EvmBlock) -> Self {
        Self::Evm(block)
    }
}

impl From<CosmosBlock> for CanonicalBlock {
    fn from(block: CosmosBlock) -> Self {
        Self::Cosmos(block)
    }
}

/// A transaction from either backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CanonicalTransaction {
    Evm(EvmTransaction),
    Cosmos(CosmosTransaction),
}

impl CanonicalTransaction {
    pub fn backend(&self) -> Backend {
        match self {
            Self::Evm(_) => Backend::Evm,
            Self::Cosmos(_) => Backend::Cosmos,
        }
    }

    pub fn hash(&self) -> &str {
        match self {
            Self::Evm(tx) => &tx.hash,
            Self::Cosmos(tx) => &tx.hash,
        }
    }

    /// Height of the containing block, if the transaction is mined.
    pub fn height(&self) -> Option<u64> {
        match self {
            Self::Evm(tx) => tx.block_number,
            Self::Cosmos(tx) => Some(tx.height),
        }
    }
}

impl From<EvmTransaction> for CanonicalTransaction {
    fn from(tx: EvmTransaction) -> Self {
        Self::Evm(tx)
    }
}

impl From<CosmosTransaction> for CanonicalTransaction {
    fn from(tx: CosmosTransaction) -> Self {
        Self::Cosmos(tx)
    }
}
