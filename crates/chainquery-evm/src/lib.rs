//! # chainquery-evm
//!
//! EVM JSON-RPC adapter for ChainQuery.
//!
//! ## Calls
//! - block by height → `eth_getBlockByNumber(["0x<hex height>", false])`
//! - transaction by hash → `eth_getTransactionByHash(["<hash>"])`
//!
//! A `null` result is `NotFound`. A JSON-RPC `error` object is `NotFound`
//! when its message mentions "not found", otherwise `BadGateway`.
//!
//! ## Normalization
//! `number` and `size` are decoded from hex to integers. `hash`,
//! `parentHash`, `gasLimit` and `gasUsed` pass through as opaque strings.

pub mod adapter;
pub mod hex;

pub use adapter::{classify_rpc_error, EvmAdapter};
pub use hex::{encode_height, parse_hex_u64, HexError};
