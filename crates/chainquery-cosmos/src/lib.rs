//! # chainquery-cosmos
//!
//! Tendermint/Cosmos REST-RPC adapter for ChainQuery.
//!
//! ## Calls
//! - block by height → `GET /block?height=<h>`
//! - transaction by hash → `GET /tx?hash=<HASH>`, then once more with the
//!   lower-case hash if the node reports the upper-case one as not found
//!
//! A transaction payload carries no timestamp; it is taken from the
//! containing block, or the current time if that block cannot be fetched.
//! Sender and fee are recovered from the transaction's events (see
//! [`events`]).
//!
//! Block and proposer hashes are returned upper-case.

pub mod adapter;
pub mod envelope;
pub mod events;

pub use adapter::CosmosAdapter;
pub use events::{decode_base64, extract_fee, extract_sender, Attribute, Event, TxResult};
