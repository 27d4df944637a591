//! chainquery-http: HTTP transport for ChainQuery.
//!
//! # Quick start
//! ```rust,no_run
//! use chainquery_http::HttpTransport;
//!
//! let transport = HttpTransport::default_for("http://localhost:8545/")?;
//! assert_eq!(chainquery_core::RpcTransport::url(&transport), "http://localhost:8545");
//! # Ok::<(), chainquery_core::TransportError>(())
//! ```

pub mod client;

pub use client::{HttpTransport, HttpTransportConfig};
