//! The `RpcTransport` trait: the seam between adapters and the network.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Request id used for every JSON-RPC envelope.
pub const DEFAULT_REQUEST_ID: i64 = 1;

/// One outbound call against a single node base URL.
///
/// Implementations issue exactly one network request per method call and
/// never retry. They hold no per-request state, so a single instance can be
/// shared by concurrent callers.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// POST a JSON-RPC request to the base URL and decode the envelope.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// GET `{base}{path}` and return the decoded JSON body.
    ///
    /// `path` starts with `/` and may carry a query string.
    async fn get(&self, path: &str) -> Result<Value, TransportError>;

    /// The normalized base URL (no trailing slash).
    fn url(&self) -> &str;

    /// Convenience: build the envelope for `method` and send it.
    async fn call(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<JsonRpcResponse, TransportError> {
        self.send(JsonRpcRequest::new(DEFAULT_REQUEST_ID, method, params))
            .await
    }
}

/// Strip a single trailing `/` from a base URL.
pub fn normalize_base_url(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        sent: Mutex<Vec<JsonRpcRequest>>,
    }

    #[async_trait]
    impl RpcTransport for Recording {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            self.sent.lock().unwrap().push(req);
            Ok(JsonRpcResponse::success(DEFAULT_REQUEST_ID, Value::Null))
        }

        async fn get(&self, _path: &str) -> Result<Value, TransportError> {
            Ok(Value::Null)
        }

        fn url(&self) -> &str {
            "http://node"
        }
    }

    #[tokio::test]
    async fn call_builds_envelope_with_id_one() {
        let transport = Recording {
            sent: Mutex::new(Vec::new()),
        };
        transport
            .call("eth_getTransactionByHash", vec![Value::String("0xab".into())])
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].jsonrpc, "2.0");
        assert_eq!(sent[0].method, "eth_getTransactionByHash");
        assert_eq!(sent[0].id, crate::request::RpcId::Number(1));
    }

    #[test]
    fn normalize_strips_one_trailing_slash() {
        assert_eq!(normalize_base_url("http://node:8545/"), "http://node:8545");
        assert_eq!(normalize_base_url("http://node:8545"), "http://node:8545");
        assert_eq!(normalize_base_url("http://node//"), "http://node/");
    }
}
