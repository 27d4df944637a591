//! CosmosAdapter against an in-memory node.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chainquery_core::{
    Backend, ChainAdapter, ErrorKind, JsonRpcRequest, JsonRpcResponse, RpcTransport,
    TransportError,
};
use chainquery_cosmos::CosmosAdapter;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

// ─── Mock node ────────────────────────────────────────────────────────────────

type Reply = Result<Value, TransportError>;

/// Serves queued replies per path, first match wins, and records every GET.
#[derive(Default)]
struct MockNode {
    routes: Mutex<Vec<(String, Reply)>>,
    requested: Mutex<Vec<String>>,
}

impl MockNode {
    fn new() -> Self {
        Self::default()
    }

    fn on(self, path: &str, reply: Reply) -> Self {
        self.routes.lock().unwrap().push((path.to_string(), reply));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcTransport for MockNode {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        panic!("Cosmos adapter must not POST {}", req.method);
    }

    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.requested.lock().unwrap().push(path.to_string());
        let mut routes = self.routes.lock().unwrap();
        let idx = routes
            .iter()
            .position(|(p, _)| p == path)
            .unwrap_or_else(|| panic!("unexpected GET {path}"));
        routes.remove(idx).1
    }

    fn url(&self) -> &str {
        "http://mock-cosmos"
    }
}

fn adapter(node: MockNode) -> (Arc<MockNode>, CosmosAdapter) {
    let node = Arc::new(node);
    (node.clone(), CosmosAdapter::new(node))
}

fn b64(s: &str) -> String {
    STANDARD.encode(s)
}

fn refused() -> TransportError {
    TransportError::Connect {
        url: "http://mock-cosmos".into(),
        reason: "connection refused".into(),
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

const HASH_UPPER: &str = "ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789";
const HASH_LOWER: &str = "abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789";

fn block_body(height: u64) -> Value {
    json!({
        "block_id": { "hash": "a1b2c3d4e5f6", "parts": { "total": 1, "hash": "ff" } },
        "block": {
            "header": {
                "chain_id": "cosmoshub-4",
                "height": height.to_string(),
                "time": "2024-03-01T12:00:00.123456789Z",
                "proposer_address": "83f47d7747b0f633a6ba0df49b7dcf61f90aa1b0"
            }
        }
    })
}

fn tx_body(hash: &str) -> Value {
    json!({
        "hash": hash,
        "height": "19639600",
        "index": 0,
        "tx_result": {
            "code": 0,
            "log": "",
            "gas_wanted": "200000",
            "gas_used": "81250",
            "events": [
                { "type": "tx", "attributes": [
                    { "key": b64("fee"), "value": b64("100uatom"), "index": true }
                ]},
                { "type": "message", "attributes": [
                    { "key": b64("action"), "value": b64("/cosmos.bank.v1beta1.MsgSend"), "index": true },
                    { "key": b64("sender"), "value": b64("cosmos1sender"), "index": true }
                ]}
            ]
        },
        "tx": "CpIBCo8BChwvY29zbW9z"
    })
}

// ─── Blocks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn block_hashes_are_upper_cased() {
    let (node, adapter) = adapter(MockNode::new().on("/block?height=19639600", Ok(block_body(19_639_600))));

    let block = adapter.block_by_height(19_639_600).await.unwrap();
    assert_eq!(block.height, 19_639_600);
    assert_eq!(block.time, "2024-03-01T12:00:00.123456789Z");
    assert_eq!(block.hash, "A1B2C3D4E5F6");
    assert_eq!(block.proposer_address, "83F47D7747B0F633A6BA0DF49B7DCF61F90AA1B0");
    assert_eq!(node.requested(), vec!["/block?height=19639600"]);
}

#[tokio::test]
async fn wrapped_block_payload_is_unwrapped() {
    let (_, adapter) = adapter(MockNode::new().on(
        "/block?height=5",
        Ok(json!({ "jsonrpc": "2.0", "id": -1, "result": block_body(5) })),
    ));
    let block = adapter.canonical_block(5).await.unwrap();
    assert_eq!(block.backend(), Backend::Cosmos);
    assert_eq!(block.height(), 5);
}

#[tokio::test]
async fn missing_proposer_becomes_empty() {
    let mut body = block_body(3);
    body["block"]["header"]
        .as_object_mut()
        .unwrap()
        .remove("proposer_address");
    let (_, adapter) = adapter(MockNode::new().on("/block?height=3", Ok(body)));
    assert_eq!(adapter.block_by_height(3).await.unwrap().proposer_address, "");
}

#[tokio::test]
async fn block_without_header_is_bad_gateway() {
    let (_, adapter) = adapter(MockNode::new().on(
        "/block?height=3",
        Ok(json!({ "block_id": { "hash": "AB" }, "block": { "data": {} } })),
    ));
    let err = adapter.block_by_height(3).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadGateway);
    assert_eq!(err.message(), "Invalid response from RPC node");
}

#[tokio::test]
async fn block_without_hash_is_bad_gateway() {
    let mut body = block_body(3);
    body["block_id"] = json!({});
    let (_, adapter) = adapter(MockNode::new().on("/block?height=3", Ok(body)));
    assert_eq!(
        adapter.block_by_height(3).await.unwrap_err().kind(),
        ErrorKind::BadGateway
    );
}

#[tokio::test]
async fn block_above_tip_is_not_found() {
    let (_, adapter) = adapter(MockNode::new().on(
        "/block?height=999999999",
        Ok(json!({
            "code": -32603,
            "message": "Internal error",
            "data": "height 999999999 must be less than or equal to the current blockchain height 19639600"
        })),
    ));
    let err = adapter.block_by_height(999_999_999).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn unreachable_node_is_bad_gateway() {
    let (_, adapter) = adapter(MockNode::new().on("/block?height=1", Err(refused())));
    let err = adapter.block_by_height(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadGateway);
    assert!(err.message().to_lowercase().contains("cannot connect"));
}

// ─── Transactions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn transaction_is_normalized() {
    let (node, adapter) = adapter(
        MockNode::new()
            .on(&format!("/tx?hash={HASH_UPPER}"), Ok(tx_body(HASH_UPPER)))
            .on("/block?height=19639600", Ok(block_body(19_639_600))),
    );

    let tx = adapter
        .transaction_by_hash(&format!("0x{HASH_LOWER}"))
        .await
        .unwrap();
    assert_eq!(tx.hash, HASH_UPPER);
    assert_eq!(tx.height, 19_639_600);
    assert_eq!(tx.time, "2024-03-01T12:00:00.123456789Z");
    assert_eq!(tx.gas_used, "81250");
    assert_eq!(tx.gas_wanted, "200000");
    assert_eq!(tx.fee, "100uatom");
    assert_eq!(tx.sender, "cosmos1sender");

    assert_eq!(
        node.requested(),
        vec![
            format!("/tx?hash={HASH_UPPER}"),
            "/block?height=19639600".to_string()
        ]
    );
}

#[tokio::test]
async fn lower_case_retry_after_not_found() {
    let (node, adapter) = adapter(
        MockNode::new()
            .on(
                &format!("/tx?hash={HASH_UPPER}"),
                Ok(json!({ "code": -32603, "message": "Internal error" })),
            )
            .on(&format!("/tx?hash={HASH_LOWER}"), Ok(tx_body(HASH_LOWER)))
            .on("/block?height=19639600", Ok(block_body(19_639_600))),
    );

    let tx = adapter.transaction_by_hash(HASH_UPPER).await.unwrap();
    assert_eq!(tx.hash, HASH_LOWER);
    assert_eq!(tx.fee, "100uatom");
    assert_eq!(
        node.requested()[..2],
        [format!("/tx?hash={HASH_UPPER}"), format!("/tx?hash={HASH_LOWER}")]
    );
}

#[tokio::test]
async fn failed_retry_surfaces_original_not_found() {
    let (node, adapter) = adapter(
        MockNode::new()
            .on(
                &format!("/tx?hash={HASH_UPPER}"),
                Ok(json!({ "code": 1, "data": "tx (ABCDEF) not found" })),
            )
            .on(&format!("/tx?hash={HASH_LOWER}"), Err(refused())),
    );

    let err = adapter.transaction_by_hash(HASH_LOWER).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "tx (ABCDEF) not found");
    assert_eq!(node.requested().len(), 2);
}

#[tokio::test]
async fn bad_gateway_is_not_retried() {
    let (node, adapter) = adapter(MockNode::new().on(
        &format!("/tx?hash={HASH_UPPER}"),
        Ok(json!({ "code": 5, "message": "node is syncing" })),
    ));

    let err = adapter.transaction_by_hash(HASH_UPPER).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadGateway);
    assert_eq!(node.requested().len(), 1);
}

#[tokio::test]
async fn missing_tx_result_is_bad_gateway() {
    let mut body = tx_body(HASH_UPPER);
    body.as_object_mut().unwrap().remove("tx_result");
    let (_, adapter) = adapter(MockNode::new().on(&format!("/tx?hash={HASH_UPPER}"), Ok(body)));

    let err = adapter.transaction_by_hash(HASH_UPPER).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadGateway);
    assert_eq!(err.message(), "Invalid transaction response from RPC node");
}

#[tokio::test]
async fn timestamp_falls_back_to_now_when_block_lookup_fails() {
    let (_, adapter) = adapter(
        MockNode::new()
            .on(&format!("/tx?hash={HASH_UPPER}"), Ok(tx_body(HASH_UPPER)))
            .on("/block?height=19639600", Err(refused())),
    );

    let before = Utc::now();
    let tx = adapter.transaction_by_hash(HASH_UPPER).await.unwrap();
    let after = Utc::now();

    let time = DateTime::parse_from_rfc3339(&tx.time)
        .unwrap()
        .with_timezone(&Utc);
    assert!(time >= before - chrono::Duration::seconds(1), "{time} < {before}");
    assert!(time <= after, "{time} > {after}");
    assert_eq!(tx.sender, "cosmos1sender");
}

#[tokio::test]
async fn timestamp_falls_back_to_now_when_header_has_no_time() {
    let mut block = block_body(19_639_600);
    block["block"]["header"].as_object_mut().unwrap().remove("time");
    let (_, adapter) = adapter(
        MockNode::new()
            .on(&format!("/tx?hash={HASH_UPPER}"), Ok(tx_body(HASH_UPPER)))
            .on("/block?height=19639600", Ok(block)),
    );

    let before = Utc::now();
    let tx = adapter.transaction_by_hash(HASH_UPPER).await.unwrap();
    let after = Utc::now();

    assert!(!tx.time.is_empty());
    let time = DateTime::parse_from_rfc3339(&tx.time)
        .unwrap()
        .with_timezone(&Utc);
    assert!(time >= before - chrono::Duration::seconds(1), "{time} < {before}");
    assert!(time <= after, "{time} > {after}");
}

#[tokio::test]
async fn canonical_transaction_keeps_backend_and_height() {
    let (_, adapter) = adapter(
        MockNode::new()
            .on(&format!("/tx?hash={HASH_UPPER}"), Ok(tx_body(HASH_UPPER)))
            .on("/block?height=19639600", Ok(block_body(19_639_600))),
    );

    let tx = adapter.canonical_transaction(HASH_LOWER).await.unwrap();
    assert_eq!(tx.backend(), Backend::Cosmos);
    assert_eq!(tx.hash(), HASH_UPPER);
    assert_eq!(tx.height(), Some(19_639_600));
}

#[tokio::test]
async fn unparseable_log_and_no_sender_gives_empty_sender() {
    let body = json!({
        "hash": HASH_UPPER,
        "height": "10",
        "tx_result": {
            "log": "failed to execute message; message index: 0: insufficient funds",
            "events": [
                { "type": "message", "attributes": [{ "key": b64("action"), "value": b64("send") }] }
            ]
        }
    });
    let (_, adapter) = adapter(
        MockNode::new()
            .on(&format!("/tx?hash={HASH_UPPER}"), Ok(body))
            .on("/block?height=10", Ok(block_body(10))),
    );

    let tx = adapter.transaction_by_hash(HASH_UPPER).await.unwrap();
    assert_eq!(tx.sender, "");
    assert_eq!(tx.fee, "0");
    assert_eq!(tx.gas_used, "0");
    assert_eq!(tx.gas_wanted, "0");
}
