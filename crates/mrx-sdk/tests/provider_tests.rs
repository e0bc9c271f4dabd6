//! Provider integration tests for mrx-sdk
//!
//! Confirmation polling and log pagination against mocked backends.

use std::sync::Arc;

use mrx_sdk::abi::Abi;
use mrx_sdk::types::TxHandle;
use mrx_sdk::{
    Address, ApiProvider, ConfirmationOutcome, ExplorerClient, MetrixRpcClient, MockRestTransport,
    MockTransport, Network, PollPolicy, Provider, RpcProvider, H256,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

fn abi() -> Abi {
    Abi::parse(&["function pause()", "event Paused(address account)"]).unwrap()
}

fn txid() -> H256 {
    H256::from_bytes([0xab; 32])
}

fn handle() -> TxHandle {
    TxHandle::new(txid(), "MSender", "00")
}

fn contract() -> Address {
    Address::from_bytes([0x22; 20])
}

fn rpc_provider(mock: &MockTransport) -> RpcProvider {
    RpcProvider::new(Network::TestNet, MetrixRpcClient::with_transport(mock.clone()))
        .with_sender("M9Mu2sGhrxzvE56RaUUvLh3hPFBQyUrqin")
}

fn explorer_provider(rest: &MockRestTransport) -> ApiProvider {
    ApiProvider::new(ExplorerClient::new(Network::TestNet, Arc::new(rest.clone())))
}

fn receipt_json() -> Value {
    json!([{
        "transactionHash": "ab".repeat(32),
        "contractAddress": contract().to_hex_unprefixed(),
        "excepted": "None",
        "log": []
    }])
}

// ==================== Zero txid ====================

#[tokio::test]
async fn test_zero_txid_makes_no_calls() {
    let mock = MockTransport::new();
    let rest = MockRestTransport::new();
    let not_submitted = TxHandle::not_submitted();

    let receipts = rpc_provider(&mock)
        .get_tx_receipts(&not_submitted, &abi(), Some(&contract()))
        .await;
    assert!(receipts.is_empty());
    assert!(mock.calls().is_empty());

    let outcome = explorer_provider(&rest)
        .wait_for_confirmation(&not_submitted, &abi(), None)
        .await;
    assert!(matches!(outcome, ConfirmationOutcome::NotSubmitted));
    assert!(rest.requests().is_empty());
}

// ==================== Node polling ====================

#[tokio::test]
async fn test_rpc_orphan_on_first_poll() {
    let mock = MockTransport::new();
    mock.set_response("gettransaction", json!({"txid": "ab".repeat(32), "confirmations": -1}));
    mock.set_response("gettransactionreceipt", receipt_json());

    let receipts = rpc_provider(&mock)
        .get_tx_receipts(&handle(), &abi(), Some(&contract()))
        .await;

    assert!(receipts.is_empty());
    assert_eq!(mock.call_count("gettransaction"), 1);
    assert_eq!(mock.call_count("gettransactionreceipt"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rpc_confirms_after_pending_polls() {
    let mock = MockTransport::new();
    mock.push_response("gettransaction", json!({"confirmations": 0}));
    mock.push_response("gettransaction", json!({"confirmations": 0}));
    mock.set_response("gettransaction", json!({"confirmations": 2}));
    mock.set_response("gettransactionreceipt", receipt_json());

    let outcome = rpc_provider(&mock)
        .wait_for_confirmation(&handle(), &abi(), Some(&contract()))
        .await;

    let ConfirmationOutcome::Confirmed(receipts) = outcome else {
        panic!("expected confirmation");
    };
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].confirmations, Some(2));
    assert_eq!(mock.call_count("gettransaction"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rpc_polling_is_bounded() {
    let mock = MockTransport::new();
    mock.set_response("gettransaction", json!({"confirmations": 0}));
    mock.set_response("gettransactionreceipt", Value::Null);

    let outcome = rpc_provider(&mock)
        .wait_for_confirmation(&handle(), &abi(), None)
        .await;

    assert!(matches!(outcome, ConfirmationOutcome::Exhausted(ref r) if r.is_empty()));
    assert_eq!(
        mock.call_count("gettransaction"),
        PollPolicy::default().max_attempts as usize
    );
}

#[tokio::test(start_paused = true)]
async fn test_rpc_polling_cancelled() {
    let mock = MockTransport::new();
    mock.set_response("gettransaction", json!({"confirmations": 0}));
    mock.set_response("gettransactionreceipt", Value::Null);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = rpc_provider(&mock)
        .with_cancellation(cancel)
        .wait_for_confirmation(&handle(), &abi(), None)
        .await;

    assert!(matches!(outcome, ConfirmationOutcome::Cancelled(_)));
    assert!(mock.call_count("gettransaction") <= 1);
}

// ==================== Explorer pagination ====================

fn log_path(offset: u64) -> String {
    format!(
        "/searchlogs?contract={}&limit=100&offset={}",
        contract().to_hex_unprefixed(),
        offset
    )
}

fn log_page(total_count: u64, start: u64, len: u64) -> Value {
    let logs: Vec<Value> = (start..start + len)
        .map(|i| {
            json!({
                "transactionId": format!("{:064x}", i),
                "blockHeight": i,
                "contractAddress": contract().to_hex_unprefixed(),
                "address": contract().to_hex_unprefixed(),
                "topics": [format!("{:064x}", 1)],
                "data": ""
            })
        })
        .collect();
    json!({"totalCount": total_count, "logs": logs})
}

#[tokio::test]
async fn test_event_logs_linear_pagination() {
    let rest = MockRestTransport::new();
    rest.set_route(&log_path(0), log_page(250, 0, 100));
    rest.set_route(&log_path(100), log_page(250, 100, 100));
    rest.set_route(&log_path(200), log_page(250, 200, 50));

    let logs = explorer_provider(&rest).get_event_logs(&contract()).await.unwrap();

    assert_eq!(logs.total_count, 250);
    assert_eq!(logs.logs.len(), 250);
    assert_eq!(
        rest.requests(),
        vec![log_path(0), log_path(100), log_path(200)]
    );
}

#[tokio::test]
async fn test_event_logs_stop_on_empty_page() {
    let rest = MockRestTransport::new();
    rest.set_route(&log_path(0), log_page(500, 0, 100));
    rest.set_route(&log_path(100), log_page(500, 100, 0));

    let logs = explorer_provider(&rest).get_event_logs(&contract()).await.unwrap();

    assert_eq!(logs.total_count, 500);
    assert_eq!(logs.logs.len(), 100);
    assert_eq!(rest.requests().len(), 2);
}

#[tokio::test]
async fn test_event_logs_absent_contract() {
    let rest = MockRestTransport::new();
    let logs = explorer_provider(&rest).get_event_logs(&contract()).await.unwrap();
    assert_eq!(logs.total_count, 0);
    assert!(logs.logs.is_empty());
}
