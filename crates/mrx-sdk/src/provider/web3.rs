//! Wallet bridge provider
//!
//! Calls and sends go through the browser wallet's `rawCall` bridge, which
//! signs with the wallet's active account. Balances, receipts and logs come
//! from the explorer of the same network.

use std::sync::Arc;

use async_trait::async_trait;
use mrx_primitives::{Address, Network, H256, U256};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::confirm::{self, ConfirmationOutcome, PollPolicy};
use super::explorer::ExplorerClient;
use super::{attach_events, decode_call_response, encode_for_call, LogFilter, Provider, SendOptions};
use crate::abi::{Abi, Token};
use crate::transport::{deserialize_response, Transport};
use crate::types::{ContractResponse, EventLogs, TxHandle};
use crate::SdkError;

/// Provider over a wallet bridge plus the explorer
#[derive(Clone)]
pub struct Web3Provider {
    bridge: Arc<dyn Transport>,
    explorer: ExplorerClient,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl Web3Provider {
    /// Provider over `bridge`, reading chain state from `explorer`
    pub fn new(bridge: Arc<dyn Transport>, explorer: ExplorerClient) -> Self {
        Self {
            bridge,
            explorer,
            policy: PollPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Override the confirmation polling cadence
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stop confirmation waits when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn bridged(&self) -> bool {
        matches!(self.explorer.network(), Network::MainNet | Network::TestNet)
    }

    async fn raw_call(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        tracing::debug!("rawCall {}", method);
        self.bridge.request_json(method, params).await
    }
}

/// Handle from a `sendtocontract` bridge response; a response without a
/// txid means the wallet did not broadcast
fn handle_from_response(value: Value) -> Result<TxHandle, SdkError> {
    let has_txid = value
        .get("txid")
        .and_then(Value::as_str)
        .is_some_and(|txid| !txid.is_empty());
    if !has_txid {
        tracing::warn!("Wallet returned no txid, treating the send as not submitted");
        return Ok(TxHandle::not_submitted());
    }
    deserialize_response(value)
}

#[async_trait]
impl Provider for Web3Provider {
    fn network(&self) -> Network {
        self.explorer.network()
    }

    async fn balance(&self, address: &Address) -> U256 {
        match self.explorer.balance(address).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!("Balance lookup for {} failed: {}", address, e);
                U256::zero()
            }
        }
    }

    async fn call_contract(
        &self,
        contract: &Address,
        method: &str,
        args: &[Token],
        abi: &Abi,
    ) -> Option<Vec<Token>> {
        if !self.bridged() {
            tracing::warn!("Wallet bridge does not serve {}", self.network());
            return None;
        }
        let data = encode_for_call(abi, method, args)?;
        let params = vec![json!(contract.to_hex_unprefixed()), json!(hex::encode(&data))];

        let response = match self.raw_call("callcontract", params).await {
            Ok(value) => deserialize_response::<ContractResponse>(value),
            Err(e) => Err(e),
        };
        match response {
            Ok(response) => decode_call_response(abi, method, &response),
            Err(e) => {
                tracing::warn!("Call to {} on {} failed: {}", method, contract, e);
                None
            }
        }
    }

    async fn send_to_contract(
        &self,
        contract: &Address,
        method: &str,
        args: &[Token],
        options: &SendOptions,
        abi: &Abi,
    ) -> Result<TxHandle, SdkError> {
        if !self.bridged() {
            return Err(SdkError::UnsupportedNetwork(self.network()));
        }
        let data = abi.encode_call(method, args)?;
        let params = vec![
            json!(contract.to_hex_unprefixed()),
            json!(hex::encode(&data)),
            json!(options.value),
            json!(options.gas_limit),
            json!(options.gas_price),
        ];

        let handle = handle_from_response(self.raw_call("sendtocontract", params).await?)?;
        if handle.is_submitted() {
            tracing::info!("Sent {} to {} in {}", method, contract, handle.txid);
        }
        Ok(handle)
    }

    async fn wait_for_confirmation(
        &self,
        tx: &TxHandle,
        abi: &Abi,
        contract: Option<&Address>,
    ) -> ConfirmationOutcome {
        let txid: &H256 = &tx.txid;
        let outcome = confirm::wait_for_confirmation(txid, &self.policy, &self.cancel, || {
            self.explorer.probe(txid)
        })
        .await;
        attach_events(outcome, abi, contract)
    }

    async fn get_event_logs(&self, contract: &Address) -> Result<EventLogs, SdkError> {
        self.explorer.event_logs(contract).await
    }

    async fn search_event_logs(&self, _filter: &LogFilter) -> Result<EventLogs, SdkError> {
        Err(SdkError::NotImplemented(
            "searchEventLogs is not available through the wallet bridge".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockRestTransport, MockTransport};

    fn abi() -> Abi {
        Abi::parse(&[
            "function name() view returns (string)",
            "function approve(address spender, uint256 amount) returns (bool)",
        ])
        .unwrap()
    }

    fn contract() -> Address {
        Address::from_bytes([0x22; 20])
    }

    fn provider(
        network: Network,
        bridge: &MockTransport,
        rest: &MockRestTransport,
    ) -> Web3Provider {
        Web3Provider::new(
            Arc::new(bridge.clone()),
            ExplorerClient::new(network, Arc::new(rest.clone())),
        )
    }

    #[tokio::test]
    async fn test_call_through_bridge() {
        let bridge = MockTransport::new();
        let rest = MockRestTransport::new();
        let output = crate::abi::encode_params(
            &[crate::abi::ParamType::String],
            &[Token::String("Metrix Token".to_string())],
        )
        .unwrap();
        bridge.set_response(
            "callcontract",
            json!({"executionResult": {"excepted": "None", "output": hex::encode(output)}}),
        );

        let result = provider(Network::MainNet, &bridge, &rest)
            .call_contract(&contract(), "name", &[], &abi())
            .await;
        assert_eq!(result, Some(vec![Token::String("Metrix Token".to_string())]));

        let (method, params) = &bridge.calls()[0];
        assert_eq!(method, "callcontract");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], json!(contract().to_hex_unprefixed()));
        assert_eq!(params[1], json!("06fdde03"));
    }

    #[tokio::test]
    async fn test_send_params() {
        let bridge = MockTransport::new();
        let rest = MockRestTransport::new();
        bridge.set_response(
            "sendtocontract",
            json!({"txid": "ef".repeat(32), "sender": "MSender", "hash160": "aa"}),
        );
        let options = SendOptions::default().with_gas_limit(300_000);
        let handle = provider(Network::TestNet, &bridge, &rest)
            .send_to_contract(
                &contract(),
                "approve",
                &[Token::Address(Address::ZERO), Token::Uint(U256::from(10))],
                &options,
                &abi(),
            )
            .await
            .unwrap();
        assert!(handle.is_submitted());

        let params = &bridge.calls()[0].1;
        assert_eq!(params[2], json!("0"));
        assert_eq!(params[3], json!(300_000));
        assert_eq!(params[4], json!(5000));
    }

    #[tokio::test]
    async fn test_send_without_txid_is_not_submitted() {
        let bridge = MockTransport::new();
        let rest = MockRestTransport::new();
        bridge.set_response("sendtocontract", json!({"error": "User rejected"}));
        let provider = provider(Network::MainNet, &bridge, &rest);
        let handle = provider
            .send_to_contract(
                &contract(),
                "approve",
                &[Token::Address(Address::ZERO), Token::Uint(U256::zero())],
                &SendOptions::default(),
                &abi(),
            )
            .await
            .unwrap();
        assert_eq!(handle, TxHandle::not_submitted());

        let receipts = provider.get_tx_receipts(&handle, &abi(), None).await;
        assert!(receipts.is_empty());
        assert!(rest.requests().is_empty());
    }

    #[tokio::test]
    async fn test_regtest_is_not_bridged() {
        let bridge = MockTransport::new();
        let rest = MockRestTransport::new();
        let provider = provider(Network::RegTest, &bridge, &rest);

        assert!(provider
            .call_contract(&contract(), "name", &[], &abi())
            .await
            .is_none());
        let sent = provider
            .send_to_contract(&contract(), "name", &[], &SendOptions::default(), &abi())
            .await;
        assert!(matches!(sent, Err(SdkError::UnsupportedNetwork(Network::RegTest))));
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_not_implemented() {
        let bridge = MockTransport::new();
        let rest = MockRestTransport::new();
        let result = provider(Network::MainNet, &bridge, &rest)
            .search_event_logs(&LogFilter::new(contract()))
            .await;
        assert!(matches!(result, Err(SdkError::NotImplemented(_))));
    }
}
