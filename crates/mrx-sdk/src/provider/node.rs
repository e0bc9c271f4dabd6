//! MetrixRpcClient - full node JSON-RPC client

use std::sync::Arc;

use mrx_primitives::{Address, H256, U256};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::transport::{deserialize_response, MockTransport, Transport};
use crate::types::{ContractResponse, TransactionReceipt, TxHandle};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Wallet view of a transaction (`gettransaction`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletTransaction {
    /// Transaction id
    #[serde(default)]
    pub txid: String,
    /// Confirmation count: 0 pending, >0 settled, -1 orphaned
    #[serde(default)]
    pub confirmations: i64,
    /// Block hash, once mined
    #[serde(default, rename = "blockhash")]
    pub block_hash: Option<String>,
}

/// Metrix node client for RPC communication
#[derive(Clone)]
pub struct MetrixRpcClient {
    transport: Arc<dyn Transport>,
}

impl MetrixRpcClient {
    /// Connect to a node over HTTP with rpcuser/rpcpassword
    #[cfg(feature = "http")]
    pub fn connect(url: &str, user: Option<&str>, password: Option<&str>) -> Self {
        let mut transport = HttpTransport::new(url);
        if let Some(user) = user {
            transport = transport.with_basic_auth(user, password.unwrap_or_default());
        }
        Self::with_transport(transport)
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client sharing an existing transport
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Helper method to make RPC request and deserialize
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    // ==================== Chain Info ====================

    /// Current chain height
    pub async fn get_block_count(&self) -> Result<u64, SdkError> {
        self.request("getblockcount", vec![]).await
    }

    // ==================== Transactions ====================

    /// Wallet transaction details
    pub async fn get_transaction(&self, txid: &H256) -> Result<WalletTransaction, SdkError> {
        self.request("gettransaction", vec![json!(txid.to_hex_unprefixed())])
            .await
    }

    /// Contract receipts of a transaction; empty until it is mined
    pub async fn get_transaction_receipt(
        &self,
        txid: &H256,
    ) -> Result<Vec<TransactionReceipt>, SdkError> {
        let value = self
            .transport
            .request_json("gettransactionreceipt", vec![json!(txid.to_hex_unprefixed())])
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        deserialize_response(value)
    }

    // ==================== Contracts ====================

    /// Read-only execution of `data` against `contract`
    pub async fn call_contract(
        &self,
        contract: &Address,
        data: &[u8],
        sender: Option<&str>,
    ) -> Result<ContractResponse, SdkError> {
        let mut params = vec![
            json!(contract.to_hex_unprefixed()),
            json!(hex::encode(data)),
        ];
        if let Some(sender) = sender {
            params.push(json!(sender));
        }
        self.request("callcontract", params).await
    }

    /// Broadcast a contract call.
    ///
    /// `amount` and `gas_price` are decimal MRX strings.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_to_contract(
        &self,
        contract: &Address,
        data: &[u8],
        amount: &str,
        gas_limit: u64,
        gas_price: &str,
        sender: &str,
        change_to_sender: bool,
    ) -> Result<TxHandle, SdkError> {
        self.request(
            "sendtocontract",
            vec![
                json!(contract.to_hex_unprefixed()),
                json!(hex::encode(data)),
                json!(amount),
                json!(gas_limit),
                json!(gas_price),
                json!(sender),
                json!(true),
                json!(change_to_sender),
            ],
        )
        .await
    }

    // ==================== Accounts ====================

    /// Balance of a contract account in satoshi
    pub async fn get_account_balance(&self, address: &Address) -> Result<U256, SdkError> {
        let info: Value = self
            .request("getaccountinfo", vec![json!(address.to_hex_unprefixed())])
            .await?;
        Ok(match &info["balance"] {
            Value::Number(n) => n.as_u64().map(U256::from).unwrap_or_default(),
            Value::String(s) => U256::from_dec_str(s).unwrap_or_default(),
            _ => U256::zero(),
        })
    }

    /// Base58 form of a hex address, as the node encodes it
    pub async fn from_hex_address(&self, hex: &str) -> Result<String, SdkError> {
        self.request("fromhexaddress", vec![json!(hex)]).await
    }

    // ==================== Logs ====================

    /// `searchlogs from to {"addresses"} {"topics"} minconf`; `to_block`
    /// `None` searches to the tip
    pub async fn search_logs(
        &self,
        from_block: u64,
        to_block: Option<u64>,
        addresses: &[Address],
        topics: &[Option<H256>],
        min_confirmations: u32,
    ) -> Result<Vec<TransactionReceipt>, SdkError> {
        let to_block = to_block.map_or(json!(-1), |b| json!(b));
        let addresses: Vec<String> = addresses.iter().map(|a| a.to_hex_unprefixed()).collect();
        let topics = if topics.is_empty() {
            Value::Null
        } else {
            let topics: Vec<Value> = topics
                .iter()
                .map(|t| t.map_or(Value::Null, |t| json!(t.to_hex_unprefixed())))
                .collect();
            json!({ "topics": topics })
        };

        let value = self
            .transport
            .request_json(
                "searchlogs",
                vec![
                    json!(from_block),
                    to_block,
                    json!({ "addresses": addresses }),
                    topics,
                    json!(min_confirmations),
                ],
            )
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        deserialize_response(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(mock: &MockTransport) -> MetrixRpcClient {
        MetrixRpcClient::with_transport(mock.clone())
    }

    #[tokio::test]
    async fn test_client_mock_block_count() {
        let client = MetrixRpcClient::new_mock();
        assert_eq!(client.get_block_count().await.unwrap(), 100_000);
    }

    #[tokio::test]
    async fn test_get_transaction() {
        let mock = MockTransport::new();
        mock.set_response("gettransaction", json!({"txid": "ab", "confirmations": -1}));
        let tx = client_with(&mock)
            .get_transaction(&H256::from_bytes([0xab; 32]))
            .await
            .unwrap();
        assert_eq!(tx.confirmations, -1);
        assert_eq!(mock.calls()[0].1, vec![json!("ab".repeat(32))]);
    }

    #[tokio::test]
    async fn test_empty_receipt_list() {
        let mock = MockTransport::new();
        let client = client_with(&mock);
        let txid = H256::from_bytes([1; 32]);
        assert!(client.get_transaction_receipt(&txid).await.unwrap().is_empty());
        mock.set_response("gettransactionreceipt", Value::Null);
        assert!(client.get_transaction_receipt(&txid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_to_contract_params() {
        let mock = MockTransport::new();
        mock.set_response(
            "sendtocontract",
            json!({
                "txid": "11".repeat(32),
                "sender": "MSender",
                "hash160": "1006ab418af315023717b240b84e7cb31d3e6d98"
            }),
        );
        let contract = Address::from_bytes([0x22; 20]);
        let handle = client_with(&mock)
            .send_to_contract(&contract, &[0xde, 0xad], "0", 250_000, "0.00005000", "MSender", true)
            .await
            .unwrap();
        assert!(handle.is_submitted());

        let (method, params) = &mock.calls()[0];
        assert_eq!(method, "sendtocontract");
        assert_eq!(params[0], json!(contract.to_hex_unprefixed()));
        assert_eq!(params[1], json!("dead"));
        assert_eq!(params[3], json!(250_000));
        assert_eq!(params[4], json!("0.00005000"));
        assert_eq!(params[6], json!(true));
    }

    #[tokio::test]
    async fn test_account_balance() {
        let mock = MockTransport::new();
        mock.set_response("getaccountinfo", json!({"address": "22", "balance": 7000}));
        let balance = client_with(&mock)
            .get_account_balance(&Address::ZERO)
            .await
            .unwrap();
        assert_eq!(balance, U256::from(7000));
    }

    #[tokio::test]
    async fn test_search_logs_params() {
        let mock = MockTransport::new();
        mock.set_response("searchlogs", json!([]));
        let contract = Address::from_bytes([0x22; 20]);
        let topic = H256::from_bytes([0x33; 32]);

        let client = client_with(&mock);
        client.search_logs(10, None, &[contract], &[], 1).await.unwrap();
        client
            .search_logs(10, Some(20), &[contract], &[None, Some(topic)], 1)
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].1[1], json!(-1));
        assert_eq!(calls[0].1[2], json!({"addresses": [contract.to_hex_unprefixed()]}));
        assert_eq!(calls[0].1[3], Value::Null);
        assert_eq!(calls[1].1[1], json!(20));
        assert_eq!(
            calls[1].1[3],
            json!({"topics": [Value::Null, topic.to_hex_unprefixed()]})
        );
    }
}
