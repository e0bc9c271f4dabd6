//! Block explorer REST client

use std::sync::Arc;

use mrx_primitives::{Address, Network, H256, U256};
use serde::Deserialize;
use serde_json::Value;

use super::confirm::Probe;
use crate::transport::{deserialize_response, RestTransport};
use crate::types::{ContractResponse, EventLog, EventLogs, EvmLog, TransactionReceipt};
use crate::utils::to_hex_address;
use crate::SdkError;

/// Logs requested per `/searchlogs` page
pub const LOG_PAGE_SIZE: u64 = 100;

/// Public explorer API for `network`; RegTest has none
pub fn default_explorer_url(network: Network) -> Option<&'static str> {
    match network {
        Network::MainNet => Some("https://explorer.metrixcoin.com/api"),
        Network::TestNet => Some("https://testnet-explorer.metrixcoin.com/api"),
        Network::RegTest => None,
    }
}

/// One page of `/searchlogs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    /// Logs matching the query across all pages
    #[serde(default)]
    pub total_count: u64,
    /// Logs on this page
    #[serde(default)]
    pub logs: Vec<ApiLog>,
}

/// Log entry as the explorer reports it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ApiLog {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub output_index: u32,
    #[serde(default)]
    pub block_hash: String,
    #[serde(default)]
    pub block_height: u64,
    #[serde(default)]
    pub timestamp: Option<u64>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub contract_address_hex: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address_hex: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

impl From<ApiLog> for EventLog {
    fn from(log: ApiLog) -> Self {
        EventLog {
            transaction_id: log.transaction_id,
            output_index: log.output_index,
            block_hash: log.block_hash,
            block_number: log.block_height,
            timestamp: log.timestamp,
            contract_address: log.contract_address_hex.unwrap_or(log.contract_address),
            address: log.address_hex.unwrap_or(log.address),
            topics: log.topics,
            data: log.data,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTransaction {
    #[serde(default)]
    id: String,
    #[serde(default)]
    hash: String,
    #[serde(default)]
    block_hash: Option<String>,
    #[serde(default)]
    block_height: Option<u64>,
    #[serde(default)]
    confirmations: Option<i64>,
    #[serde(default)]
    outputs: Vec<ApiOutput>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiOutput {
    #[serde(default)]
    receipt: Option<ApiReceipt>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiReceipt {
    #[serde(default)]
    sender: String,
    #[serde(default)]
    gas_used: u64,
    #[serde(default)]
    contract_address: String,
    #[serde(default)]
    contract_address_hex: Option<String>,
    #[serde(default)]
    excepted: String,
    #[serde(default)]
    excepted_message: Option<String>,
    #[serde(default)]
    logs: Vec<EvmLog>,
}

impl ApiTransaction {
    /// Receipt of the first contract output, or a transaction-level receipt
    /// when no output executed a contract
    fn into_receipt(self) -> TransactionReceipt {
        let transaction_hash = if self.hash.is_empty() { self.id } else { self.hash };
        let mut receipt = TransactionReceipt {
            confirmations: self.confirmations,
            block_hash: self.block_hash.unwrap_or_default(),
            block_number: self.block_height,
            transaction_hash,
            ..Default::default()
        };

        let Some(contract) = self.outputs.into_iter().find_map(|o| o.receipt) else {
            return receipt;
        };

        let from = match to_hex_address(&contract.sender) {
            Ok(hex) => hex,
            Err(e) => {
                tracing::debug!("Keeping undecodable sender {}: {}", contract.sender, e);
                contract.sender
            }
        };
        let contract_address = contract.contract_address_hex.unwrap_or(contract.contract_address);

        receipt.output_index = 1;
        receipt.from = from;
        receipt.to = contract_address.clone();
        receipt.contract_address = contract_address;
        receipt.gas_used = contract.gas_used;
        receipt.cumulative_gas_used = contract.gas_used;
        receipt.excepted = contract.excepted;
        receipt.excepted_message = contract.excepted_message.unwrap_or_default();
        receipt.logs = contract.logs;
        receipt
    }
}

/// Parse a balance reported as a decimal string or a number
fn parse_balance(value: &Value) -> U256 {
    match value {
        Value::String(s) => U256::from_dec_str(s).unwrap_or_default(),
        Value::Number(n) => n.as_u64().map(U256::from).unwrap_or_default(),
        _ => U256::zero(),
    }
}

/// Explorer REST client bound to one network
#[derive(Clone)]
pub struct ExplorerClient {
    network: Network,
    transport: Option<Arc<dyn RestTransport>>,
}

impl ExplorerClient {
    /// Client over a custom transport
    pub fn new(network: Network, transport: Arc<dyn RestTransport>) -> Self {
        Self {
            network,
            transport: Some(transport),
        }
    }

    /// Client for a network without an explorer; every request fails with
    /// [`SdkError::UnsupportedNetwork`]
    pub fn unsupported(network: Network) -> Self {
        Self {
            network,
            transport: None,
        }
    }

    /// HTTP client for the public explorer of `network`, or `explorer_url`
    /// when given
    #[cfg(feature = "http")]
    pub fn connect(network: Network, explorer_url: Option<&str>) -> Self {
        match explorer_url.or_else(|| default_explorer_url(network)) {
            Some(url) => Self::new(
                network,
                Arc::new(crate::transport::HttpRestTransport::new(url)),
            ),
            None => Self::unsupported(network),
        }
    }

    /// Network this client serves
    pub fn network(&self) -> Network {
        self.network
    }

    /// Whether requests can be made at all
    pub fn is_supported(&self) -> bool {
        self.transport.is_some()
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, SdkError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(SdkError::UnsupportedNetwork(self.network))?;
        tracing::debug!("GET {}", path);
        transport.get_json(path).await
    }

    /// Balance in satoshi; an absent response is zero
    pub async fn balance(&self, address: &Address) -> Result<U256, SdkError> {
        let path = format!("/address/{}", address.to_hex_unprefixed());
        Ok(self
            .get(&path)
            .await?
            .map(|body| parse_balance(&body["balance"]))
            .unwrap_or_default())
    }

    /// Read-only execution of `data` against `contract`
    pub async fn call(
        &self,
        contract: &Address,
        data: &[u8],
    ) -> Result<Option<ContractResponse>, SdkError> {
        let path = format!(
            "/contract/{}/call?data={}",
            contract.to_hex_unprefixed(),
            hex::encode(data)
        );
        self.get(&path).await?.map(deserialize_response).transpose()
    }

    /// Receipt for `txid`, if the explorer knows the transaction
    pub async fn transaction_receipt(
        &self,
        txid: &H256,
    ) -> Result<Option<TransactionReceipt>, SdkError> {
        let path = format!("/tx/{}", txid.to_hex_unprefixed());
        let tx: Option<ApiTransaction> =
            self.get(&path).await?.map(deserialize_response).transpose()?;
        Ok(tx.map(ApiTransaction::into_receipt))
    }

    /// One confirmation probe. Transport failures count as "not yet".
    pub async fn probe(&self, txid: &H256) -> Result<Probe, SdkError> {
        match self.transaction_receipt(txid).await {
            Ok(Some(receipt)) if receipt.is_confirmed() => Ok(Probe::Confirmed(vec![receipt])),
            Ok(Some(receipt)) if receipt.is_orphaned() => Ok(Probe::Orphaned),
            Ok(Some(receipt)) => Ok(Probe::Pending(Some(vec![receipt]))),
            Ok(None) => Ok(Probe::Pending(None)),
            Err(SdkError::UnsupportedNetwork(network)) => {
                Err(SdkError::UnsupportedNetwork(network))
            }
            Err(e) => {
                tracing::warn!("Explorer lookup of {} failed: {}", txid, e);
                Ok(Probe::Pending(None))
            }
        }
    }

    /// One `/searchlogs` page starting at `offset`
    pub async fn log_page(
        &self,
        contract: &Address,
        offset: u64,
    ) -> Result<Option<LogPage>, SdkError> {
        let path = format!(
            "/searchlogs?contract={}&limit={}&offset={}",
            contract.to_hex_unprefixed(),
            LOG_PAGE_SIZE,
            offset
        );
        self.get(&path).await?.map(deserialize_response).transpose()
    }

    /// Every log of `contract`, fetched in pages at offsets 0, 100, 200, ...
    /// until `totalCount` is covered or a page comes back empty
    pub async fn event_logs(&self, contract: &Address) -> Result<EventLogs, SdkError> {
        let Some(first) = self.log_page(contract, 0).await? else {
            tracing::debug!("No log page for {}", contract);
            return Ok(EventLogs::default());
        };

        let total_count = first.total_count;
        let mut logs: Vec<EventLog> = first.logs.into_iter().map(EventLog::from).collect();

        let mut offset = LOG_PAGE_SIZE;
        while offset < total_count {
            match self.log_page(contract, offset).await? {
                Some(page) if !page.logs.is_empty() => {
                    logs.extend(page.logs.into_iter().map(EventLog::from));
                }
                _ => {
                    tracing::debug!(
                        "Log page at offset {} for {} is empty, stopping",
                        offset,
                        contract
                    );
                    break;
                }
            }
            offset += LOG_PAGE_SIZE;
        }

        Ok(EventLogs { total_count, logs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockRestTransport;
    use serde_json::json;

    const SENDER: &str = "M9Mu2sGhrxzvE56RaUUvLh3hPFBQyUrqin";
    const SENDER_HEX: &str = "1006ab418af315023717b240b84e7cb31d3e6d98";

    fn client(rest: &MockRestTransport) -> ExplorerClient {
        ExplorerClient::new(Network::MainNet, Arc::new(rest.clone()))
    }

    fn contract() -> Address {
        Address::from_bytes([0x22; 20])
    }

    fn txid() -> H256 {
        H256::from_bytes([0xab; 32])
    }

    #[test]
    fn test_default_urls() {
        assert_eq!(
            default_explorer_url(Network::MainNet),
            Some("https://explorer.metrixcoin.com/api")
        );
        assert_eq!(
            default_explorer_url(Network::TestNet),
            Some("https://testnet-explorer.metrixcoin.com/api")
        );
        assert_eq!(default_explorer_url(Network::RegTest), None);
    }

    #[tokio::test]
    async fn test_balance_string_and_number() {
        let rest = MockRestTransport::new();
        let explorer = client(&rest);
        let addr = contract();
        let path = format!("/address/{}", addr.to_hex_unprefixed());

        rest.set_route(&path, json!({"balance": "123456789012"}));
        assert_eq!(explorer.balance(&addr).await.unwrap(), U256::from(123_456_789_012u64));

        rest.set_route(&path, json!({"balance": 42}));
        assert_eq!(explorer.balance(&addr).await.unwrap(), U256::from(42));

        rest.set_route(&path, json!({}));
        assert_eq!(explorer.balance(&addr).await.unwrap(), U256::zero());
    }

    #[tokio::test]
    async fn test_unsupported_network() {
        let explorer = ExplorerClient::unsupported(Network::RegTest);
        assert!(!explorer.is_supported());
        assert!(matches!(
            explorer.balance(&contract()).await,
            Err(SdkError::UnsupportedNetwork(Network::RegTest))
        ));
        assert!(explorer.probe(&txid()).await.is_err());
    }

    #[tokio::test]
    async fn test_receipt_from_contract_output() {
        let rest = MockRestTransport::new();
        rest.set_route(
            &format!("/tx/{}", txid().to_hex_unprefixed()),
            json!({
                "id": txid().to_hex_unprefixed(),
                "hash": txid().to_hex_unprefixed(),
                "blockHash": "bb",
                "blockHeight": 900,
                "confirmations": 2,
                "outputs": [
                    {"value": "0"},
                    {"receipt": {
                        "sender": SENDER,
                        "gasUsed": 51234,
                        "contractAddress": "MContractBase58",
                        "contractAddressHex": contract().to_hex_unprefixed(),
                        "excepted": "None",
                        "exceptedMessage": "",
                        "logs": [{
                            "address": "MContractBase58",
                            "addressHex": contract().to_hex_unprefixed(),
                            "topics": [],
                            "data": ""
                        }]
                    }}
                ]
            }),
        );

        let receipt = client(&rest).transaction_receipt(&txid()).await.unwrap().unwrap();
        assert!(receipt.is_confirmed());
        assert_eq!(receipt.block_number, Some(900));
        assert_eq!(receipt.from, SENDER_HEX);
        assert_eq!(receipt.contract_address, contract().to_hex_unprefixed());
        assert_eq!(receipt.gas_used, 51234);
        assert_eq!(receipt.output_index, 1);
        assert_eq!(receipt.logs.len(), 1);
    }

    #[tokio::test]
    async fn test_receipt_without_contract_output() {
        let rest = MockRestTransport::new();
        rest.set_route(
            &format!("/tx/{}", txid().to_hex_unprefixed()),
            json!({"id": "ab", "confirmations": 0, "outputs": [{"value": "5"}]}),
        );
        let receipt = client(&rest).transaction_receipt(&txid()).await.unwrap().unwrap();
        assert_eq!(receipt.transaction_hash, "ab");
        assert_eq!(receipt.confirmations, Some(0));
        assert!(receipt.logs.is_empty());
    }

    #[tokio::test]
    async fn test_status_states() {
        let rest = MockRestTransport::new();
        let explorer = client(&rest);
        let path = format!("/tx/{}", txid().to_hex_unprefixed());

        assert_eq!(explorer.probe(&txid()).await.unwrap(), Probe::Pending(None));

        rest.set_route(&path, json!({"confirmations": 0}));
        assert!(matches!(explorer.probe(&txid()).await.unwrap(), Probe::Pending(Some(_))));

        rest.set_route(&path, json!({"confirmations": -1}));
        assert_eq!(explorer.probe(&txid()).await.unwrap(), Probe::Orphaned);

        rest.set_route(&path, json!({"confirmations": 6}));
        assert!(matches!(explorer.probe(&txid()).await.unwrap(), Probe::Confirmed(_)));
    }

    #[tokio::test]
    async fn test_transport_error_is_pending() {
        let rest = MockRestTransport::new();
        rest.fail_route(&format!("/tx/{}", txid().to_hex_unprefixed()));
        assert_eq!(client(&rest).probe(&txid()).await.unwrap(), Probe::Pending(None));
    }

    fn page(total: u64, count: usize, start: usize) -> Value {
        let logs: Vec<Value> = (start..start + count)
            .map(|i| {
                json!({
                    "transactionId": format!("{:064x}", i),
                    "blockHeight": i,
                    "contractAddressHex": contract().to_hex_unprefixed(),
                    "addressHex": contract().to_hex_unprefixed(),
                    "topics": [],
                    "data": ""
                })
            })
            .collect();
        json!({"totalCount": total, "logs": logs})
    }

    fn page_path(offset: u64) -> String {
        format!(
            "/searchlogs?contract={}&limit=100&offset={}",
            contract().to_hex_unprefixed(),
            offset
        )
    }

    #[tokio::test]
    async fn test_event_logs_single_page() {
        let rest = MockRestTransport::new();
        rest.set_route(&page_path(0), page(3, 3, 0));
        let logs = client(&rest).event_logs(&contract()).await.unwrap();
        assert_eq!(logs.total_count, 3);
        assert_eq!(logs.logs.len(), 3);
        assert_eq!(rest.requests(), vec![page_path(0)]);
    }

    #[tokio::test]
    async fn test_event_logs_stop_on_empty_page() {
        let rest = MockRestTransport::new();
        rest.set_route(&page_path(0), page(500, 100, 0));
        rest.set_route(&page_path(100), page(500, 0, 0));
        let logs = client(&rest).event_logs(&contract()).await.unwrap();
        assert_eq!(logs.total_count, 500);
        assert_eq!(logs.logs.len(), 100);
        assert_eq!(rest.requests(), vec![page_path(0), page_path(100)]);
    }

    #[tokio::test]
    async fn test_event_logs_absent() {
        let rest = MockRestTransport::new();
        let logs = client(&rest).event_logs(&contract()).await.unwrap();
        assert_eq!(logs, EventLogs::default());
    }
}
