//! SDK types
//!
//! Wire shapes shared by the explorer, node and wallet-bridge backends. Hex
//! strings coming off the wire are kept without a `0x` prefix.

use std::collections::BTreeMap;

use mrx_primitives::{Address, H256};
use serde::{Deserialize, Deserializer, Serialize};

use crate::abi::{Abi, DecodedEvent};
use crate::SdkError;

/// Treat an explicit JSON `null` like a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Handle returned by a send, before the transaction confirms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    /// Transaction id
    pub txid: H256,
    /// Sender, as reported by the backend
    #[serde(default, deserialize_with = "nullable")]
    pub sender: String,
    /// Sender hash160 (hex)
    #[serde(default, deserialize_with = "nullable")]
    pub hash160: String,
}

impl TxHandle {
    /// Create a handle
    pub fn new(txid: H256, sender: impl Into<String>, hash160: impl Into<String>) -> Self {
        Self {
            txid,
            sender: sender.into(),
            hash160: hash160.into(),
        }
    }

    /// The "nothing was submitted" handle: zero txid, zero-address sender
    pub fn not_submitted() -> Self {
        let zero = Address::ZERO.to_hex_unprefixed();
        Self::new(H256::ZERO, zero.clone(), zero)
    }

    /// Whether a transaction was actually broadcast
    pub fn is_submitted(&self) -> bool {
        !self.txid.is_zero()
    }
}

/// One EVM log inside a receipt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmLog {
    /// Emitting contract; base58 on the explorer, hex on the node
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    /// Emitting contract as hex, when the explorer provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_hex: Option<String>,
    /// Topics (hex)
    #[serde(default, deserialize_with = "nullable")]
    pub topics: Vec<String>,
    /// Data (hex)
    #[serde(default, deserialize_with = "nullable")]
    pub data: String,
    /// Block timestamp, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl EvmLog {
    /// Emitting contract as hex
    pub fn emitter_hex(&self) -> &str {
        strip_0x(self.address_hex.as_deref().unwrap_or(&self.address))
    }

    /// Whether `contract` emitted this log
    pub fn is_from(&self, contract: &Address) -> bool {
        self.emitter_hex()
            .eq_ignore_ascii_case(&contract.to_hex_unprefixed())
    }

    /// Topics parsed as hashes
    pub fn topic_hashes(&self) -> Result<Vec<H256>, SdkError> {
        self.topics
            .iter()
            .map(|t| H256::from_hex(t).map_err(SdkError::from))
            .collect()
    }

    /// Data as bytes
    pub fn data_bytes(&self) -> Result<Vec<u8>, SdkError> {
        Ok(hex::decode(strip_0x(&self.data))?)
    }

    /// Decode against `abi`, carrying over the timestamp
    pub fn decode(&self, abi: &Abi) -> Result<DecodedEvent, SdkError> {
        let mut event = abi.decode_log(&self.topic_hashes()?, &self.data_bytes()?)?;
        event.timestamp = self.timestamp;
        Ok(event)
    }
}

/// Receipt of a contract execution
///
/// The node reports one receipt per contract output; the explorer path
/// builds one from the first output carrying a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Confirmation count: 0 pending, >0 settled, -1 orphaned
    #[serde(default)]
    pub confirmations: Option<i64>,
    /// Block hash
    #[serde(default, deserialize_with = "nullable")]
    pub block_hash: String,
    /// Block height
    #[serde(default)]
    pub block_number: Option<u64>,
    /// Transaction id
    #[serde(default, deserialize_with = "nullable")]
    pub transaction_hash: String,
    /// Index of the transaction in its block
    #[serde(default)]
    pub transaction_index: u32,
    /// Index of the contract output
    #[serde(default)]
    pub output_index: u32,
    /// Sender hash160
    #[serde(default, deserialize_with = "nullable")]
    pub from: String,
    /// Contract called
    #[serde(default, deserialize_with = "nullable")]
    pub to: String,
    /// Gas used up to and including this output
    #[serde(default)]
    pub cumulative_gas_used: u64,
    /// Gas used
    #[serde(default)]
    pub gas_used: u64,
    /// Contract address
    #[serde(default, deserialize_with = "nullable")]
    pub contract_address: String,
    /// Exception kind, `"None"` on success
    #[serde(default, deserialize_with = "nullable")]
    pub excepted: String,
    /// Exception message
    #[serde(default, deserialize_with = "nullable")]
    pub excepted_message: String,
    /// State root after execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_root: Option<String>,
    /// UTXO root after execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utxo_root: Option<String>,
    /// Raw logs
    #[serde(default, alias = "log", deserialize_with = "nullable")]
    pub logs: Vec<EvmLog>,
    /// Logs of the target contract decoded against its ABI
    #[serde(skip)]
    pub events: Vec<DecodedEvent>,
}

impl TransactionReceipt {
    /// Settled in at least one block
    pub fn is_confirmed(&self) -> bool {
        self.confirmations.is_some_and(|c| c > 0)
    }

    /// Reorganised out of the chain
    pub fn is_orphaned(&self) -> bool {
        self.confirmations == Some(-1)
    }

    /// Whether the execution threw
    pub fn is_excepted(&self) -> bool {
        !self.excepted.is_empty() && self.excepted != "None"
    }

    /// Decode every log emitted by `contract` into [`Self::events`].
    ///
    /// A log that does not decode is skipped.
    pub fn attach_events(&mut self, abi: &Abi, contract: &Address) {
        self.events = self
            .logs
            .iter()
            .filter(|log| log.is_from(contract))
            .filter_map(|log| match log.decode(abi) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::debug!(
                        "Skipping undecodable log in {}: {}",
                        self.transaction_hash,
                        e
                    );
                    None
                }
            })
            .collect();
    }

    /// Decoded events grouped by name
    pub fn events_by_name(&self) -> BTreeMap<&str, Vec<&DecodedEvent>> {
        let mut grouped: BTreeMap<&str, Vec<&DecodedEvent>> = BTreeMap::new();
        for event in &self.events {
            grouped.entry(event.name.as_str()).or_default().push(event);
        }
        grouped
    }
}

/// Historical log entry, normalised across backends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    /// Transaction id
    pub transaction_id: String,
    /// Contract output index
    pub output_index: u32,
    /// Block hash
    pub block_hash: String,
    /// Block height
    pub block_number: u64,
    /// Block timestamp, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Contract that was called (hex)
    pub contract_address: String,
    /// Contract that emitted the log (hex)
    pub address: String,
    /// Topics (hex)
    pub topics: Vec<String>,
    /// Data (hex)
    pub data: String,
}

impl EventLog {
    /// Flatten the logs of a receipt returned by the node's `searchlogs`
    pub fn from_receipt(receipt: &TransactionReceipt) -> Vec<EventLog> {
        receipt
            .logs
            .iter()
            .map(|log| EventLog {
                transaction_id: receipt.transaction_hash.clone(),
                output_index: receipt.output_index,
                block_hash: receipt.block_hash.clone(),
                block_number: receipt.block_number.unwrap_or_default(),
                timestamp: log.timestamp,
                contract_address: strip_0x(&receipt.contract_address).to_lowercase(),
                address: log.emitter_hex().to_lowercase(),
                topics: log.topics.clone(),
                data: log.data.clone(),
            })
            .collect()
    }

    /// Decode against `abi`
    pub fn decode(&self, abi: &Abi) -> Result<DecodedEvent, SdkError> {
        EvmLog {
            address: self.address.clone(),
            address_hex: None,
            topics: self.topics.clone(),
            data: self.data.clone(),
            timestamp: self.timestamp,
        }
        .decode(abi)
    }
}

/// Log retrieval result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLogs {
    /// Number of logs the backend reports for the query
    pub total_count: u64,
    /// Log entries
    pub logs: Vec<EventLog>,
}

/// Outcome of a read-only execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Gas used
    #[serde(default)]
    pub gas_used: u64,
    /// Exception kind, `"None"` on success
    #[serde(default, deserialize_with = "nullable")]
    pub excepted: String,
    /// Address of a created contract
    #[serde(default, deserialize_with = "nullable")]
    pub new_address: String,
    /// Return data (hex)
    #[serde(default, deserialize_with = "nullable")]
    pub output: String,
    /// Code deposit
    #[serde(default)]
    pub code_deposit: u64,
    /// Gas refunded
    #[serde(default)]
    pub gas_refunded: u64,
    /// Deposit size
    #[serde(default)]
    pub deposit_size: u64,
    /// Gas for deposit
    #[serde(default)]
    pub gas_for_deposit: u64,
    /// Revert reason, when the node decodes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excepted_message: Option<String>,
}

/// Response of `callcontract` (node, bridge) and `/contract/{addr}/call` (explorer)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    /// Contract address
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    /// Execution outcome
    pub execution_result: ExecutionResult,
    /// Receipt of the simulated execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_receipt: Option<serde_json::Value>,
}

impl ContractResponse {
    /// Whether the execution threw
    pub fn is_excepted(&self) -> bool {
        let excepted = &self.execution_result.excepted;
        !excepted.is_empty() && excepted != "None"
    }

    /// Return data as bytes
    pub fn output_bytes(&self) -> Result<Vec<u8>, SdkError> {
        Ok(hex::decode(strip_0x(&self.execution_result.output))?)
    }
}
