//! Providers: one capability interface, three transports
//!
//! - [`ApiProvider`]: the public block explorer (read-only)
//! - [`RpcProvider`]: a full node's JSON-RPC interface
//! - [`Web3Provider`]: a browser wallet bridge for calls and sends, the
//!   explorer for everything else
//!
//! Read paths soft-fail: a balance that cannot be fetched is zero and a call
//! that cannot be made is `None`, with the cause logged. Sends and log
//! queries return `Result`.

mod api;
pub mod confirm;
pub mod explorer;
pub mod node;
mod rpc;
mod web3;

use async_trait::async_trait;
use mrx_primitives::{Address, Network, H256, U256};

use crate::abi::{Abi, Token};
use crate::types::{ContractResponse, EventLogs, TransactionReceipt, TxHandle};
use crate::SdkError;

pub use api::ApiProvider;
pub use confirm::{ConfirmationOutcome, PollPolicy, Probe};
pub use explorer::{default_explorer_url, ExplorerClient};
pub use node::MetrixRpcClient;
pub use rpc::RpcProvider;
pub use web3::Web3Provider;

/// Value and gas settings for a state-changing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    /// MRX sent with the call, as a decimal string
    pub value: String,
    /// Gas limit
    pub gas_limit: u64,
    /// Gas price in satoshi per gas
    pub gas_price: u64,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            value: "0".to_string(),
            gas_limit: 250_000,
            gas_price: 5000,
        }
    }
}

impl SendOptions {
    /// Attach MRX to the call
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Override the gas limit
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Override the gas price
    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = gas_price;
        self
    }
}

/// Filtered log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    /// Emitting contract
    pub contract: Address,
    /// Topic constraints by position; `None` matches anything
    pub topics: Vec<Option<H256>>,
    /// First block, inclusive
    pub from_block: u64,
    /// Last block, inclusive; `None` for the chain tip
    pub to_block: Option<u64>,
}

impl LogFilter {
    /// All logs of `contract`
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            topics: Vec::new(),
            from_block: 0,
            to_block: None,
        }
    }

    /// Constrain the topic at `index`
    pub fn topic(mut self, index: usize, topic: H256) -> Self {
        if self.topics.len() <= index {
            self.topics.resize(index + 1, None);
        }
        self.topics[index] = Some(topic);
        self
    }

    /// Restrict to a block range
    pub fn blocks(mut self, from_block: u64, to_block: Option<u64>) -> Self {
        self.from_block = from_block;
        self.to_block = to_block;
        self
    }
}

/// Contract access over one transport
#[async_trait]
pub trait Provider: Send + Sync {
    /// Network served
    fn network(&self) -> Network;

    /// Spendable balance in satoshi; zero when it cannot be determined
    async fn balance(&self, address: &Address) -> U256;

    /// Read-only call of `method`; `None` on any failure
    async fn call_contract(
        &self,
        contract: &Address,
        method: &str,
        args: &[Token],
        abi: &Abi,
    ) -> Option<Vec<Token>>;

    /// Broadcast a call of `method`, returning before it confirms
    async fn send_to_contract(
        &self,
        contract: &Address,
        method: &str,
        args: &[Token],
        options: &SendOptions,
        abi: &Abi,
    ) -> Result<TxHandle, SdkError>;

    /// Poll until `tx` confirms, is orphaned, polling is exhausted or the
    /// provider's cancellation token fires. Logs emitted by `contract` are
    /// decoded into each receipt's `events`.
    async fn wait_for_confirmation(
        &self,
        tx: &TxHandle,
        abi: &Abi,
        contract: Option<&Address>,
    ) -> ConfirmationOutcome;

    /// [`Self::wait_for_confirmation`] flattened to a receipt list. Empty
    /// for an unsubmitted, orphaned or failed transaction.
    async fn get_tx_receipts(
        &self,
        tx: &TxHandle,
        abi: &Abi,
        contract: Option<&Address>,
    ) -> Vec<TransactionReceipt> {
        self.wait_for_confirmation(tx, abi, contract)
            .await
            .into_receipts()
    }

    /// Every log the backend holds for `contract`
    async fn get_event_logs(&self, contract: &Address) -> Result<EventLogs, SdkError>;

    /// Logs matching `filter`
    async fn search_event_logs(&self, filter: &LogFilter) -> Result<EventLogs, SdkError>;
}

/// Decode the return data of a read-only call; an execution exception is
/// logged and yields `None`
pub(crate) fn decode_call_response(
    abi: &Abi,
    method: &str,
    response: &ContractResponse,
) -> Option<Vec<Token>> {
    let output = match response.output_bytes() {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!("Call to {} returned malformed output: {}", method, e);
            return None;
        }
    };

    if response.is_excepted() {
        let reason = abi
            .describe_revert(&output)
            .or_else(|| response.execution_result.excepted_message.clone())
            .unwrap_or_else(|| response.execution_result.excepted.clone());
        tracing::warn!("Call to {} reverted: {}", method, reason);
        return None;
    }

    match abi.decode_output(method, &output) {
        Ok(tokens) => Some(tokens),
        Err(e) => {
            tracing::warn!("Failed to decode output of {}: {}", method, e);
            None
        }
    }
}

/// Encode calldata for a read path, logging instead of failing
pub(crate) fn encode_for_call(abi: &Abi, method: &str, args: &[Token]) -> Option<Vec<u8>> {
    match abi.encode_call(method, args) {
        Ok(data) => Some(data.to_vec()),
        Err(e) => {
            tracing::warn!("Failed to encode call to {}: {}", method, e);
            None
        }
    }
}

/// Decode `contract`'s logs into the receipts carried by `outcome`
pub(crate) fn attach_events(
    outcome: ConfirmationOutcome,
    abi: &Abi,
    contract: Option<&Address>,
) -> ConfirmationOutcome {
    let Some(contract) = contract else {
        return outcome;
    };
    let decode = |mut receipts: Vec<TransactionReceipt>| {
        for receipt in &mut receipts {
            receipt.attach_events(abi, contract);
        }
        receipts
    };
    match outcome {
        ConfirmationOutcome::Confirmed(r) => ConfirmationOutcome::Confirmed(decode(r)),
        ConfirmationOutcome::Exhausted(r) => ConfirmationOutcome::Exhausted(decode(r)),
        ConfirmationOutcome::Cancelled(r) => ConfirmationOutcome::Cancelled(decode(r)),
        other => other,
    }
}
