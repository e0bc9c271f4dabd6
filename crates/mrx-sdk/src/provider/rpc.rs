//! Full node provider

use async_trait::async_trait;
use mrx_primitives::{Address, Network, H256, U256};
use tokio_util::sync::CancellationToken;

use super::confirm::{self, ConfirmationOutcome, PollPolicy, Probe};
use super::node::MetrixRpcClient;
use super::{attach_events, decode_call_response, encode_for_call, LogFilter, Provider, SendOptions};
use crate::abi::{Abi, Token};
use crate::types::{EventLog, EventLogs, TxHandle};
use crate::utils::{scaled_to_decimal, MRX_DECIMALS};
use crate::SdkError;

/// Blocks searched back from the tip when no start height is given
pub const DEFAULT_LOG_WINDOW: u64 = 10_000;

/// Provider over a Metrix node's JSON-RPC interface
///
/// Reads and sends are made on behalf of `sender`, a base58 address held by
/// the node's wallet.
#[derive(Clone)]
pub struct RpcProvider {
    network: Network,
    client: MetrixRpcClient,
    sender: Option<String>,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl RpcProvider {
    /// Provider over `client`
    pub fn new(network: Network, client: MetrixRpcClient) -> Self {
        Self {
            network,
            client,
            sender: None,
            policy: PollPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Act as `sender`
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
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

    /// Underlying node client
    pub fn client(&self) -> &MetrixRpcClient {
        &self.client
    }

    /// Configured sender
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// One confirmation probe: the wallet's confirmation count decides, the
    /// receipts are fetched only for a live transaction
    async fn probe(&self, txid: &H256) -> Result<Probe, SdkError> {
        let tx = self.client.get_transaction(txid).await?;
        if tx.confirmations == -1 {
            return Ok(Probe::Orphaned);
        }

        let mut receipts = self.client.get_transaction_receipt(txid).await?;
        for receipt in &mut receipts {
            receipt.confirmations = Some(tx.confirmations);
        }

        if !receipts.is_empty() && tx.confirmations >= 1 {
            Ok(Probe::Confirmed(receipts))
        } else if receipts.is_empty() {
            Ok(Probe::Pending(None))
        } else {
            Ok(Probe::Pending(Some(receipts)))
        }
    }

    /// Logs of `contract` from `start_height` (or the last
    /// [`DEFAULT_LOG_WINDOW`] blocks) to the tip
    pub async fn get_event_logs_from(
        &self,
        contract: &Address,
        start_height: Option<u64>,
    ) -> Result<EventLogs, SdkError> {
        let from_block = match start_height {
            Some(height) => height,
            None => self
                .client
                .get_block_count()
                .await?
                .saturating_sub(DEFAULT_LOG_WINDOW),
        };
        self.search_event_logs(&LogFilter::new(*contract).blocks(from_block, None))
            .await
    }
}

#[async_trait]
impl Provider for RpcProvider {
    fn network(&self) -> Network {
        self.network
    }

    async fn balance(&self, address: &Address) -> U256 {
        match self.client.get_account_balance(address).await {
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
        let Some(sender) = self.sender.as_deref() else {
            tracing::warn!("Call to {} skipped: no sender configured", method);
            return None;
        };
        let data = encode_for_call(abi, method, args)?;
        match self.client.call_contract(contract, &data, Some(sender)).await {
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
        let sender = self.sender.as_deref().ok_or(SdkError::MissingSender)?;
        let data = abi.encode_call(method, args)?;
        let gas_price = scaled_to_decimal(&options.gas_price.to_string(), MRX_DECIMALS)?;

        let handle = self
            .client
            .send_to_contract(
                contract,
                &data,
                &options.value,
                options.gas_limit,
                &gas_price,
                sender,
                true,
            )
            .await?;
        tracing::info!("Sent {} to {} in {}", method, contract, handle.txid);
        Ok(handle)
    }

    async fn wait_for_confirmation(
        &self,
        tx: &TxHandle,
        abi: &Abi,
        contract: Option<&Address>,
    ) -> ConfirmationOutcome {
        let outcome = confirm::wait_for_confirmation(&tx.txid, &self.policy, &self.cancel, || {
            self.probe(&tx.txid)
        })
        .await;
        attach_events(outcome, abi, contract)
    }

    async fn get_event_logs(&self, contract: &Address) -> Result<EventLogs, SdkError> {
        self.get_event_logs_from(contract, None).await
    }

    async fn search_event_logs(&self, filter: &LogFilter) -> Result<EventLogs, SdkError> {
        let receipts = self
            .client
            .search_logs(
                filter.from_block,
                filter.to_block,
                &[filter.contract],
                &filter.topics,
                1,
            )
            .await?;
        let logs: Vec<EventLog> = receipts.iter().flat_map(EventLog::from_receipt).collect();
        tracing::debug!(
            "searchlogs from {} returned {} log(s) for {}",
            filter.from_block,
            logs.len(),
            filter.contract
        );
        Ok(EventLogs {
            total_count: logs.len() as u64,
            logs,
        })
    }
}
