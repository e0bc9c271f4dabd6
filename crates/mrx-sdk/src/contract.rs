//! Contract handle: one deployed contract, its ABI and a provider

use std::sync::Arc;

use mrx_primitives::{Address, H256, U256};
use tokio::task::JoinHandle;

use crate::abi::{Abi, DecodedEvent, Token};
use crate::provider::{ConfirmationOutcome, Provider, SendOptions};
use crate::types::{EventLogs, TransactionReceipt, TxHandle};
use crate::SdkError;

/// Receipt fetch started by a send but not awaited
///
/// The confirmation wait runs on its own task; dropping this handle leaves it
/// running to completion in the background.
#[derive(Debug)]
pub struct PendingReceipts {
    task: JoinHandle<ConfirmationOutcome>,
}

impl PendingReceipts {
    fn spawn(contract: &MetrixContract, handle: TxHandle) -> Self {
        let provider = contract.provider.clone();
        let abi = contract.abi.clone();
        let address = contract.address;
        let task = tokio::spawn(async move {
            provider
                .wait_for_confirmation(&handle, &abi, Some(&address))
                .await
        });
        Self { task }
    }

    /// How the wait ended; a panicked or aborted task is
    /// [`ConfirmationOutcome::Failed`]
    pub async fn outcome(self) -> ConfirmationOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Receipt task ended abnormally: {}", e);
                ConfirmationOutcome::Failed(e.into())
            }
        }
    }

    /// Receipts of the transaction, see [`Provider::get_tx_receipts`]
    pub async fn wait(self) -> Vec<TransactionReceipt> {
        self.outcome().await.into_receipts()
    }

    /// Whether the wait has ended
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop waiting
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Result of a state-changing proxy method
#[derive(Debug)]
pub struct Transaction {
    /// Transaction id; zero when nothing was broadcast
    pub txid: H256,
    /// Sender reported by the backend
    pub sender: String,
    /// Confirmation receipts, resolved in the background
    pub receipts: PendingReceipts,
}

/// A deployed contract bound to a provider
#[derive(Clone)]
pub struct MetrixContract {
    address: Address,
    provider: Arc<dyn Provider>,
    abi: Arc<Abi>,
}

impl std::fmt::Debug for MetrixContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetrixContract")
            .field("address", &self.address)
            .field("network", &self.provider.network())
            .finish()
    }
}

impl MetrixContract {
    /// Bind `abi` at `address` to `provider`
    pub fn new(address: Address, provider: Arc<dyn Provider>, abi: Arc<Abi>) -> Self {
        Self {
            address,
            provider,
            abi,
        }
    }

    /// Contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Provider in use
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Contract ABI
    pub fn abi(&self) -> &Arc<Abi> {
        &self.abi
    }

    /// MRX held by the contract, in satoshi
    pub async fn balance(&self) -> U256 {
        self.provider.balance(&self.address).await
    }

    /// Read-only call; `None` when the call fails or reverts
    pub async fn call(&self, method: &str, args: &[Token]) -> Option<Vec<Token>> {
        self.provider
            .call_contract(&self.address, method, args, &self.abi)
            .await
    }

    /// First return value of a read-only call
    pub async fn call_first(&self, method: &str, args: &[Token]) -> Option<Token> {
        self.call(method, args).await?.into_iter().next()
    }

    /// Broadcast a call without waiting for it
    pub async fn send(
        &self,
        method: &str,
        args: &[Token],
        options: &SendOptions,
    ) -> Result<TxHandle, SdkError> {
        self.provider
            .send_to_contract(&self.address, method, args, options, &self.abi)
            .await
    }

    /// Broadcast a call and start fetching its receipts in the background
    pub async fn submit(
        &self,
        method: &str,
        args: &[Token],
        options: &SendOptions,
    ) -> Result<Transaction, SdkError> {
        let handle = self.send(method, args, options).await?;
        Ok(Transaction {
            txid: handle.txid,
            sender: handle.sender.clone(),
            receipts: PendingReceipts::spawn(self, handle),
        })
    }

    /// Every log the provider holds for this contract
    pub async fn get_event_logs(&self) -> Result<EventLogs, SdkError> {
        self.provider.get_event_logs(&self.address).await
    }

    /// [`Self::get_event_logs`] decoded against the contract ABI; logs that
    /// do not match an event are skipped
    pub async fn decoded_events(&self) -> Result<Vec<DecodedEvent>, SdkError> {
        let logs = self.get_event_logs().await?;
        Ok(logs
            .logs
            .iter()
            .filter_map(|log| match log.decode(&self.abi) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::debug!("Skipping log in {}: {}", log.transaction_id, e);
                    None
                }
            })
            .collect())
    }
}
