//! Explorer-backed provider

use async_trait::async_trait;
use mrx_primitives::{Address, Network, U256};
use tokio_util::sync::CancellationToken;

use super::confirm::{self, ConfirmationOutcome, PollPolicy};
use super::explorer::ExplorerClient;
use super::{attach_events, decode_call_response, encode_for_call, LogFilter, Provider, SendOptions};
use crate::abi::{Abi, Token};
use crate::types::{EventLogs, TxHandle};
use crate::SdkError;

/// Read-only provider over the public block explorer
#[derive(Clone)]
pub struct ApiProvider {
    explorer: ExplorerClient,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl ApiProvider {
    /// Provider over an explorer client
    pub fn new(explorer: ExplorerClient) -> Self {
        Self {
            explorer,
            policy: PollPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Provider for the public explorer of `network`
    #[cfg(feature = "http")]
    pub fn connect(network: Network, explorer_url: Option<&str>) -> Self {
        Self::new(ExplorerClient::connect(network, explorer_url))
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

    /// Underlying explorer client
    pub fn explorer(&self) -> &ExplorerClient {
        &self.explorer
    }
}

#[async_trait]
impl Provider for ApiProvider {
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
        let data = encode_for_call(abi, method, args)?;
        match self.explorer.call(contract, &data).await {
            Ok(Some(response)) => decode_call_response(abi, method, &response),
            Ok(None) => {
                tracing::debug!("Explorer returned nothing for {} on {}", method, contract);
                None
            }
            Err(e) => {
                tracing::warn!("Call to {} on {} failed: {}", method, contract, e);
                None
            }
        }
    }

    async fn send_to_contract(
        &self,
        _contract: &Address,
        _method: &str,
        _args: &[Token],
        _options: &SendOptions,
        _abi: &Abi,
    ) -> Result<TxHandle, SdkError> {
        Err(SdkError::NotImplemented(
            "sendToContract is not available through the explorer".to_string(),
        ))
    }

    async fn wait_for_confirmation(
        &self,
        tx: &TxHandle,
        abi: &Abi,
        contract: Option<&Address>,
    ) -> ConfirmationOutcome {
        let outcome = confirm::wait_for_confirmation(&tx.txid, &self.policy, &self.cancel, || {
            self.explorer.probe(&tx.txid)
        })
        .await;
        attach_events(outcome, abi, contract)
    }

    async fn get_event_logs(&self, contract: &Address) -> Result<EventLogs, SdkError> {
        self.explorer.event_logs(contract).await
    }

    async fn search_event_logs(&self, _filter: &LogFilter) -> Result<EventLogs, SdkError> {
        Err(SdkError::NotImplemented(
            "searchEventLogs is not available through the explorer".to_string(),
        ))
    }
}
