//! Confirmation polling shared by every backend
//!
//! A submitted transaction moves from SUBMITTED to PENDING and ends either
//! CONFIRMED (at least one confirmation) or ORPHANED (confirmations == -1).
//! Each backend supplies a probe; [`wait_for_confirmation`] drives it with a
//! fixed interval, a bounded number of attempts and a cancellation token.

use std::future::Future;
use std::time::Duration;

use mrx_primitives::H256;
use tokio_util::sync::CancellationToken;

use crate::types::TransactionReceipt;
use crate::SdkError;

/// Polling cadence and bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Sleep between probes
    pub interval: Duration,
    /// Total number of probes before giving up
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_attempts: 30,
        }
    }
}

impl PollPolicy {
    /// Create a policy; at least one probe is always made
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }
}

/// Result of one probe
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    /// Not settled yet; carries whatever receipts were observed
    Pending(Option<Vec<TransactionReceipt>>),
    /// At least one confirmation
    Confirmed(Vec<TransactionReceipt>),
    /// Reorganised out of the chain
    Orphaned,
}

/// How a wait ended
#[derive(Debug)]
pub enum ConfirmationOutcome {
    /// Zero txid: nothing was broadcast
    NotSubmitted,
    /// Confirmed receipts
    Confirmed(Vec<TransactionReceipt>),
    /// The transaction was orphaned
    Orphaned,
    /// Attempts ran out; the last receipts observed, possibly unconfirmed
    Exhausted(Vec<TransactionReceipt>),
    /// The wait was cancelled; the last receipts observed
    Cancelled(Vec<TransactionReceipt>),
    /// A probe failed
    Failed(SdkError),
}

impl ConfirmationOutcome {
    /// Whether the transaction confirmed
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmationOutcome::Confirmed(_))
    }

    /// Flatten into a receipt list: confirmed, exhausted and cancelled waits
    /// yield their receipts, everything else an empty list
    pub fn into_receipts(self) -> Vec<TransactionReceipt> {
        match self {
            ConfirmationOutcome::Confirmed(r)
            | ConfirmationOutcome::Exhausted(r)
            | ConfirmationOutcome::Cancelled(r) => r,
            ConfirmationOutcome::NotSubmitted
            | ConfirmationOutcome::Orphaned
            | ConfirmationOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Drive `probe` until `txid` confirms, is orphaned, attempts run out or
/// `cancel` fires.
///
/// A zero txid returns [`ConfirmationOutcome::NotSubmitted`] without probing.
pub async fn wait_for_confirmation<F, Fut>(
    txid: &H256,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut probe: F,
) -> ConfirmationOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe, SdkError>>,
{
    if txid.is_zero() {
        tracing::debug!("Zero txid, nothing to wait for");
        return ConfirmationOutcome::NotSubmitted;
    }

    let max_attempts = policy.max_attempts.max(1);
    let mut last_seen = Vec::new();
    for attempt in 1..=max_attempts {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ConfirmationOutcome::Cancelled(last_seen),
            result = probe() => result,
        };

        match result {
            Ok(Probe::Confirmed(receipts)) => {
                tracing::info!("Transaction {} confirmed after {} probe(s)", txid, attempt);
                return ConfirmationOutcome::Confirmed(receipts);
            }
            Ok(Probe::Orphaned) => {
                tracing::warn!("Transaction {} orphaned", txid);
                return ConfirmationOutcome::Orphaned;
            }
            Ok(Probe::Pending(seen)) => {
                if let Some(receipts) = seen {
                    last_seen = receipts;
                }
                tracing::debug!("Transaction {} pending ({}/{})", txid, attempt, max_attempts);
            }
            Err(e) => {
                tracing::warn!("Polling {} failed: {}", txid, e);
                return ConfirmationOutcome::Failed(e);
            }
        }

        if attempt < max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return ConfirmationOutcome::Cancelled(last_seen),
                _ = tokio::time::sleep(policy.interval) => {}
            }
        }
    }

    tracing::warn!("Gave up on {} after {} probe(s)", txid, max_attempts);
    ConfirmationOutcome::Exhausted(last_seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn txid() -> H256 {
        H256::from_bytes([0xab; 32])
    }

    fn receipt(confirmations: i64) -> TransactionReceipt {
        TransactionReceipt {
            confirmations: Some(confirmations),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_zero_txid_never_polls() {
        let calls = AtomicU32::new(0);
        let outcome = wait_for_confirmation(
            &H256::ZERO,
            &PollPolicy::default(),
            &CancellationToken::new(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, SdkError>(Probe::Pending(None)) }
            },
        )
        .await;
        assert!(matches!(outcome, ConfirmationOutcome::NotSubmitted));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirms_after_pending() {
        let calls = AtomicU32::new(0);
        let (policy, cancel) = (PollPolicy::default(), CancellationToken::new());
        let outcome = wait_for_confirmation(&txid(), &policy, &cancel, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Ok::<_, SdkError>(Probe::Pending(Some(vec![receipt(0)])))
                } else {
                    Ok::<_, SdkError>(Probe::Confirmed(vec![receipt(1)]))
                }
            }
        })
        .await;
        assert!(outcome.is_confirmed());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.into_receipts()[0].confirmations, Some(1));
    }

    #[tokio::test]
    async fn test_orphan_stops_immediately() {
        let calls = AtomicU32::new(0);
        let (policy, cancel) = (PollPolicy::default(), CancellationToken::new());
        let outcome = wait_for_confirmation(&txid(), &policy, &cancel, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, SdkError>(Probe::Orphaned) }
        })
        .await;
        assert!(matches!(outcome, ConfirmationOutcome::Orphaned));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcome.into_receipts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_seen() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy::new(Duration::from_secs(60), 4);
        let outcome = wait_for_confirmation(&txid(), &policy, &CancellationToken::new(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                // receipts appear on the second probe and stay unconfirmed
                Ok::<_, SdkError>(Probe::Pending((n > 0).then(|| vec![receipt(0)])))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match outcome {
            ConfirmationOutcome::Exhausted(receipts) => {
                assert_eq!(receipts.len(), 1);
                assert_eq!(receipts[0].confirmations, Some(0));
            }
            other => panic!("Expected Exhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_attempts_still_polls_once() {
        assert_eq!(PollPolicy::new(Duration::from_secs(1), 0).max_attempts, 1);

        let calls = AtomicU32::new(0);
        let policy = PollPolicy {
            interval: Duration::from_secs(1),
            max_attempts: 0,
        };
        let outcome = wait_for_confirmation(&txid(), &policy, &CancellationToken::new(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, SdkError>(Probe::Confirmed(vec![receipt(2)])) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcome.is_confirmed());
    }

    #[tokio::test]
    async fn test_status_error_fails() {
        let (policy, cancel) = (PollPolicy::default(), CancellationToken::new());
        let outcome = wait_for_confirmation(&txid(), &policy, &cancel, || async {
            Err(SdkError::Transport("connection reset".to_string()))
        })
        .await;
        assert!(matches!(outcome, ConfirmationOutcome::Failed(SdkError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_sleep() {
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let task = {
            let cancel = cancel.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                wait_for_confirmation(&txid(), &PollPolicy::default(), &cancel, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, SdkError>(Probe::Pending(Some(vec![receipt(0)]))) }
                })
                .await
            })
        };

        tokio::time::sleep(Duration::from_secs(90)).await;
        cancel.cancel();
        let outcome = task.await.unwrap();

        match outcome {
            ConfirmationOutcome::Cancelled(receipts) => assert_eq!(receipts.len(), 1),
            other => panic!("Expected Cancelled, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = wait_for_confirmation(&txid(), &PollPolicy::default(), &cancel, || async {
            Ok::<_, SdkError>(Probe::Pending(None))
        })
        .await;
        assert!(matches!(outcome, ConfirmationOutcome::Cancelled(_)));
    }
}
