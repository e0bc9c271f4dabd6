//! Chain query commands

use clap::Subcommand;
use mrx_primitives::{Address, H256};
use mrx_sdk::abi::Abi;
use mrx_sdk::types::TxHandle;
use mrx_sdk::utils::{parse_any_address, scaled_to_decimal, MRX_DECIMALS};
use mrx_sdk::ConfirmationOutcome;

use crate::{config::Config, output::Output, CliError};

/// Query subcommands
#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// MRX balance of an address
    Balance {
        /// Base58, hex or 0x-hex address
        address: String,
    },
    /// Receipts of a transaction
    Receipt {
        /// Transaction id
        txid: String,
        /// Poll until confirmed, using the configured poll policy
        #[arg(long)]
        wait: bool,
    },
    /// Event logs of a contract
    Logs {
        /// Contract address
        contract: String,
    },
}

impl QueryCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            QueryCommand::Balance { address } => query_balance(config, &address, json).await,
            QueryCommand::Receipt { txid, wait } => query_receipt(config, &txid, wait, json).await,
            QueryCommand::Logs { contract } => query_logs(config, &contract, json).await,
        }
    }
}

fn parse_address(s: &str) -> Result<Address, CliError> {
    parse_any_address(s).map_err(|e| CliError::InvalidAddress(e.to_string()))
}

async fn query_balance(config: &Config, address: &str, json: bool) -> Result<(), CliError> {
    let parsed = parse_address(address)?;
    let provider = config.sdk.build_provider();

    let satoshi = provider.balance(&parsed).await.to_string();
    let mrx = scaled_to_decimal(&satoshi, MRX_DECIMALS)?;

    Output::new(json)
        .field("address", address)
        .field("network", provider.network().name())
        .field("satoshi", &satoshi)
        .field("balance", &mrx)
        .message(&format!("{} MRX", mrx))
        .print();
    Ok(())
}

async fn query_receipt(
    config: &Config,
    txid: &str,
    wait: bool,
    json: bool,
) -> Result<(), CliError> {
    let txid = H256::from_hex(txid).map_err(|e| CliError::InvalidHex(e.to_string()))?;

    let mut sdk = config.sdk.clone();
    if !wait {
        sdk.poll.max_attempts = 1;
    }
    let provider = sdk.build_provider();

    let handle = TxHandle::new(txid, "", "");
    let outcome = provider
        .wait_for_confirmation(&handle, &Abi::default(), None)
        .await;

    let status = match &outcome {
        ConfirmationOutcome::NotSubmitted => "not-submitted",
        ConfirmationOutcome::Confirmed(_) => "confirmed",
        ConfirmationOutcome::Orphaned => "orphaned",
        ConfirmationOutcome::Exhausted(r) if r.is_empty() => "unknown",
        ConfirmationOutcome::Exhausted(_) => "pending",
        ConfirmationOutcome::Cancelled(_) => "cancelled",
        ConfirmationOutcome::Failed(_) => "failed",
    };
    if let ConfirmationOutcome::Failed(e) = outcome {
        return Err(e.into());
    }
    let receipts = outcome.into_receipts();

    let mut message = format!("Transaction {}: {}", txid, status);
    for receipt in &receipts {
        message.push_str(&format!(
            "\n  block {} contract {} gas {} excepted {}",
            receipt.block_number.unwrap_or_default(),
            receipt.contract_address,
            receipt.gas_used,
            receipt.excepted
        ));
    }

    Output::new(json)
        .field("txid", &txid.to_hex_unprefixed())
        .field("status", status)
        .field_value("receipts", serde_json::to_value(&receipts)?)
        .message(&message)
        .print();
    Ok(())
}

async fn query_logs(config: &Config, contract: &str, json: bool) -> Result<(), CliError> {
    let contract = parse_address(contract)?;
    let provider = config.sdk.build_provider();

    let logs = provider.get_event_logs(&contract).await?;

    let mut message = format!("{} of {} logs", logs.logs.len(), logs.total_count);
    for log in &logs.logs {
        message.push_str(&format!(
            "\n  {} block {} topics {}",
            log.transaction_id,
            log.block_number,
            log.topics.len()
        ));
    }

    Output::new(json)
        .field_u64("totalCount", logs.total_count)
        .field_value("logs", serde_json::to_value(&logs.logs)?)
        .message(&message)
        .print();
    Ok(())
}
