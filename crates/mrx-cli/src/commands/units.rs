//! Amount conversion commands

use clap::Subcommand;
use mrx_sdk::utils::{decimal_to_scaled, scaled_to_decimal, MRX_DECIMALS};

use crate::{output::Output, CliError};

/// Unit subcommands
#[derive(Debug, Subcommand)]
pub enum UnitsCommand {
    /// Satoshi integer to a decimal amount
    ToDecimal {
        /// Amount in the smallest unit
        satoshi: String,
        /// Decimal places
        #[arg(long, default_value_t = MRX_DECIMALS)]
        decimals: usize,
    },
    /// Decimal MRX amount to satoshi
    ToSatoshi {
        /// Amount in MRX, e.g. 1.5
        amount: String,
    },
}

impl UnitsCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        match self {
            UnitsCommand::ToDecimal { satoshi, decimals } => {
                if satoshi.is_empty() {
                    return Err(CliError::InvalidAmount(satoshi));
                }
                let decimal = scaled_to_decimal(&satoshi, decimals)
                    .map_err(|e| CliError::InvalidAmount(e.to_string()))?;
                Output::new(json)
                    .field("satoshi", &satoshi)
                    .field("decimal", &decimal)
                    .message(&decimal)
                    .print();
                Ok(())
            }
            UnitsCommand::ToSatoshi { amount } => {
                let satoshi = decimal_to_scaled(amount.as_str())
                    .map_err(|e| CliError::InvalidAmount(e.to_string()))?;
                Output::new(json)
                    .field("amount", &amount)
                    .field("satoshi", &satoshi)
                    .message(&satoshi)
                    .print();
                Ok(())
            }
        }
    }
}
