//! Address conversion commands

use clap::Subcommand;
use mrx_primitives::Network;
use mrx_sdk::utils::{
    from_hex_address, is_ethereum_address, is_hex_address, is_metrix_address, parse_any_address,
    to_base58, to_hex_address,
};

use crate::{config::Config, output::Output, CliError};

/// Address subcommands
#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// Base58 address to 40-character hex
    ToHex {
        /// Base58 address
        address: String,
    },
    /// 40-character hex to base58 for the configured network
    FromHex {
        /// Hex address, with or without 0x
        hex: String,
    },
    /// Check an address in any format
    Validate {
        /// Base58, hex or 0x-hex address
        address: String,
    },
}

impl AddressCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            AddressCommand::ToHex { address } => to_hex(&address, json),
            AddressCommand::FromHex { hex } => from_hex(config.sdk.network, &hex, json),
            AddressCommand::Validate { address } => validate(config.sdk.network, &address, json),
        }
    }
}

fn to_hex(address: &str, json: bool) -> Result<(), CliError> {
    let hex = to_hex_address(address).map_err(|e| CliError::InvalidAddress(e.to_string()))?;
    Output::new(json)
        .field("address", address)
        .field("hex", &hex)
        .message(&hex)
        .print();
    Ok(())
}

fn from_hex(network: Network, hex: &str, json: bool) -> Result<(), CliError> {
    let bare = hex.strip_prefix("0x").unwrap_or(hex);
    let address = from_hex_address(network, bare)
        .ok_or_else(|| CliError::InvalidAddress(format!("{}: expected 40 hex characters", hex)))?;
    Output::new(json)
        .field("hex", bare)
        .field("network", network.name())
        .field("address", &address)
        .message(&address)
        .print();
    Ok(())
}

fn validate(network: Network, address: &str, json: bool) -> Result<(), CliError> {
    let format = if is_metrix_address(address) {
        "base58"
    } else if is_ethereum_address(address) {
        "0x-hex"
    } else if is_hex_address(address) {
        "hex"
    } else {
        "unknown"
    };

    match parse_any_address(address) {
        Ok(parsed) => {
            let hex = parsed.to_hex_unprefixed();
            let base58 = to_base58(network, &parsed);
            Output::new(json)
                .field_bool("valid", true)
                .field("format", format)
                .field("hex", &hex)
                .field("base58", &base58)
                .message(&format!("valid {} address\nhex:    {}\nbase58: {}", format, hex, base58))
                .print();
            Ok(())
        }
        Err(e) => Err(CliError::InvalidAddress(e.to_string())),
    }
}
