//! SDK error types

use mrx_primitives::Network;
use thiserror::Error;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from node or wallet bridge
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Invalid decimal or integer amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// ABI encoding error
    #[error("ABI encoding error: {0}")]
    AbiEncode(String),

    /// ABI decoding error
    #[error("ABI decoding error: {0}")]
    AbiDecode(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A send was attempted without a sender identity
    #[error("No sender configured for this provider")]
    MissingSender,

    /// Operation has no endpoint on this network
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(Network),

    /// Operation is not available on this backend
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// A background task panicked or was aborted
    #[error("Task failed: {0}")]
    Task(String),
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(e: toml::de::Error) -> Self {
        SdkError::Config(e.to_string())
    }
}

impl From<bs58::decode::Error> for SdkError {
    fn from(e: bs58::decode::Error) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

impl From<mrx_primitives::PrimitiveError> for SdkError {
    fn from(e: mrx_primitives::PrimitiveError) -> Self {
        match e {
            mrx_primitives::PrimitiveError::UnknownNetwork(name) => {
                SdkError::Config(format!("unknown network: {}", name))
            }
            other => SdkError::InvalidAddress(other.to_string()),
        }
    }
}

impl From<mrx_primitives::AddressError> for SdkError {
    fn from(e: mrx_primitives::AddressError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

impl From<mrx_primitives::HashError> for SdkError {
    fn from(e: mrx_primitives::HashError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<tokio::task::JoinError> for SdkError {
    fn from(e: tokio::task::JoinError) -> Self {
        SdkError::Task(e.to_string())
    }
}
