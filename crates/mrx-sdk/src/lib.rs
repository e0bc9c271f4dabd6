//! # mrx-sdk
//!
//! Rust SDK for smart contracts on the Metrix chain.
//!
//! ## Features
//!
//! - **Provider**: one interface over the block explorer ([`ApiProvider`]), a
//!   full node ([`RpcProvider`]) and a browser wallet bridge ([`Web3Provider`])
//! - **MetrixContract**: calls, sends and event logs for one deployed contract
//! - **Proxies**: typed wrappers for the MRC20/MRC721 tokens and the
//!   Metriverse marketplace contracts
//! - **ABI**: Solidity ABI encoding and decoding
//! - **Utils**: base58/hex address conversion and satoshi amounts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mrx_sdk::contracts::{Mrc721, Mrc721Token};
//! use mrx_sdk::utils::to_hex_address;
//! use mrx_sdk::{Address, ApiProvider, Network, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider: Arc<dyn Provider> = Arc::new(ApiProvider::connect(Network::TestNet, None));
//!
//!     let owner = Address::from_hex(&to_hex_address("maTQ7vSGzWWw4qV4BnFyZtVkNbX9Tnv6tK")?)?;
//!     println!("Balance: {}", provider.balance(&owner).await);
//!
//!     let asset = Address::from_hex("0x1111111111111111111111111111111111111111")?;
//!     let token = Mrc721::new(asset, provider);
//!     println!("{} owns {} tokens", owner, token.balance_of(owner).await);
//!     Ok(())
//! }
//! ```
//!
//! ## Waiting for a transaction
//!
//! ```rust,no_run
//! use mrx_sdk::abi::Token;
//! use mrx_sdk::{Address, MetrixRpcClient, Network, Provider, RpcProvider, SendOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MetrixRpcClient::connect("http://127.0.0.1:33841", Some("user"), Some("pass"));
//!     let provider = RpcProvider::new(Network::RegTest, client)
//!         .with_sender("qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW");
//!
//!     let core = Address::from_hex("0x1111111111111111111111111111111111111111")?;
//!     let abi = mrx_sdk::contracts::abi::OWNABLE.clone();
//!     let handle = provider
//!         .send_to_contract(
//!             &core,
//!             "transferOwnership",
//!             &[Token::Address(Address::ZERO)],
//!             &SendOptions::default(),
//!             &abi,
//!         )
//!         .await?;
//!     let receipts = provider.get_tx_receipts(&handle, &abi, Some(&core)).await;
//!     println!("{} receipts", receipts.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
pub mod config;
pub mod contract;
pub mod contracts;
mod error;
pub mod provider;
pub mod registry;
mod transport;
pub mod types;
pub mod utils;

// Re-export main types
pub use config::SdkConfig;
pub use contract::{MetrixContract, PendingReceipts, Transaction};
pub use error::SdkError;
pub use provider::{
    ApiProvider, ConfirmationOutcome, ExplorerClient, LogFilter, MetrixRpcClient, PollPolicy,
    Provider, RpcProvider, SendOptions, Web3Provider,
};
pub use registry::Deployments;
pub use transport::{deserialize_response, MockRestTransport, MockTransport};

/// Re-export transport traits for custom implementations
pub use transport::{RestTransport, Transport};

#[cfg(feature = "http")]
pub use transport::{HttpRestTransport, HttpTransport};

// Re-export primitives for convenience
pub use mrx_primitives::{Address, Network, H256, U256};
