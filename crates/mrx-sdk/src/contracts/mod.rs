//! Typed proxies for the Metriverse contracts
//!
//! Read methods never fail: a call that cannot be made, reverts or decodes to
//! the wrong type yields the zero value of its return type. Write methods
//! broadcast and return a [`Transaction`] whose receipts resolve in the
//! background.

use mrx_primitives::{Address, H256, U256};

use crate::abi::Token;
use crate::contract::{MetrixContract, Transaction};
use crate::provider::SendOptions;
use crate::SdkError;

/// Access to the contract behind a typed proxy
pub trait ContractProxy: Send + Sync {
    /// Underlying contract handle
    fn contract(&self) -> &MetrixContract;

    /// Contract address
    fn address(&self) -> &Address {
        self.contract().address()
    }
}

macro_rules! contract_proxy {
    ($(#[$meta:meta])* $name:ident, $abi:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            contract: $crate::contract::MetrixContract,
        }

        impl $name {
            /// Proxy for the contract at `address`
            pub fn new(
                address: mrx_primitives::Address,
                provider: std::sync::Arc<dyn $crate::provider::Provider>,
            ) -> Self {
                Self {
                    contract: $crate::contract::MetrixContract::new(
                        address,
                        provider,
                        std::sync::Arc::clone(&*$abi),
                    ),
                }
            }
        }

        impl $crate::contracts::ContractProxy for $name {
            fn contract(&self) -> &$crate::contract::MetrixContract {
                &self.contract
            }
        }
    };
}
pub(crate) use contract_proxy;

pub mod abi;
mod access;
mod auction;
mod metriverse;
mod token;

pub use access::{Ownable, Pausable};
pub use auction::{Auction, BaseSale, Mrc721AuctionController, Sale, SimpleAuction};
pub use metriverse::MetriverseCore;
pub use token::{
    Burnable, GenericMrc721, GenericMrc721Burnable, GenericMrc721BurnableRoyalty,
    GenericMrc721Royalty, GenericMrc721Token, Mrc20, Mrc721, Mrc721Token, Royalty,
};

// ==================== Typed reads ====================

pub(crate) fn to_address(token: Option<Token>) -> Address {
    token.and_then(Token::into_address).unwrap_or(Address::ZERO)
}

pub(crate) fn to_uint(token: Option<Token>) -> U256 {
    token.and_then(Token::into_uint).unwrap_or_default()
}

pub(crate) fn to_bool(token: Option<Token>) -> bool {
    token.and_then(Token::into_bool).unwrap_or(false)
}

pub(crate) fn to_string(token: Option<Token>) -> String {
    token.and_then(Token::into_string).unwrap_or_default()
}

pub(crate) fn to_hash(token: Option<Token>) -> H256 {
    token
        .and_then(Token::into_bytes)
        .and_then(|bytes| H256::from_slice(&bytes).ok())
        .unwrap_or(H256::ZERO)
}

impl MetrixContract {
    pub(crate) async fn call_address(&self, method: &str, args: &[Token]) -> Address {
        to_address(self.call_first(method, args).await)
    }

    pub(crate) async fn call_uint(&self, method: &str, args: &[Token]) -> U256 {
        to_uint(self.call_first(method, args).await)
    }

    pub(crate) async fn call_bool(&self, method: &str, args: &[Token]) -> bool {
        to_bool(self.call_first(method, args).await)
    }

    pub(crate) async fn call_string(&self, method: &str, args: &[Token]) -> String {
        to_string(self.call_first(method, args).await)
    }

    pub(crate) async fn call_hash(&self, method: &str, args: &[Token]) -> H256 {
        to_hash(self.call_first(method, args).await)
    }

    /// Submit with the default value and gas settings
    pub(crate) async fn submit_default(
        &self,
        method: &str,
        args: &[Token],
    ) -> Result<Transaction, SdkError> {
        self.submit(method, args, &SendOptions::default()).await
    }
}

impl ContractProxy for MetrixContract {
    fn contract(&self) -> &MetrixContract {
        self
    }
}
