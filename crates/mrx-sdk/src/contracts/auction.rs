//! Auction house, fixed-price sales and the controller that ties them together

use mrx_primitives::{Address, U256};

use super::abi;
use super::{contract_proxy, to_address, to_bool, to_uint, Ownable, Pausable};
use crate::abi::Token;
use crate::contract::Transaction;
use crate::provider::SendOptions;
use crate::utils::{scaled_to_decimal, MRX_DECIMALS};
use crate::SdkError;

/// Gas limit for auction creation and claims
pub const AUCTION_GAS_LIMIT: u64 = 300_000;

/// State of one auction; all zero when the auction does not exist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auction {
    /// Token on auction
    pub token_id: U256,
    /// Highest bid so far
    pub winning_bid: U256,
    /// Reserve price
    pub minimum_bid: U256,
    /// Auction length in seconds
    pub bidding_time: U256,
    /// Unix time the auction opened
    pub start_time: U256,
    /// Highest bidder so far
    pub winning_bidder: Address,
    /// Receiver of the proceeds
    pub beneficiary: Address,
    /// Whether `auctionEnd` has run
    pub ended: bool,
}

impl Auction {
    fn from_tokens(tokens: Vec<Token>) -> Self {
        if tokens.len() < 8 {
            return Self::default();
        }
        let mut tokens = tokens.into_iter();
        Self {
            token_id: to_uint(tokens.next()),
            winning_bid: to_uint(tokens.next()),
            minimum_bid: to_uint(tokens.next()),
            bidding_time: to_uint(tokens.next()),
            start_time: to_uint(tokens.next()),
            winning_bidder: to_address(tokens.next()),
            beneficiary: to_address(tokens.next()),
            ended: to_bool(tokens.next()),
        }
    }
}

/// A fixed-price listing; all zero when there is none
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sale {
    /// Token for sale
    pub token_id: U256,
    /// Asking price in satoshi
    pub price: U256,
    /// Receiver of the proceeds
    pub beneficiary: Address,
}

impl Sale {
    fn from_tokens(tokens: Vec<Token>) -> Self {
        if tokens.len() < 3 {
            return Self::default();
        }
        let mut tokens = tokens.into_iter();
        Self {
            token_id: to_uint(tokens.next()),
            price: to_uint(tokens.next()),
            beneficiary: to_address(tokens.next()),
        }
    }
}

fn listing(asset: Address, token_id: U256) -> [Token; 2] {
    [Token::Address(asset), Token::Uint(token_id)]
}

/// Default send settings carrying `satoshi`, rendered in MRX for the node
fn paying(satoshi: U256) -> Result<SendOptions, SdkError> {
    let value = scaled_to_decimal(&satoshi.to_string(), MRX_DECIMALS)?;
    Ok(SendOptions::default().with_value(value))
}

// ==================== SimpleAuction ====================

contract_proxy!(
    /// `SimpleAuction` English auction house
    SimpleAuction,
    abi::SIMPLE_AUCTION
);

impl Ownable for SimpleAuction {}
impl Pausable for SimpleAuction {}

impl SimpleAuction {
    /// Marketplace core the auction house reports to
    pub async fn core(&self) -> Address {
        self.contract.call_address("core()", &[]).await
    }

    /// State of the auction of `token_id`
    pub async fn get_auction(&self, asset: Address, token_id: U256) -> Auction {
        self.contract
            .call("getAuction(address,uint256)", &listing(asset, token_id))
            .await
            .map(Auction::from_tokens)
            .unwrap_or_default()
    }

    /// Raw `auctions` mapping entry: the asset contract and its auction state
    pub async fn auctions(&self, asset: Address, token_id: U256) -> (Address, Auction) {
        match self
            .contract
            .call("auctions(address,uint256)", &listing(asset, token_id))
            .await
        {
            Some(tokens) if tokens.len() >= 9 => {
                let mut tokens = tokens.into_iter();
                let asset = to_address(tokens.next());
                (asset, Auction::from_tokens(tokens.collect()))
            }
            _ => (Address::ZERO, Auction::default()),
        }
    }

    /// Outbid amount `bidder` can withdraw
    pub async fn pending_returns(&self, bidder: Address) -> U256 {
        self.contract
            .call_uint("pendingReturns(address)", &[Token::Address(bidder)])
            .await
    }

    /// Open an auction; the token must already be approved to the house
    pub async fn create_auction(
        &self,
        asset: Address,
        token_id: U256,
        minimum_bid: U256,
        bidding_time: U256,
        beneficiary: Address,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit(
                "createAuction(address,uint256,uint256,uint256,address)",
                &[
                    Token::Address(asset),
                    Token::Uint(token_id),
                    Token::Uint(minimum_bid),
                    Token::Uint(bidding_time),
                    Token::Address(beneficiary),
                ],
                &SendOptions::default().with_gas_limit(AUCTION_GAS_LIMIT),
            )
            .await
    }

    /// Bid `value` satoshi on `token_id`
    pub async fn bid(
        &self,
        asset: Address,
        token_id: U256,
        value: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit(
                "bid(address,uint256)",
                &listing(asset, token_id),
                &paying(value)?,
            )
            .await
    }

    /// Settle an auction whose time is up
    pub async fn auction_end(
        &self,
        asset: Address,
        token_id: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("auctionEnd(address,uint256)", &listing(asset, token_id))
            .await
    }

    /// Withdraw an auction that has no bids
    pub async fn cancel_auction(
        &self,
        asset: Address,
        token_id: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("cancelAuction(address,uint256)", &listing(asset, token_id))
            .await
    }

    /// Collect a won token
    pub async fn claim(&self, asset: Address, token_id: U256) -> Result<Transaction, SdkError> {
        self.contract
            .submit(
                "claim(address,uint256)",
                &listing(asset, token_id),
                &SendOptions::default().with_gas_limit(AUCTION_GAS_LIMIT),
            )
            .await
    }

    /// Withdraw outbid funds
    pub async fn withdraw(&self) -> Result<Transaction, SdkError> {
        self.contract.submit_default("withdraw()", &[]).await
    }
}

// ==================== BaseSale ====================

contract_proxy!(
    /// `BaseSale` fixed-price marketplace
    BaseSale,
    abi::BASE_SALE
);

impl Ownable for BaseSale {}
impl Pausable for BaseSale {}

impl BaseSale {
    /// Marketplace core the sale contract reports to
    pub async fn core(&self) -> Address {
        self.contract.call_address("core()", &[]).await
    }

    /// Listing of `token_id`
    pub async fn get_sale(&self, asset: Address, token_id: U256) -> Sale {
        self.contract
            .call("getSale(address,uint256)", &listing(asset, token_id))
            .await
            .map(Sale::from_tokens)
            .unwrap_or_default()
    }

    /// List `token_id` at `price`
    pub async fn create_sale(
        &self,
        asset: Address,
        token_id: U256,
        price: U256,
        beneficiary: Address,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default(
                "createSale(address,uint256,uint256,address)",
                &[
                    Token::Address(asset),
                    Token::Uint(token_id),
                    Token::Uint(price),
                    Token::Address(beneficiary),
                ],
            )
            .await
    }

    /// Remove a listing
    pub async fn cancel_sale(
        &self,
        asset: Address,
        token_id: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("cancelSale(address,uint256)", &listing(asset, token_id))
            .await
    }

    /// Buy `token_id`, paying `value` satoshi
    pub async fn purchase(
        &self,
        asset: Address,
        token_id: U256,
        value: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit(
                "purchase(address,uint256)",
                &listing(asset, token_id),
                &paying(value)?,
            )
            .await
    }
}

// ==================== MRC721AuctionController ====================

contract_proxy!(
    /// `MRC721AuctionController`: where the auction and sale contracts live
    Mrc721AuctionController,
    abi::MRC721_AUCTION_CONTROLLER
);

impl Ownable for Mrc721AuctionController {}

impl Mrc721AuctionController {
    /// Address of the [`BaseSale`] contract
    pub async fn sale(&self) -> Address {
        self.contract.call_address("sale()", &[]).await
    }

    /// Address of the [`SimpleAuction`] contract
    pub async fn simple_auction(&self) -> Address {
        self.contract.call_address("simpleAuction()", &[]).await
    }
}
