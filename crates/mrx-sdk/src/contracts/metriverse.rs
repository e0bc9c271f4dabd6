//! Marketplace core: approved tokens, the MRC721 factory and fees

use mrx_primitives::{Address, H256, U256};

use super::abi;
use super::{contract_proxy, Ownable};
use crate::abi::Token;
use crate::contract::Transaction;
use crate::provider::SendOptions;
use crate::SdkError;

/// Gas limit used by [`MetriverseCore::create_mrc721`] unless overridden
pub const CREATE_MRC721_GAS_LIMIT: u64 = 2_500_000;

contract_proxy!(
    /// `MetriverseCore` marketplace contract
    MetriverseCore,
    abi::METRIVERSE_CORE
);

impl Ownable for MetriverseCore {}

impl MetriverseCore {
    // ==================== Reads ====================

    /// Whether `asset` is approved for trading
    pub async fn approved_token(&self, asset: Address) -> bool {
        self.contract
            .call_bool("approvedToken(address)", &[Token::Address(asset)])
            .await
    }

    /// Same as [`Self::approved_token`], through the explicit getter
    pub async fn is_approved_token(&self, asset: Address) -> bool {
        self.contract
            .call_bool("isApprovedToken(address)", &[Token::Address(asset)])
            .await
    }

    /// Whether `asset` was minted by the core's factories
    pub async fn internal_token(&self, asset: Address) -> bool {
        self.contract
            .call_bool("internalToken(address)", &[Token::Address(asset)])
            .await
    }

    /// Same as [`Self::internal_token`], through the explicit getter
    pub async fn is_internal_token(&self, asset: Address) -> bool {
        self.contract
            .call_bool("isInternalToken(address)", &[Token::Address(asset)])
            .await
    }

    /// Number of factory-minted collections
    pub async fn internal_token_count(&self) -> U256 {
        self.contract.call_uint("internalTokenCount()", &[]).await
    }

    /// Collection at `index` of the factory-minted list
    pub async fn internal_token_index(&self, index: U256) -> Address {
        self.contract
            .call_address("internalTokenIndex(uint256)", &[Token::Uint(index)])
            .await
    }

    /// Current auction controller
    pub async fn auction_controller(&self) -> Address {
        self.contract.call_address("auctionController()", &[]).await
    }

    /// Marketplace fee rate
    pub async fn auction_fee(&self) -> U256 {
        self.contract.call_uint("auctionFee()", &[]).await
    }

    /// Fee owed on a sale at `price`
    pub async fn get_auction_royalty(&self, price: U256) -> U256 {
        self.contract
            .call_uint("getAuctionRoyalty(uint256)", &[Token::Uint(price)])
            .await
    }

    /// Factory for plain collections
    pub async fn factory(&self) -> Address {
        self.contract.call_address("factory()", &[]).await
    }

    /// Factory for burnable collections
    pub async fn burnable_factory(&self) -> Address {
        self.contract.call_address("burnableFactory()", &[]).await
    }

    /// Whether `operator` is a controller
    pub async fn controllers(&self, operator: Address) -> bool {
        self.contract
            .call_bool("controllers(address)", &[Token::Address(operator)])
            .await
    }

    /// Same as [`Self::controllers`], through the explicit getter
    pub async fn get_controllers(&self, operator: Address) -> bool {
        self.contract
            .call_bool("getControllers(address)", &[Token::Address(operator)])
            .await
    }

    /// Next permission nonce of `account`
    pub async fn nonce(&self, account: Address) -> U256 {
        self.contract
            .call_uint("nonce(address)", &[Token::Address(account)])
            .await
    }

    /// Digest of a collection's name, symbol and URI
    pub async fn token_info(&self, name: &str, symbol: &str, uri: &str) -> H256 {
        self.contract
            .call_hash(
                "tokenInfo(string,string,string)",
                &[Token::string(name), Token::string(symbol), Token::string(uri)],
            )
            .await
    }

    /// Digest a controller signs to allow [`Self::create_mrc721`]
    pub async fn permission_slip(
        &self,
        info: H256,
        royalty: U256,
        burnable: bool,
        nonce: U256,
        beneficiary: Address,
    ) -> H256 {
        self.contract
            .call_hash(
                "permissionSlip(bytes32,uint96,bool,uint256,address)",
                &[
                    Token::bytes32(info),
                    Token::Uint(royalty),
                    Token::Bool(burnable),
                    Token::Uint(nonce),
                    Token::Address(beneficiary),
                ],
            )
            .await
    }

    // ==================== Writes ====================

    /// Allow or forbid trading of `asset`
    pub async fn approve_token(
        &self,
        asset: Address,
        approved: bool,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default(
                "approveToken(address,bool)",
                &[Token::Address(asset), Token::Bool(approved)],
            )
            .await
    }

    /// Deploy a new collection through the factory
    ///
    /// `signature` is a controller's signature over [`Self::permission_slip`].
    /// The gas limit defaults to [`CREATE_MRC721_GAS_LIMIT`].
    #[allow(clippy::too_many_arguments)]
    pub async fn create_mrc721(
        &self,
        name: &str,
        symbol: &str,
        base_uri: &str,
        burnable: bool,
        royalty: U256,
        beneficiary: Address,
        signature: Vec<u8>,
        gas_limit: Option<u64>,
    ) -> Result<Transaction, SdkError> {
        let options = SendOptions::default()
            .with_gas_limit(gas_limit.unwrap_or(CREATE_MRC721_GAS_LIMIT));
        self.contract
            .submit(
                "createMRC721(string,string,string,bool,uint96,address,bytes)",
                &[
                    Token::string(name),
                    Token::string(symbol),
                    Token::string(base_uri),
                    Token::Bool(burnable),
                    Token::Uint(royalty),
                    Token::Address(beneficiary),
                    Token::Bytes(signature),
                ],
                &options,
            )
            .await
    }

    /// Move the core's state to a new core
    pub async fn migrate(&self, core: Address) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("migrate(address)", &[Token::Address(core)])
            .await
    }

    /// Pay out collected fees
    pub async fn send_funds(
        &self,
        receiver: Address,
        amount: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default(
                "sendFunds(address,uint256)",
                &[Token::Address(receiver), Token::Uint(amount)],
            )
            .await
    }

    /// Replace the auction controller
    pub async fn set_auction_controller(
        &self,
        controller: Address,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("setAuctionController(address)", &[Token::Address(controller)])
            .await
    }

    /// Change the fee rate; `fee` is a uint96
    pub async fn set_auction_fee(&self, fee: U256) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("setAuctionFee(uint96)", &[Token::Uint(fee)])
            .await
    }

    /// Replace the burnable collection factory
    pub async fn set_burnable_factory(&self, factory: Address) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("setBurnableFactory(address)", &[Token::Address(factory)])
            .await
    }

    /// Grant or revoke controller rights
    pub async fn set_controller(
        &self,
        operator: Address,
        active: bool,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default(
                "setController(address,bool)",
                &[Token::Address(operator), Token::Bool(active)],
            )
            .await
    }

    /// Replace the plain collection factory
    pub async fn set_factory(&self, factory: Address) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default("setFactory(address)", &[Token::Address(factory)])
            .await
    }
}
