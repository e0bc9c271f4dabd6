//! MRC20 and MRC721 token proxies

use async_trait::async_trait;
use mrx_primitives::{Address, U256};

use super::abi;
use super::{contract_proxy, to_address, to_uint, ContractProxy, Ownable};
use crate::abi::Token;
use crate::contract::Transaction;
use crate::SdkError;

contract_proxy!(
    /// MRC20 fungible token
    Mrc20,
    abi::MRC20
);

impl Mrc20 {
    /// Token name
    pub async fn name(&self) -> String {
        self.contract.call_string("name()", &[]).await
    }

    /// Token symbol
    pub async fn symbol(&self) -> String {
        self.contract.call_string("symbol()", &[]).await
    }

    /// Decimal places of the smallest unit
    pub async fn decimals(&self) -> u8 {
        let decimals = self.contract.call_uint("decimals()", &[]).await;
        u8::try_from(decimals.low_u32()).unwrap_or_default()
    }

    /// Total supply in the smallest unit
    pub async fn total_supply(&self) -> U256 {
        self.contract.call_uint("totalSupply()", &[]).await
    }

    /// Balance of `owner`
    pub async fn balance_of(&self, owner: Address) -> U256 {
        self.contract
            .call_uint("balanceOf(address)", &[Token::Address(owner)])
            .await
    }

    /// Amount `spender` may move on behalf of `owner`
    pub async fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.contract
            .call_uint(
                "allowance(address,address)",
                &[Token::Address(owner), Token::Address(spender)],
            )
            .await
    }

    /// Allow `spender` to move `amount`
    pub async fn approve(&self, spender: Address, amount: U256) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default(
                "approve(address,uint256)",
                &[Token::Address(spender), Token::Uint(amount)],
            )
            .await
    }

    /// Send `amount` to `recipient`
    pub async fn transfer(
        &self,
        recipient: Address,
        amount: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default(
                "transfer(address,uint256)",
                &[Token::Address(recipient), Token::Uint(amount)],
            )
            .await
    }

    /// Move `amount` from `sender` to `recipient` under an allowance
    pub async fn transfer_from(
        &self,
        sender: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract
            .submit_default(
                "transferFrom(address,address,uint256)",
                &[
                    Token::Address(sender),
                    Token::Address(recipient),
                    Token::Uint(amount),
                ],
            )
            .await
    }
}

/// MRC721 (enumerable, with metadata)
#[async_trait]
pub trait Mrc721Token: ContractProxy {
    /// Collection name
    async fn name(&self) -> String {
        self.contract().call_string("name()", &[]).await
    }

    /// Collection symbol
    async fn symbol(&self) -> String {
        self.contract().call_string("symbol()", &[]).await
    }

    /// Metadata URI of `token_id`
    async fn token_uri(&self, token_id: U256) -> String {
        self.contract()
            .call_string("tokenURI(uint256)", &[Token::Uint(token_id)])
            .await
    }

    /// Number of tokens in existence
    async fn total_supply(&self) -> U256 {
        self.contract().call_uint("totalSupply()", &[]).await
    }

    /// Token id at `index` of all tokens
    async fn token_by_index(&self, index: U256) -> U256 {
        self.contract()
            .call_uint("tokenByIndex(uint256)", &[Token::Uint(index)])
            .await
    }

    /// Token id at `index` of the tokens held by `owner`
    async fn token_of_owner_by_index(&self, owner: Address, index: U256) -> U256 {
        self.contract()
            .call_uint(
                "tokenOfOwnerByIndex(address,uint256)",
                &[Token::Address(owner), Token::Uint(index)],
            )
            .await
    }

    /// Number of tokens held by `owner`
    async fn balance_of(&self, owner: Address) -> U256 {
        self.contract()
            .call_uint("balanceOf(address)", &[Token::Address(owner)])
            .await
    }

    /// Holder of `token_id`
    async fn owner_of(&self, token_id: U256) -> Address {
        self.contract()
            .call_address("ownerOf(uint256)", &[Token::Uint(token_id)])
            .await
    }

    /// Account approved for `token_id`
    async fn get_approved(&self, token_id: U256) -> Address {
        self.contract()
            .call_address("getApproved(uint256)", &[Token::Uint(token_id)])
            .await
    }

    /// Whether `operator` manages all of `owner`'s tokens
    async fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.contract()
            .call_bool(
                "isApprovedForAll(address,address)",
                &[Token::Address(owner), Token::Address(operator)],
            )
            .await
    }

    /// ERC-165 interface check; `interface_id` is a 4-byte selector
    async fn supports_interface(&self, interface_id: [u8; 4]) -> bool {
        self.contract()
            .call_bool(
                "supportsInterface(bytes4)",
                &[Token::FixedBytes(interface_id.to_vec())],
            )
            .await
    }

    /// Approve `to` for `token_id`
    async fn approve(&self, to: Address, token_id: U256) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "approve(address,uint256)",
                &[Token::Address(to), Token::Uint(token_id)],
            )
            .await
    }

    /// Let `operator` manage all of the sender's tokens
    async fn set_approval_for_all(
        &self,
        operator: Address,
        approved: bool,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "setApprovalForAll(address,bool)",
                &[Token::Address(operator), Token::Bool(approved)],
            )
            .await
    }

    /// Move `token_id` without the receiver check
    async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "transferFrom(address,address,uint256)",
                &[Token::Address(from), Token::Address(to), Token::Uint(token_id)],
            )
            .await
    }

    /// Move `token_id`, checking that a contract receiver accepts it
    async fn safe_transfer_from(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "safeTransferFrom(address,address,uint256)",
                &[Token::Address(from), Token::Address(to), Token::Uint(token_id)],
            )
            .await
    }

    /// [`Self::safe_transfer_from`] with data for the receiver hook
    async fn safe_transfer_from_data(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
        data: Vec<u8>,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "safeTransferFrom(address,address,uint256,bytes)",
                &[
                    Token::Address(from),
                    Token::Address(to),
                    Token::Uint(token_id),
                    Token::Bytes(data),
                ],
            )
            .await
    }
}

/// Factory-minted MRC721 with controller-gated minting
#[async_trait]
pub trait GenericMrc721Token: Mrc721Token + Ownable {
    /// Whether `operator` may mint
    async fn controllers(&self, operator: Address) -> bool {
        self.contract()
            .call_bool("controllers(address)", &[Token::Address(operator)])
            .await
    }

    /// Mint `token_id` to `receiver`
    async fn mint_unique(
        &self,
        receiver: Address,
        token_id: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "mintUnique(address,uint256)",
                &[Token::Address(receiver), Token::Uint(token_id)],
            )
            .await
    }

    /// Mint `batch_size` consecutive ids starting at `token_id`
    async fn mint_unique_batch(
        &self,
        receiver: Address,
        token_id: U256,
        batch_size: u16,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "mintUnique(address,uint256,uint16)",
                &[
                    Token::Address(receiver),
                    Token::Uint(token_id),
                    Token::Uint(U256::from(batch_size)),
                ],
            )
            .await
    }

    /// Replace the metadata base URI
    async fn set_base_uri(&self, uri: &str) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default("setBaseURI(string)", &[Token::string(uri)])
            .await
    }

    /// Grant or revoke minting rights
    async fn set_controller(
        &self,
        operator: Address,
        controller: bool,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "setController(address,bool)",
                &[Token::Address(operator), Token::Bool(controller)],
            )
            .await
    }
}

/// Tokens the holder can destroy
#[async_trait]
pub trait Burnable: ContractProxy {
    /// Destroy `token_id`
    async fn burn(&self, token_id: U256) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default("burn(uint256)", &[Token::Uint(token_id)])
            .await
    }
}

/// Collection-wide royalty
#[async_trait]
pub trait Royalty: ContractProxy {
    /// `(beneficiary, royalty)`; zeros when unknown
    async fn royalty_info(&self) -> (Address, U256) {
        match self.contract().call("royaltyInfo()", &[]).await {
            Some(tokens) if tokens.len() >= 2 => {
                let mut tokens = tokens.into_iter();
                (to_address(tokens.next()), to_uint(tokens.next()))
            }
            _ => (Address::ZERO, U256::zero()),
        }
    }

    /// Change the royalty and its beneficiary; `royalty` is a uint96 rate
    async fn set_royalty(
        &self,
        beneficiary: Address,
        royalty: U256,
    ) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default(
                "setRoyalty(address,uint96)",
                &[Token::Address(beneficiary), Token::Uint(royalty)],
            )
            .await
    }
}

contract_proxy!(
    /// MRC721 token
    Mrc721,
    abi::MRC721
);

impl Mrc721Token for Mrc721 {}

contract_proxy!(
    /// Factory-minted MRC721
    GenericMrc721,
    abi::GENERIC_MRC721
);

impl Mrc721Token for GenericMrc721 {}
impl Ownable for GenericMrc721 {}
impl GenericMrc721Token for GenericMrc721 {}

contract_proxy!(
    /// Factory-minted MRC721 with `burn`
    GenericMrc721Burnable,
    abi::GENERIC_MRC721_BURNABLE
);

impl Mrc721Token for GenericMrc721Burnable {}
impl Ownable for GenericMrc721Burnable {}
impl GenericMrc721Token for GenericMrc721Burnable {}
impl Burnable for GenericMrc721Burnable {}

contract_proxy!(
    /// Factory-minted MRC721 with royalties
    GenericMrc721Royalty,
    abi::GENERIC_MRC721_ROYALTY
);

impl Mrc721Token for GenericMrc721Royalty {}
impl Ownable for GenericMrc721Royalty {}
impl GenericMrc721Token for GenericMrc721Royalty {}
impl Royalty for GenericMrc721Royalty {}

contract_proxy!(
    /// Factory-minted MRC721 with `burn` and royalties
    GenericMrc721BurnableRoyalty,
    abi::GENERIC_MRC721_BURNABLE_ROYALTY
);

impl Mrc721Token for GenericMrc721BurnableRoyalty {}
impl Ownable for GenericMrc721BurnableRoyalty {}
impl GenericMrc721Token for GenericMrc721BurnableRoyalty {}
impl Burnable for GenericMrc721BurnableRoyalty {}
impl Royalty for GenericMrc721BurnableRoyalty {}
