//! Ownership and pause control shared by the Metriverse contracts

use async_trait::async_trait;
use mrx_primitives::Address;

use super::ContractProxy;
use crate::abi::Token;
use crate::contract::Transaction;
use crate::SdkError;

/// `Ownable`: a single owner with transferable rights
#[async_trait]
pub trait Ownable: ContractProxy {
    /// Current owner, zero when unknown
    async fn owner(&self) -> Address {
        self.contract().call_address("owner()", &[]).await
    }

    /// Give up ownership for good
    async fn renounce_ownership(&self) -> Result<Transaction, SdkError> {
        self.contract().submit_default("renounceOwnership()", &[]).await
    }

    /// Hand ownership to `new_owner`
    async fn transfer_ownership(&self, new_owner: Address) -> Result<Transaction, SdkError> {
        self.contract()
            .submit_default("transferOwnership(address)", &[Token::Address(new_owner)])
            .await
    }
}

/// `Pausable`: owner-controlled stop switch for new listings
#[async_trait]
pub trait Pausable: ContractProxy {
    /// Whether new listings are blocked
    async fn paused(&self) -> bool {
        self.contract().call_bool("paused()", &[]).await
    }

    /// Block new listings
    async fn pause(&self) -> Result<Transaction, SdkError> {
        self.contract().submit_default("pause()", &[]).await
    }

    /// Allow new listings again
    async fn unpause(&self) -> Result<Transaction, SdkError> {
        self.contract().submit_default("unpause()", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ParamType;
    use crate::contracts::testing::{call_output, calldata, provider, sent};
    use crate::contracts::SimpleAuction;
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn test_owner_and_default() {
        let mock = MockTransport::new();
        let auction = SimpleAuction::new(Address::from_bytes([0x22; 20]), provider(&mock));
        let owner = Address::from_bytes([0x42; 20]);

        mock.set_response(
            "callcontract",
            call_output(&[ParamType::Address], &[Token::Address(owner)]),
        );
        assert_eq!(auction.owner().await, owner);

        mock.set_error("callcontract", -5, "Incorrect address");
        assert_eq!(auction.owner().await, Address::ZERO);
        assert!(!auction.paused().await);
    }

    #[tokio::test]
    async fn test_transfer_ownership_calldata() {
        let mock = MockTransport::new();
        mock.set_response("sendtocontract", sent());
        let auction = SimpleAuction::new(Address::from_bytes([0x22; 20]), provider(&mock));
        let new_owner = Address::from_bytes([0x42; 20]);

        let tx = auction.transfer_ownership(new_owner).await.unwrap();
        assert!(!tx.txid.is_zero());

        let data = calldata(&mock, 0);
        assert_eq!(hex::encode(&data[..4]), "f2fde38b");
        assert_eq!(&data[16..36], new_owner.as_bytes());
    }
}
