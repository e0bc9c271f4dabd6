//! # mrx-primitives
//!
//! Primitive types shared by the Metrix contract SDK.
//!
//! - [`Address`]: the 20-byte payload behind both hex and base58 addresses
//! - [`H256`]: transaction ids, block hashes and log topics
//! - [`Network`]: which Metrix chain a client talks to

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod network;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, H256};
pub use network::Network;

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Block height type
pub type BlockHeight = u64;

/// Gas type
pub type Gas = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_basic() {
        let a = U256::from(100u64);
        let b = U256::from(200u64);
        assert_eq!(a + b, U256::from(300u64));
    }
}
