//! EVM-layer contract/account address (20 bytes)
//!
//! Metrix shows the same 20 bytes in two shapes: bare hex (what the EVM layer
//! and the node's contract calls use) and base58check (what wallets display).
//! This type only covers the hex side; base58 lives in the SDK's address codec.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address parsing error
#[derive(Debug, Error)]
pub enum AddressError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// 20-byte address payload
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 20;

    /// Zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != Self::LEN {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as byte slice
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Lowercase hex with 0x prefix (EVM form)
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Lowercase hex without prefix, as the node and explorer expect it
    pub fn to_hex_unprefixed(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex_unprefixed())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_unprefixed())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Address {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex_unprefixed())
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Address::from_hex(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "1006ab418af315023717b240b84e7cb31d3e6d98";

    #[test]
    fn test_address_from_hex() {
        let addr = Address::from_hex(CONTRACT).unwrap();
        assert!(!addr.is_zero());

        let prefixed = Address::from_hex("0x1006aB418AF315023717B240B84E7Cb31d3e6D98").unwrap();
        assert_eq!(addr, prefixed);
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(
            Address::ZERO.to_hex(),
            "0x0000000000000000000000000000000000000000"
        );
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn test_display_is_unprefixed_lowercase() {
        let addr = Address::from_hex("0x1006AB418AF315023717B240B84E7CB31D3E6D98").unwrap();
        assert_eq!(addr.to_string(), CONTRACT);
        assert_eq!(addr.to_hex(), format!("0x{}", CONTRACT));
    }

    #[test]
    fn test_from_str() {
        let addr: Address = CONTRACT.parse().unwrap();
        assert_eq!(addr.to_hex_unprefixed(), CONTRACT);
    }

    #[test]
    fn test_address_from_hex_invalid_chars() {
        match Address::from_hex("1006ab418af315023717b240b84e7cb31d3e6gzz") {
            Err(AddressError::InvalidHex(_)) => {}
            other => panic!("Expected InvalidHex error, got {:?}", other),
        }
    }

    #[test]
    fn test_address_from_hex_empty() {
        match Address::from_hex("") {
            Err(AddressError::InvalidLength(0)) => {}
            other => panic!("Expected InvalidLength(0) error, got {:?}", other),
        }
    }

    #[test]
    fn test_address_length_boundaries() {
        assert!(matches!(
            Address::from_hex("1006ab418af315023717b240b84e7cb31d3e6d"),
            Err(AddressError::InvalidLength(19))
        ));
        assert!(matches!(
            Address::from_hex("1006ab418af315023717b240b84e7cb31d3e6d9800"),
            Err(AddressError::InvalidLength(21))
        ));
        assert!(Address::from_slice(&[0u8; 21]).is_err());
        assert!(Address::from_slice(&[0xab; 20]).is_ok());
    }

    #[test]
    fn test_address_debug() {
        let addr = Address::from_hex(CONTRACT).unwrap();
        assert_eq!(format!("{:?}", addr), format!("Address({})", CONTRACT));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_address_serde() {
        let addr = Address::from_hex(CONTRACT).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", CONTRACT));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
