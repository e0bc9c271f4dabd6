//! Base58check / hex address conversion

use mrx_primitives::{Address, Network};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::SdkError;

/// Base58 Metrix address (`M...` on MainNet, `m...` on TestNet)
pub static METRIX_ADDRESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([mM])[a-zA-HJ-NP-Z0-9]{25,39}$").expect("constant regex"));

/// Bare 40-character hex address
pub static HEX_ADDRESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{40}$").expect("constant regex"));

/// `0x`-prefixed hex address
pub static ETHEREUM_ADDRESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("constant regex"));

/// Prefix byte + 20-byte payload + 4-byte checksum
const DECODED_LEN: usize = 1 + Address::LEN + 4;

/// Whether `s` looks like a base58 Metrix address
pub fn is_metrix_address(s: &str) -> bool {
    METRIX_ADDRESS_REGEX.is_match(s)
}

/// Whether `s` is 40 hex characters
pub fn is_hex_address(s: &str) -> bool {
    HEX_ADDRESS_REGEX.is_match(s)
}

/// Whether `s` is `0x` followed by 40 hex characters
pub fn is_ethereum_address(s: &str) -> bool {
    ETHEREUM_ADDRESS_REGEX.is_match(s)
}

/// Decode a base58check address to 40 lowercase hex characters.
///
/// The checksum is verified; the prefix byte is not checked against a
/// network.
pub fn to_hex_address(address: &str) -> Result<String, SdkError> {
    let bytes = bs58::decode(address).into_vec()?;
    if bytes.len() != DECODED_LEN {
        return Err(SdkError::InvalidAddress(format!(
            "{}: expected {} bytes, decoded {}",
            address,
            DECODED_LEN,
            bytes.len()
        )));
    }

    let (body, checksum) = bytes.split_at(DECODED_LEN - 4);
    if mrx_crypto::checksum(body)[..] != *checksum {
        return Err(SdkError::InvalidAddress(format!("{}: checksum mismatch", address)));
    }

    Ok(hex::encode(&body[1..]))
}

/// Encode a 40-character hex address as base58check for `network`.
///
/// Returns `None` unless `hex` is exactly 40 hex characters.
pub fn from_hex_address(network: Network, hex: &str) -> Option<String> {
    if !is_hex_address(hex) {
        return None;
    }
    let address = Address::from_hex(hex).ok()?;
    Some(to_base58(network, &address))
}

/// Base58check form of `address` on `network`
pub fn to_base58(network: Network, address: &Address) -> String {
    let mut payload = Vec::with_capacity(DECODED_LEN);
    payload.push(network.address_prefix());
    payload.extend_from_slice(address.as_bytes());
    let checksum = mrx_crypto::checksum(&payload);
    payload.extend_from_slice(&checksum);
    bs58::encode(payload).into_string()
}

/// Parse any of the three address shapes
pub fn parse_any_address(s: &str) -> Result<Address, SdkError> {
    let s = s.trim();
    if is_ethereum_address(s) || is_hex_address(s) {
        return Ok(Address::from_hex(s)?);
    }
    if is_metrix_address(s) {
        return Ok(Address::from_hex(&to_hex_address(s)?)?);
    }
    Err(SdkError::InvalidAddress(s.to_string()))
}
