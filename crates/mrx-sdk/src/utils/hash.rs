//! Packed keccak hashes used by the MRC721 factory

use mrx_primitives::{Address, H256, U256};

use crate::abi::{encode_packed, ParamType, Token};
use crate::SdkError;

fn packed_keccak(types: &[ParamType], tokens: &[Token]) -> Result<H256, SdkError> {
    Ok(mrx_crypto::keccak256(&encode_packed(types, tokens)?))
}

/// `keccak256(abi.encodePacked(name, symbol, baseURI))`
pub fn token_info(name: &str, symbol: &str, base_uri: &str) -> H256 {
    let mut packed = Vec::with_capacity(name.len() + symbol.len() + base_uri.len());
    packed.extend_from_slice(name.as_bytes());
    packed.extend_from_slice(symbol.as_bytes());
    packed.extend_from_slice(base_uri.as_bytes());
    mrx_crypto::keccak256(&packed)
}

/// Permission slip authorising an MRC721 creation:
///
/// ```text
/// keccak256(packed(
///     bool burnable,
///     bytes32 info,
///     keccak256(packed(uint96 royalty, address beneficiary)),
///     keccak256(packed(uint256 nonce, address beneficiary)),
/// ))
/// ```
///
/// Fails when `royalty` does not fit in 96 bits.
pub fn permission_slip(
    info: H256,
    royalty: u128,
    burnable: bool,
    nonce: U256,
    beneficiary: &Address,
) -> Result<H256, SdkError> {
    let royalty_hash = packed_keccak(
        &[ParamType::Uint(96), ParamType::Address],
        &[Token::uint(royalty), Token::Address(*beneficiary)],
    )?;
    let nonce_hash = packed_keccak(
        &[ParamType::Uint(256), ParamType::Address],
        &[Token::Uint(nonce), Token::Address(*beneficiary)],
    )?;
    packed_keccak(
        &[
            ParamType::Bool,
            ParamType::FixedBytes(32),
            ParamType::FixedBytes(32),
            ParamType::FixedBytes(32),
        ],
        &[
            Token::Bool(burnable),
            Token::bytes32(info),
            Token::bytes32(royalty_hash),
            Token::bytes32(nonce_hash),
        ],
    )
}
