//! Parameter encoding and decoding

use alloy_dyn_abi::{DynSolType, DynSolValue};

use super::types::{from_value, from_values, to_values, Token};
use crate::SdkError;

/// Encode `tokens` as a parameter list of `types`
pub fn encode_params(types: &[DynSolType], tokens: &[Token]) -> Result<Vec<u8>, SdkError> {
    Ok(DynSolValue::Tuple(to_values(types, tokens)?).abi_encode_params())
}

/// Decode a parameter list of `types`
pub fn decode(types: &[DynSolType], data: &[u8]) -> Result<Vec<Token>, SdkError> {
    let value = DynSolType::Tuple(types.to_vec())
        .abi_decode_params(data)
        .map_err(|e| SdkError::AbiDecode(e.to_string()))?;
    match value {
        DynSolValue::Tuple(items) => from_values(items),
        other => Ok(vec![from_value(other)?]),
    }
}

/// Solidity `abi.encodePacked` of `tokens` typed as `types`
pub fn encode_packed(types: &[DynSolType], tokens: &[Token]) -> Result<Vec<u8>, SdkError> {
    Ok(to_values(types, tokens)?
        .iter()
        .flat_map(DynSolValue::abi_encode_packed)
        .collect())
}

/// First 4 bytes of keccak256(signature)
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = mrx_crypto::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}
