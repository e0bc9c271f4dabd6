//! ABI values and their mapping onto `alloy-dyn-abi`

use std::fmt;

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address as SolAddress, B256, I256, U256 as SolU256};
use mrx_primitives::{Address, H256, U256};

use crate::SdkError;

/// Solidity ABI token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

impl Token {
    /// Create a uint256 from u128
    pub fn uint(value: impl Into<U256>) -> Self {
        Token::Uint(value.into())
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a bytes32 token
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }

    /// Address value, if this is an address token
    pub fn into_address(self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Unsigned value, if this is a uint token
    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean value, if this is a bool token
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// String value, if this is a string token
    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Raw bytes of a `bytes` or `bytesN` token
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Token::Bytes(b) | Token::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// Members of a tuple or array token
    pub fn into_tokens(self) -> Option<Vec<Token>> {
        match self {
            Token::Tuple(t) | Token::Array(t) | Token::FixedArray(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(a) => write!(f, "{}", a.to_hex()),
            Token::Uint(v) => write!(f, "{}", v),
            Token::Int(v) => write!(f, "{}", v),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Bytes(b) | Token::FixedBytes(b) => write!(f, "0x{}", hex::encode(b)),
            Token::String(s) => f.write_str(s),
            Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
                let (open, close) = if matches!(self, Token::Tuple(_)) {
                    ("(", ")")
                } else {
                    ("[", "]")
                };
                f.write_str(open)?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(close)
            }
        }
    }
}

// ==================== Conversions ====================

fn to_sol_uint(value: &U256) -> SolU256 {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    SolU256::from_be_bytes(bytes)
}

fn from_sol_uint(value: &SolU256) -> U256 {
    U256::from_big_endian(&value.to_be_bytes::<32>())
}

fn mismatch(ty: &DynSolType, token: &Token) -> SdkError {
    SdkError::AbiEncode(format!("Cannot encode {} as {}", token, ty.sol_type_name()))
}

fn items_to_values(ty: &DynSolType, tokens: &[Token]) -> Result<Vec<DynSolValue>, SdkError> {
    tokens.iter().map(|t| to_value(ty, t)).collect()
}

/// Convert `token` into the value `ty` expects.
///
/// Integer widths and byte lengths come from `ty`, so a `Token::Uint` can
/// fill a `uint96` slot as long as the value fits.
pub(crate) fn to_value(ty: &DynSolType, token: &Token) -> Result<DynSolValue, SdkError> {
    let value = match (ty, token) {
        (DynSolType::Address, Token::Address(a)) => {
            DynSolValue::Address(SolAddress::from(*a.as_bytes()))
        }
        (DynSolType::Uint(bits), Token::Uint(v)) => {
            if *bits < 256 && v.bits() > *bits {
                return Err(SdkError::AbiEncode(format!(
                    "Value {} does not fit in uint{}",
                    v, bits
                )));
            }
            DynSolValue::Uint(to_sol_uint(v), *bits)
        }
        (DynSolType::Int(bits), Token::Int(v)) => DynSolValue::Int(*v, *bits),
        (DynSolType::Bool, Token::Bool(b)) => DynSolValue::Bool(*b),
        (DynSolType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() > *size {
                return Err(SdkError::AbiEncode(format!(
                    "{} bytes do not fit in bytes{}",
                    data.len(),
                    size
                )));
            }
            let mut word = [0u8; 32];
            word[..data.len()].copy_from_slice(data);
            DynSolValue::FixedBytes(B256::from(word), *size)
        }
        (DynSolType::Bytes, Token::Bytes(data)) => DynSolValue::Bytes(data.clone()),
        (DynSolType::String, Token::String(s)) => DynSolValue::String(s.clone()),
        (DynSolType::Array(inner), Token::Array(items)) => {
            DynSolValue::Array(items_to_values(inner, items)?)
        }
        (DynSolType::FixedArray(inner, size), Token::FixedArray(items)) => {
            if items.len() != *size {
                return Err(mismatch(ty, token));
            }
            DynSolValue::FixedArray(items_to_values(inner, items)?)
        }
        (DynSolType::Tuple(types), Token::Tuple(items)) => {
            DynSolValue::Tuple(to_values(types, items)?)
        }
        _ => return Err(mismatch(ty, token)),
    };
    Ok(value)
}

/// Convert a parameter list, checking the argument count
pub(crate) fn to_values(
    types: &[DynSolType],
    tokens: &[Token],
) -> Result<Vec<DynSolValue>, SdkError> {
    if types.len() != tokens.len() {
        return Err(SdkError::AbiEncode(format!(
            "Expected {} arguments, got {}",
            types.len(),
            tokens.len()
        )));
    }
    types.iter().zip(tokens).map(|(ty, t)| to_value(ty, t)).collect()
}

/// Convert a decoded value back into a token
pub(crate) fn from_value(value: DynSolValue) -> Result<Token, SdkError> {
    let token = match value {
        DynSolValue::Address(a) => Token::Address(Address::from_bytes(a.0 .0)),
        DynSolValue::Uint(v, _) => Token::Uint(from_sol_uint(&v)),
        DynSolValue::Int(v, _) => Token::Int(v),
        DynSolValue::Bool(b) => Token::Bool(b),
        DynSolValue::FixedBytes(word, size) => {
            Token::FixedBytes(word.as_slice()[..size.min(32)].to_vec())
        }
        DynSolValue::Function(f) => Token::FixedBytes(f.to_vec()),
        DynSolValue::Bytes(b) => Token::Bytes(b),
        DynSolValue::String(s) => Token::String(s),
        DynSolValue::Array(items) => Token::Array(from_values(items)?),
        DynSolValue::FixedArray(items) => Token::FixedArray(from_values(items)?),
        DynSolValue::Tuple(items) => Token::Tuple(from_values(items)?),
        #[allow(unreachable_patterns)]
        other => {
            return Err(SdkError::AbiDecode(format!("Unsupported value: {:?}", other)));
        }
    };
    Ok(token)
}

/// Convert a decoded value list
pub(crate) fn from_values(values: Vec<DynSolValue>) -> Result<Vec<Token>, SdkError> {
    values.into_iter().map(from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accessors() {
        assert_eq!(Token::Bool(true).into_bool(), Some(true));
        assert_eq!(Token::uint(7u64).into_uint(), Some(U256::from(7)));
        assert_eq!(Token::Bool(true).into_uint(), None);
        assert_eq!(Token::string("x").into_string(), Some("x".to_string()));
        assert_eq!(
            Token::Tuple(vec![Token::Bool(false)]).into_tokens(),
            Some(vec![Token::Bool(false)])
        );
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Int(I256::MINUS_ONE).to_string(), "-1");
        assert_eq!(Token::FixedBytes(vec![0xab, 0xcd]).to_string(), "0xabcd");
        assert_eq!(
            Token::Tuple(vec![Token::uint(1u64), Token::Bool(true)]).to_string(),
            "(1,true)"
        );
    }

    #[test]
    fn test_uint_width_checked() {
        let too_big = Token::Uint(U256::one() << 96);
        assert!(to_value(&DynSolType::Uint(96), &too_big).is_err());
        assert_eq!(
            to_value(&DynSolType::Uint(96), &Token::uint(u64::MAX)).unwrap(),
            DynSolValue::Uint(SolU256::from(u64::MAX), 96)
        );
    }

    #[test]
    fn test_mismatched_token_rejected() {
        assert!(to_value(&DynSolType::Address, &Token::Bool(true)).is_err());
        assert!(to_values(&[DynSolType::Address], &[]).is_err());
        let short = Token::FixedArray(vec![Token::Bool(true)]);
        assert!(to_value(&DynSolType::FixedArray(Box::new(DynSolType::Bool), 2), &short).is_err());
    }

    #[test]
    fn test_value_round_trip_keeps_addresses_and_words() {
        let addr = Address::from_bytes([0x42; 20]);
        let ty = DynSolType::Tuple(vec![DynSolType::Address, DynSolType::FixedBytes(4)]);
        let token = Token::Tuple(vec![Token::Address(addr), Token::FixedBytes(vec![1, 2, 3, 4])]);
        let value = to_value(&ty, &token).unwrap();
        assert_eq!(from_value(value).unwrap(), token);
    }
}
