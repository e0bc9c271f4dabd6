//! Contract ABI tables

use alloy_dyn_abi::{DynSolType, EventExt, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::{Error as ErrorItem, Event, Function, JsonAbi, Param};
use alloy_primitives::B256;
use bytes::Bytes;
use mrx_primitives::H256;

use super::codec::decode;
use super::types::{from_value, from_values, to_values, Token};
use crate::SdkError;

/// Selector of the builtin `Error(string)` revert payload
const REVERT_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// One decoded event parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedParam {
    /// Parameter name
    pub name: String,
    /// Whether it came from a topic
    pub indexed: bool,
    /// Decoded value
    pub value: Token,
}

/// A log decoded against a contract ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// Event name
    pub name: String,
    /// Canonical signature
    pub signature: String,
    /// Parameters in declaration order
    pub params: Vec<DecodedParam>,
    /// Block timestamp, when the source reports one
    pub timestamp: Option<u64>,
}

impl DecodedEvent {
    /// Value of the parameter called `name`
    pub fn param(&self, name: &str) -> Option<&Token> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}

fn resolve(params: &[Param]) -> Result<Vec<DynSolType>, SdkError> {
    params
        .iter()
        .map(|p| p.resolve().map_err(|e| SdkError::AbiEncode(e.to_string())))
        .collect()
}

fn to_h256(word: B256) -> H256 {
    H256::from_bytes(word.0)
}

/// Functions, events and errors of one contract
#[derive(Debug, Clone, Default)]
pub struct Abi {
    inner: JsonAbi,
}

impl Abi {
    /// Build from human-readable fragments such as
    /// `"function ownerOf(uint256 tokenId) view returns (address)"`
    pub fn parse(fragments: &[&str]) -> Result<Self, SdkError> {
        let inner = JsonAbi::parse(fragments.iter().copied())
            .map_err(|e| SdkError::AbiEncode(format!("Invalid ABI fragment: {}", e)))?;
        Ok(Self { inner })
    }

    /// Build from a standard JSON ABI array
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        Ok(Self {
            inner: serde_json::from_str(json)?,
        })
    }

    /// Underlying JSON ABI
    pub fn json_abi(&self) -> &JsonAbi {
        &self.inner
    }

    /// All functions
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.inner.functions()
    }

    /// All events
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.inner.events()
    }

    /// All custom errors
    pub fn errors(&self) -> impl Iterator<Item = &ErrorItem> {
        self.inner.errors()
    }

    /// Look up a function by name or by signature.
    ///
    /// Signatures are compared with whitespace removed, so
    /// `"getAuction(address, uint256)"` finds `getAuction(address,uint256)`.
    /// A bare name that is overloaded resolves to the first declaration.
    pub fn function(&self, name_or_signature: &str) -> Result<&Function, SdkError> {
        let wanted: String = name_or_signature
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let found = match wanted.find('(') {
            Some(open) => self
                .inner
                .function(&wanted[..open])
                .and_then(|overloads| overloads.iter().find(|f| f.signature() == wanted)),
            None => self.inner.function(&wanted).and_then(|overloads| overloads.first()),
        };
        found.ok_or_else(|| {
            SdkError::AbiEncode(format!("Unknown function: {}", name_or_signature))
        })
    }

    /// Look up an event by name
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.inner.event(name).and_then(|overloads| overloads.first())
    }

    /// First topic of the event called `name`
    pub fn event_topic(&self, name: &str) -> Option<H256> {
        self.event(name).map(|e| to_h256(e.selector()))
    }

    /// Look up the event whose signature hashes to `topic`
    pub fn event_by_topic(&self, topic: &H256) -> Option<&Event> {
        let topic = B256::from(*topic.as_bytes());
        self.inner
            .events()
            .find(|e| !e.anonymous && e.selector() == topic)
    }

    /// Look up a custom error by name
    pub fn error(&self, name: &str) -> Option<&ErrorItem> {
        self.inner.error(name).and_then(|overloads| overloads.first())
    }

    /// Look up a custom error by selector
    pub fn error_by_selector(&self, selector: [u8; 4]) -> Option<&ErrorItem> {
        self.inner.errors().find(|e| e.selector().0 == selector)
    }

    /// Calldata for `method` with `args`
    pub fn encode_call(&self, method: &str, args: &[Token]) -> Result<Bytes, SdkError> {
        let function = self.function(method)?;
        let values = to_values(&resolve(&function.inputs)?, args)?;
        let data = function
            .abi_encode_input(&values)
            .map_err(|e| SdkError::AbiEncode(e.to_string()))?;
        Ok(Bytes::from(data))
    }

    /// Decode the return data of `method`
    pub fn decode_output(&self, method: &str, data: &[u8]) -> Result<Vec<Token>, SdkError> {
        let values = self
            .function(method)?
            .abi_decode_output(data, false)
            .map_err(|e| SdkError::AbiDecode(e.to_string()))?;
        from_values(values)
    }

    /// Decode a log emitted by this contract.
    ///
    /// Indexed parameters that are not single words (strings, bytes, arrays
    /// and tuples) only exist as their keccak hash and come back as a 32-byte
    /// `FixedBytes` token.
    pub fn decode_log(&self, topics: &[H256], data: &[u8]) -> Result<DecodedEvent, SdkError> {
        let first = topics
            .first()
            .ok_or_else(|| SdkError::AbiDecode("Log has no topics".to_string()))?;
        let event = self.event_by_topic(first).ok_or_else(|| {
            SdkError::AbiDecode(format!("No event for topic {}", first.to_hex()))
        })?;

        let words = topics.iter().map(|t| B256::from(*t.as_bytes()));
        let decoded = event
            .decode_log_parts(words, data, true)
            .map_err(|e| SdkError::AbiDecode(format!("{}: {}", event.signature(), e)))?;

        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let mut params = Vec::with_capacity(event.inputs.len());
        for input in &event.inputs {
            let value = if input.indexed {
                indexed.next()
            } else {
                body.next()
            }
            .ok_or_else(|| SdkError::AbiDecode(format!("Missing value for {}", input.name)))?;
            params.push(DecodedParam {
                name: input.name.clone(),
                indexed: input.indexed,
                value: from_value(value)?,
            });
        }

        Ok(DecodedEvent {
            name: event.name.clone(),
            signature: event.signature(),
            params,
            timestamp: None,
        })
    }

    /// Human-readable reason for revert data: the `Error(string)` message or
    /// a custom error rendered as `Name(arg, ...)`
    pub fn describe_revert(&self, output: &[u8]) -> Option<String> {
        if output.len() < 4 {
            return None;
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&output[..4]);
        if selector == REVERT_SELECTOR {
            return decode(&[DynSolType::String], &output[4..])
                .ok()?
                .pop()?
                .into_string();
        }
        let error = self.error_by_selector(selector)?;
        let args = from_values(error.abi_decode_input(&output[4..], false).ok()?).ok()?;
        let rendered: Vec<String> = args.iter().map(|t| t.to_string()).collect();
        Some(format!("{}({})", error.name, rendered.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{encode_params, function_selector};
    use mrx_primitives::{Address, U256};

    fn sample() -> Abi {
        Abi::parse(&[
            "function balanceOf(address account) view returns (uint256)",
            "function getAuction(address asset, uint256 tokenId) view returns (uint256, uint256)",
            "function transfer(address to, uint256 amount) returns (bool)",
            "event Transfer(address indexed from, address indexed to, uint256 value)",
            "event Listed(uint256[2] indexed ids, string indexed label, address seller)",
            "error BidNotHighEnough(uint256 highestBid)",
        ])
        .unwrap()
    }

    fn address_topic(addr: &Address) -> H256 {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(addr.as_bytes());
        H256::from_bytes(bytes)
    }

    #[test]
    fn test_lookup_by_name_and_signature() {
        let abi = sample();
        assert_eq!(abi.functions().count(), 3);
        assert_eq!(abi.function("balanceOf").unwrap().name, "balanceOf");
        assert_eq!(
            abi.function("getAuction(address, uint256)").unwrap().signature(),
            "getAuction(address,uint256)"
        );
        assert!(abi.function("getAuction(address)").is_err());
        assert!(abi.function("mint").is_err());
    }

    #[test]
    fn test_event_topic() {
        assert_eq!(
            sample().event_topic("Transfer").unwrap().to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_encode_call() {
        let abi = sample();
        let data = abi
            .encode_call("transfer", &[Token::Address(Address::ZERO), Token::uint(5u64)])
            .unwrap();
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 68);
        assert!(abi.encode_call("transfer", &[Token::Bool(true)]).is_err());
    }

    #[test]
    fn test_decode_output() {
        let abi = sample();
        let mut data = [0u8; 32];
        data[31] = 9;
        assert_eq!(
            abi.decode_output("balanceOf", &data).unwrap(),
            vec![Token::Uint(U256::from(9))]
        );
        assert!(abi.decode_output("balanceOf", &data[..8]).is_err());
    }

    #[test]
    fn test_decode_log() {
        let abi = sample();
        let topic = abi.event_topic("Transfer").unwrap();
        let from = Address::from_bytes([0x11; 20]);
        let to = Address::from_bytes([0x22; 20]);
        let mut value = [0u8; 32];
        value[31] = 3;

        let decoded = abi
            .decode_log(&[topic, address_topic(&from), address_topic(&to)], &value)
            .unwrap();
        assert_eq!(decoded.name, "Transfer");
        assert_eq!(decoded.signature, "Transfer(address,address,uint256)");
        assert_eq!(decoded.param("from"), Some(&Token::Address(from)));
        assert_eq!(decoded.param("to"), Some(&Token::Address(to)));
        assert_eq!(decoded.param("value"), Some(&Token::uint(3u64)));
        assert!(decoded.params[0].indexed && !decoded.params[2].indexed);

        assert!(abi.decode_log(&[H256::ZERO], &value).is_err());
        assert!(abi.decode_log(&[], &value).is_err());
        // a topic short
        assert!(abi.decode_log(&[topic, address_topic(&from)], &value).is_err());
    }

    #[test]
    fn test_indexed_composite_params_stay_hashed() {
        let abi = sample();
        let topic = abi.event_topic("Listed").unwrap();
        let ids_hash = H256::from_bytes([0xaa; 32]);
        let label_hash = H256::from_bytes([0xbb; 32]);
        let seller = Address::from_bytes([0x33; 20]);
        let data = encode_params(&[DynSolType::Address], &[Token::Address(seller)]).unwrap();

        let decoded = abi.decode_log(&[topic, ids_hash, label_hash], &data).unwrap();
        assert_eq!(decoded.param("ids"), Some(&Token::FixedBytes(vec![0xaa; 32])));
        assert_eq!(decoded.param("label"), Some(&Token::FixedBytes(vec![0xbb; 32])));
        assert_eq!(decoded.param("seller"), Some(&Token::Address(seller)));
    }

    #[test]
    fn test_describe_revert_message() {
        let mut output = REVERT_SELECTOR.to_vec();
        let reason = [Token::string("Auction ended")];
        output.extend(encode_params(&[DynSolType::String], &reason).unwrap());
        assert_eq!(sample().describe_revert(&output), Some("Auction ended".to_string()));
    }

    #[test]
    fn test_describe_custom_error() {
        let abi = sample();
        let mut output = function_selector("BidNotHighEnough(uint256)").to_vec();
        output.extend(encode_params(&[DynSolType::Uint(256)], &[Token::uint(100u64)]).unwrap());
        assert_eq!(abi.describe_revert(&output), Some("BidNotHighEnough(100)".to_string()));
        assert_eq!(abi.describe_revert(&[0x01, 0x02]), None);
        assert_eq!(abi.describe_revert(&[0xde, 0xad, 0xbe, 0xef]), None);
    }

    #[test]
    fn test_from_json() {
        let abi = Abi::from_json(
            r#"[
                {"type":"constructor","inputs":[],"stateMutability":"nonpayable"},
                {
                    "type": "function",
                    "name": "name",
                    "inputs": [],
                    "outputs": [{"name": "", "type": "string", "internalType": "string"}],
                    "stateMutability": "view"
                },
                {
                    "type": "event",
                    "name": "Paused",
                    "inputs": [{"name": "account", "type": "address", "indexed": false}],
                    "anonymous": false
                }
            ]"#,
        )
        .unwrap();
        assert_eq!(abi.functions().count(), 1);
        assert!(abi.function("name").is_ok());
        assert!(abi.event("Paused").is_some());
        assert!(Abi::from_json("not json").is_err());
    }
}
