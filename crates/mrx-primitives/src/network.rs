//! Metrix network selection

use std::fmt;
use std::str::FromStr;

use crate::PrimitiveError;

/// A Metrix chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Network {
    /// Production chain
    #[default]
    MainNet,
    /// Public test chain
    TestNet,
    /// Local regression-test chain
    RegTest,
}

impl Network {
    /// All networks, in declaration order
    pub const ALL: [Network; 3] = [Network::MainNet, Network::TestNet, Network::RegTest];

    /// Version byte prepended to a pay-to-pubkey-hash payload before base58check
    pub const fn address_prefix(self) -> u8 {
        match self {
            Network::MainNet => 0x32,
            Network::TestNet | Network::RegTest => 0x6e,
        }
    }

    /// Canonical name
    pub const fn name(self) -> &'static str {
        match self {
            Network::MainNet => "MainNet",
            Network::TestNet => "TestNet",
            Network::RegTest => "RegTest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::MainNet),
            "testnet" | "test" => Ok(Network::TestNet),
            "regtest" => Ok(Network::RegTest),
            _ => Err(PrimitiveError::UnknownNetwork(s.to_string())),
        }
    }
}
