//! Deployed contract addresses per network

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use mrx_primitives::{Address, Network};

use crate::contracts::{BaseSale, MetriverseCore, Mrc721AuctionController, SimpleAuction};
use crate::provider::Provider;
use crate::SdkError;

/// Registry name of the marketplace core
pub const METRIVERSE_CORE: &str = "MetriverseCore";
/// Registry name of the auction controller
pub const MRC721_AUCTION_CONTROLLER: &str = "MRC721AuctionController";
/// Registry name of the auction house
pub const SIMPLE_AUCTION: &str = "SimpleAuction";
/// Registry name of the fixed-price marketplace
pub const BASE_SALE: &str = "BaseSale";

/// Contract name to address, per network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployments {
    entries: HashMap<Network, HashMap<String, Address>>,
}

impl Deployments {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `network name -> contract name -> hex address` tables
    pub fn from_tables(
        tables: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Result<Self, SdkError> {
        let mut deployments = Self::new();
        for (network, contracts) in tables {
            let network: Network = network.parse()?;
            for (name, address) in contracts {
                let address = Address::from_hex(address).map_err(|e| {
                    SdkError::Config(format!("{}.{}: {}", network, name, e))
                })?;
                deployments.insert(network, name, address);
            }
        }
        Ok(deployments)
    }

    /// Record `name` at `address` on `network`, replacing any previous entry
    pub fn insert(&mut self, network: Network, name: &str, address: Address) {
        self.entries
            .entry(network)
            .or_default()
            .insert(name.to_string(), address);
    }

    /// Address of `name` on `network`
    pub fn get(&self, network: Network, name: &str) -> Option<Address> {
        self.entries.get(&network)?.get(name).copied()
    }

    /// Like [`Self::get`], failing with [`SdkError::Config`] when absent
    pub fn require(&self, network: Network, name: &str) -> Result<Address, SdkError> {
        self.get(network, name).ok_or_else(|| {
            SdkError::Config(format!("no {} deployment on {}", name, network))
        })
    }

    /// Contracts known on `network`, sorted by name
    pub fn contracts(&self, network: Network) -> Vec<(&str, Address)> {
        let mut contracts: Vec<_> = self
            .entries
            .get(&network)
            .map(|m| m.iter().map(|(name, addr)| (name.as_str(), *addr)).collect())
            .unwrap_or_default();
        contracts.sort_by(|a, b| a.0.cmp(b.0));
        contracts
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }
}

/// Marketplace core deployed on the provider's network
pub fn metriverse_core(
    deployments: &Deployments,
    provider: Arc<dyn Provider>,
) -> Result<MetriverseCore, SdkError> {
    let address = deployments.require(provider.network(), METRIVERSE_CORE)?;
    Ok(MetriverseCore::new(address, provider))
}

/// Auction controller deployed on the provider's network
pub fn auction_controller(
    deployments: &Deployments,
    provider: Arc<dyn Provider>,
) -> Result<Mrc721AuctionController, SdkError> {
    let address = deployments.require(provider.network(), MRC721_AUCTION_CONTROLLER)?;
    Ok(Mrc721AuctionController::new(address, provider))
}

/// Auction house deployed on the provider's network
pub fn simple_auction(
    deployments: &Deployments,
    provider: Arc<dyn Provider>,
) -> Result<SimpleAuction, SdkError> {
    let address = deployments.require(provider.network(), SIMPLE_AUCTION)?;
    Ok(SimpleAuction::new(address, provider))
}

/// Fixed-price marketplace deployed on the provider's network
pub fn base_sale(
    deployments: &Deployments,
    provider: Arc<dyn Provider>,
) -> Result<BaseSale, SdkError> {
    let address = deployments.require(provider.network(), BASE_SALE)?;
    Ok(BaseSale::new(address, provider))
}
