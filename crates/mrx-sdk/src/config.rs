//! SDK configuration
//!
//! ```toml
//! network = "TestNet"
//! provider = "rpc"
//!
//! [rpc]
//! url = "http://127.0.0.1:33841"
//! user = "metrix"
//! password = "secret"
//! sender = "maTQ7vSGzWWw4qV4BnFyZtVkNbX9Tnv6tK"
//!
//! [poll]
//! interval_secs = 60
//! max_attempts = 30
//!
//! [deployments.TestNet]
//! MetriverseCore = "0x..."
//! ```

use std::collections::BTreeMap;
use std::path::Path;
#[cfg(feature = "http")]
use std::sync::Arc;
use std::time::Duration;

use mrx_primitives::Network;
use serde::{Deserialize, Serialize};

#[cfg(feature = "http")]
use crate::provider::{
    ApiProvider, ExplorerClient, MetrixRpcClient, Provider, RpcProvider, Web3Provider,
};
use crate::provider::PollPolicy;
use crate::registry::Deployments;
use crate::SdkError;

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Public block explorer, read-only
    #[default]
    Api,
    /// Full node JSON-RPC
    Rpc,
    /// Wallet bridge for calls and sends, explorer for the rest
    Web3,
}

/// `[rpc]` section: node or wallet bridge endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub url: String,
    /// Basic-auth user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Basic-auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Wallet address reads and sends are made from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:33841".to_string()
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            user: None,
            password: None,
            sender: None,
        }
    }
}

/// `[poll]` section: confirmation polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between probes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Probes before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    30
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl From<PollConfig> for PollPolicy {
    fn from(config: PollConfig) -> Self {
        PollPolicy::new(Duration::from_secs(config.interval_secs), config.max_attempts)
    }
}

/// SDK configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Chain to talk to
    #[serde(default)]
    pub network: Network,
    /// Backend to use
    #[serde(default)]
    pub provider: ProviderKind,
    /// Explorer base URL; the network's public explorer when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    /// Node or bridge endpoint
    #[serde(default)]
    pub rpc: RpcConfig,
    /// Confirmation polling
    #[serde(default)]
    pub poll: PollConfig,
    /// `network name -> contract name -> hex address`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deployments: BTreeMap<String, BTreeMap<String, String>>,
}

impl SdkConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, SdkError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize as TOML
    pub fn to_toml_string(&self) -> Result<String, SdkError> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Confirmation polling policy
    pub fn poll_policy(&self) -> PollPolicy {
        self.poll.into()
    }

    /// Deployment registry
    pub fn deployments(&self) -> Result<Deployments, SdkError> {
        Deployments::from_tables(&self.deployments)
    }

    /// Provider described by this configuration
    #[cfg(feature = "http")]
    pub fn build_provider(&self) -> Arc<dyn Provider> {
        let explorer = ExplorerClient::connect(self.network, self.explorer_url.as_deref());
        tracing::info!("Using {:?} provider on {}", self.provider, self.network);
        match self.provider {
            ProviderKind::Api => {
                Arc::new(ApiProvider::new(explorer).with_poll_policy(self.poll_policy()))
            }
            ProviderKind::Rpc => {
                let client = MetrixRpcClient::connect(
                    &self.rpc.url,
                    self.rpc.user.as_deref(),
                    self.rpc.password.as_deref(),
                );
                let mut provider = RpcProvider::new(self.network, client)
                    .with_poll_policy(self.poll_policy());
                if let Some(sender) = &self.rpc.sender {
                    provider = provider.with_sender(sender.clone());
                }
                Arc::new(provider)
            }
            ProviderKind::Web3 => {
                let bridge = Arc::new(crate::transport::HttpTransport::new(&self.rpc.url));
                Arc::new(Web3Provider::new(bridge, explorer).with_poll_policy(self.poll_policy()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrx_primitives::Address;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = SdkConfig::from_toml_str("").unwrap();
        assert_eq!(config.network, Network::MainNet);
        assert_eq!(config.provider, ProviderKind::Api);
        assert_eq!(config.rpc.url, "http://127.0.0.1:33841");
        assert_eq!(config.poll_policy(), PollPolicy::default());
        assert!(config.deployments().unwrap().is_empty());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            network = "TestNet"
            provider = "rpc"

            [rpc]
            url = "http://node:33841"
            sender = "maTQ7vSGzWWw4qV4BnFyZtVkNbX9Tnv6tK"

            [poll]
            interval_secs = 5

            [deployments.TestNet]
            MetriverseCore = "0x1111111111111111111111111111111111111111"
        "#;
        let config = SdkConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.network, Network::TestNet);
        assert_eq!(config.provider, ProviderKind::Rpc);
        assert_eq!(config.rpc.user, None);
        assert_eq!(config.poll.interval_secs, 5);
        assert_eq!(config.poll.max_attempts, 30);
        assert_eq!(
            config
                .deployments()
                .unwrap()
                .get(Network::TestNet, crate::registry::METRIVERSE_CORE),
            Some(Address::from_bytes([0x11; 20]))
        );
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let config = SdkConfig::from_toml_str("[poll]\nmax_attempts = 0").unwrap();
        assert_eq!(config.poll.max_attempts, 0);
        assert_eq!(config.poll_policy().max_attempts, 1);
    }

    #[test]
    fn test_config_rejects_unknown_provider() {
        let err = SdkConfig::from_toml_str(r#"provider = "grpc""#).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_config_load_and_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut config = SdkConfig {
            network: Network::RegTest,
            provider: ProviderKind::Web3,
            ..Default::default()
        };
        config
            .deployments
            .entry("RegTest".to_string())
            .or_default()
            .insert("BaseSale".to_string(), "22".repeat(20));
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();

        let loaded = SdkConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SdkConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_build_provider_network() {
        let config = SdkConfig::from_toml_str("network = \"TestNet\"\nprovider = \"rpc\"").unwrap();
        assert_eq!(config.build_provider().network(), Network::TestNet);

        let config = SdkConfig::from_toml_str("network = \"RegTest\"").unwrap();
        assert_eq!(config.build_provider().network(), Network::RegTest);
    }
}
