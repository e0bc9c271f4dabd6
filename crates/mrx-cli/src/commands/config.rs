//! Configuration command

use clap::{Args, ValueEnum};
use mrx_primitives::Network;
use mrx_sdk::config::ProviderKind;

use crate::{config::Config, output::Output, CliError};

/// Backend choices accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    /// Block explorer
    Api,
    /// Full node JSON-RPC
    Rpc,
    /// Wallet bridge
    Web3,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Api => ProviderKind::Api,
            ProviderArg::Rpc => ProviderKind::Rpc,
            ProviderArg::Web3 => ProviderKind::Web3,
        }
    }
}

/// Show or edit configuration
#[derive(Debug, Args)]
pub struct ConfigCommand {
    /// Show current configuration
    #[arg(long)]
    show: bool,
    /// Set the network (MainNet, TestNet or RegTest)
    #[arg(long)]
    set_network: Option<String>,
    /// Set the explorer base URL
    #[arg(long)]
    set_explorer: Option<String>,
    /// Set the provider backend
    #[arg(long, value_enum)]
    set_provider: Option<ProviderArg>,
    /// Set the node JSON-RPC URL
    #[arg(long)]
    set_rpc_url: Option<String>,
    /// Set the wallet sender address
    #[arg(long)]
    set_sender: Option<String>,
}

impl ConfigCommand {
    pub fn execute(self, config: &mut Config, json: bool) -> Result<(), CliError> {
        let mut modified = false;

        if let Some(network) = self.set_network {
            config.sdk.network = network
                .parse::<Network>()
                .map_err(|e| CliError::InvalidInput(e.to_string()))?;
            modified = true;
        }
        if let Some(url) = self.set_explorer {
            config.sdk.explorer_url = Some(url);
            modified = true;
        }
        if let Some(provider) = self.set_provider {
            config.sdk.provider = provider.into();
            modified = true;
        }
        if let Some(url) = self.set_rpc_url {
            config.sdk.rpc.url = url;
            modified = true;
        }
        if let Some(sender) = self.set_sender {
            config.sdk.rpc.sender = Some(sender);
            modified = true;
        }

        if modified {
            config.save()?;
            Output::new(json)
                .field("status", "saved")
                .message("Configuration saved")
                .print();
        } else if self.show {
            let sdk = &config.sdk;
            let provider = format!("{:?}", sdk.provider).to_lowercase();
            let explorer = sdk.explorer_url.clone().unwrap_or_else(|| {
                mrx_sdk::provider::default_explorer_url(sdk.network)
                    .unwrap_or("none")
                    .to_string()
            });
            Output::new(json)
                .field("network", sdk.network.name())
                .field("provider", &provider)
                .field("explorer_url", &explorer)
                .field("rpc_url", &sdk.rpc.url)
                .field_u64("poll_interval_secs", sdk.poll.interval_secs)
                .field_u64("poll_max_attempts", u64::from(sdk.poll.max_attempts))
                .message(&format!(
                    "Network: {}\nProvider: {}\nExplorer: {}\nRPC URL: {}\n\
                     Polling: every {}s, {} attempts",
                    sdk.network,
                    provider,
                    explorer,
                    sdk.rpc.url,
                    sdk.poll.interval_secs,
                    sdk.poll.max_attempts
                ))
                .print();
        } else {
            Output::new(json)
                .message(
                    "Use --show to display config, \
                     or --set-network/--set-explorer/--set-provider to modify",
                )
                .print();
        }

        Ok(())
    }
}
