//! CLI configuration management

use std::path::{Path, PathBuf};

use mrx_sdk::SdkConfig;

use crate::CliError;

/// SDK settings plus where they were loaded from
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// SDK configuration
    pub sdk: SdkConfig,
    path: Option<PathBuf>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".metrix"))
    }

    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load from `path`, or from the default location; defaults when the
    /// file does not exist
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let sdk = match &path {
            Some(p) if p.exists() => SdkConfig::load(p)?,
            _ => SdkConfig::default(),
        };
        Ok(Self { sdk, path })
    }

    /// File this configuration is saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save config to file
    pub fn save(&self) -> Result<(), CliError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| CliError::Config("Cannot determine config path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.sdk.to_toml_string()?)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }
}
