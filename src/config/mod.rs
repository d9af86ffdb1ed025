#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8282";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub auth_token: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            auth_token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub server_url: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl ClientSettings {
    pub fn resolve(file: Option<&TomlConfig>, overrides: SettingsOverrides) -> Self {
        let server = file.map(|f| f.server.clone()).unwrap_or_default();
        let defaults = ClientSettings::default();

        Self {
            server_url: overrides
                .server_url
                .or(server.url)
                .unwrap_or(defaults.server_url),
            auth_token: overrides
                .auth_token
                .or(server.auth_token)
                .filter(|token| !token.trim().is_empty()),
            timeout_seconds: overrides
                .timeout_seconds
                .or(server.timeout_seconds)
                .unwrap_or(defaults.timeout_seconds),
        }
    }
}

impl ConfigProvider for ClientSettings {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_url("server.url", &self.server_url)?;
        validate_positive_number("server.timeout_seconds", self.timeout_seconds as usize, 1)?;
        Ok(())
    }
}
