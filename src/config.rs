//! Client configuration
//!
//! A configuration can be read from a YAML context file, for example:
//! ```yaml
//! host: https://cds.example.com/cdsapi
//! token: xxxxxxxx
//! insecure_skip_verify: false
//! timeout_secs: 60
//! ```
//!
//! Environment variables override individual fields:
//! - `CDS_API_URL`: API base URL (required when no file is given)
//! - `CDS_TOKEN`: consumer token, sent as a Bearer header
//! - `CDS_SESSION_TOKEN`: session token, used when no consumer token is set
//! - `CDS_INSECURE`: `true` or `1` to skip TLS certificate verification
//! - `CDS_TIMEOUT`: request timeout in seconds

use crate::client::{Auth, CdsClient};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_API_URL: &str = "CDS_API_URL";
pub const ENV_TOKEN: &str = "CDS_TOKEN";
pub const ENV_SESSION_TOKEN: &str = "CDS_SESSION_TOKEN";
pub const ENV_INSECURE: &str = "CDS_INSECURE";
pub const ENV_TIMEOUT: &str = "CDS_TIMEOUT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CdsConfig {
    /// API base URL
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl CdsConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
            session_token: None,
            insecure_skip_verify: false,
            timeout_secs: None,
        }
    }

    /// Authentication derived from the configured tokens
    pub fn auth(&self) -> Auth {
        Auth::new(self.token.clone(), self.session_token.clone())
    }

    /// Build a client from this configuration
    pub fn client(&self) -> Result<CdsClient> {
        CdsClient::from_config(self)
    }

    /// Read configuration from a YAML file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        let config: Self =
            serde_yaml::from_str(&content).with_context(|| "Failed to parse config YAML")?;

        Ok(config)
    }

    /// Write configuration to a YAML file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml =
            serde_yaml::to_string(self).with_context(|| "Failed to serialize config to YAML")?;

        std::fs::write(path.as_ref(), yaml).with_context(|| {
            format!("Failed to write config file: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup, `CDS_API_URL` is required
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup(ENV_API_URL)
            .ok_or_else(|| eyre::eyre!("{} environment variable not set", ENV_API_URL))?;
        let mut config = Self::new(host);
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Load from `path` when given, then let the environment override fields.
    /// Without a path the environment alone is used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                let mut config = Self::read(path)?;
                config.apply_overrides(|key| std::env::var(key).ok())?;
                Ok(config)
            }
            None => Self::from_env(),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup(ENV_API_URL) {
            self.host = host;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        if let Some(session) = lookup(ENV_SESSION_TOKEN).filter(|t| !t.is_empty()) {
            self.session_token = Some(session);
        }
        if let Some(insecure) = lookup(ENV_INSECURE) {
            self.insecure_skip_verify = matches!(insecure.to_lowercase().as_str(), "true" | "1");
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            let secs = timeout
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_TIMEOUT, timeout))?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }
}
