//! Environment-sourced configuration.
//!
//! All provider-facing settings and secrets come from the environment (with
//! `.env` support in `main`); nothing sensitive lives in source. The auth
//! settings double as the document served to the SPA at
//! `GET /auth_config.json`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use orders::AuthSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Client-credentials pair for the provider's management API. Optional:
/// without it orders are accepted but not recorded.
#[derive(Clone, Debug)]
pub struct ManagementConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl ManagementConfig {
    /// Load from `AUTH_MGMT_CLIENT_ID` / `AUTH_MGMT_CLIENT_SECRET`.
    /// Returns `None` if either is missing.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("AUTH_MGMT_CLIENT_ID").ok()?;
        let client_secret = std::env::var("AUTH_MGMT_CLIENT_SECRET").ok()?;
        Some(Self { client_id, client_secret })
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Settings served to the SPA and used for token verification.
    pub auth: AuthSettings,
    pub management: Option<ManagementConfig>,
    /// Directory holding the built SPA (index.html, assets, wasm pkg).
    pub site_dir: PathBuf,
}

impl ServerConfig {
    /// Load the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent or `PORT`
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_port(std::env::var("PORT").ok())?,
            auth: AuthSettings {
                domain: require("AUTH_DOMAIN")?,
                client_id: require("AUTH_CLIENT_ID")?,
                audience: require("AUTH_AUDIENCE")?,
            },
            management: ManagementConfig::from_env(),
            site_dir: std::env::var("SITE_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("site")),
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

pub(crate) fn parse_port(raw: Option<String>) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(3000),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw)),
    }
}
