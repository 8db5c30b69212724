//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! server keeps no domain data of its own — order history lives with the
//! identity provider — so shared state is just the configuration, one HTTP
//! client, and two provider-facing caches: the tenant JWKS and the
//! management-API token.

use std::sync::Arc;
use std::time::Instant;

use jsonwebtoken::jwk::JwkSet;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// A management-API access token with its refresh deadline.
#[derive(Clone, Debug)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: Instant,
}

impl CachedToken {
    /// Whether the token can still be used.
    #[must_use]
    pub fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub http: reqwest::Client,
    /// Tenant signing keys; refetched when an unknown key id appears.
    pub jwks: Arc<RwLock<Option<JwkSet>>>,
    /// Client-credentials token for the management API.
    pub mgmt_token: Arc<RwLock<Option<CachedToken>>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            jwks: Arc::new(RwLock::new(None)),
            mgmt_token: Arc::new(RwLock::new(None)),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;
