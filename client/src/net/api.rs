//! REST API helpers for communicating with the backend.
//!
//! Browser build: real HTTP calls via `gloo-net`. Off-browser the request
//! bodies are stubs, so the precheck logic stays testable natively.
//!
//! ERROR HANDLING
//! ==============
//! `place_order` returns a typed error kind instead of a raw status. The
//! permission-denied case is detected by the numeric 403 status — not the
//! reason phrase — and carries the re-login affordance text the UI shows.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use orders::{AuthSettings, CartItem, OrderReceipt};

use crate::auth::identity::IdentityClient;

/// Order submission endpoint.
pub const ORDERS_ENDPOINT: &str = "/api/orders";
/// Startup configuration document.
pub const AUTH_CONFIG_ENDPOINT: &str = "/auth_config.json";

/// Why an order submission failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OrderApiError {
    #[error("sign in to place an order")]
    NotAuthenticated,
    #[error("verify your email via the link we sent, then reload and try again")]
    EmailUnverified,
    /// The token was valid but lacked the order permission (HTTP 403).
    #[error("{message}")]
    Forbidden { message: String },
    #[error("order request failed with status {status}")]
    RequestFailed { status: u16 },
    #[error("network error: {0}")]
    Network(String),
}

impl OrderApiError {
    /// Whether the UI should offer a fresh login as the remedy.
    #[must_use]
    pub fn wants_relogin(&self) -> bool {
        matches!(self, Self::Forbidden { .. } | Self::NotAuthenticated)
    }
}

/// Message shown when the server refuses the order for lack of permission.
#[must_use]
pub fn forbidden_message() -> String {
    "Not enough permissions. Log in again and grant all permissions to place the order.".to_owned()
}

/// Map a non-success HTTP status to an error kind. 403 is authoritative for
/// "forbidden"; everything else is a generic request failure.
#[must_use]
pub fn error_for_status(status: u16) -> OrderApiError {
    if status == 403 {
        OrderApiError::Forbidden { message: forbidden_message() }
    } else {
        OrderApiError::RequestFailed { status }
    }
}

/// Fetch the identity-provider settings served by the backend. Consumed once
/// at startup.
pub async fn fetch_auth_settings() -> Result<AuthSettings, String> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::get(AUTH_CONFIG_ENDPOINT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("auth config fetch failed: {}", resp.status()));
        }
        resp.json::<AuthSettings>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "csr"))]
    {
        Err("not available outside the browser".to_owned())
    }
}

/// Submit the cart. Requires a live session and a verified email; both are
/// checked before the request goes out.
pub async fn place_order(
    identity: &dyn IdentityClient,
    items: &[CartItem],
) -> Result<OrderReceipt, OrderApiError> {
    let token = identity
        .get_token_silently()
        .await
        .map_err(|_| OrderApiError::NotAuthenticated)?;

    let user = identity
        .get_user()
        .await
        .map_err(|e| OrderApiError::Network(e.to_string()))?;
    if !user.email_verified {
        return Err(OrderApiError::EmailUnverified);
    }

    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::post(ORDERS_ENDPOINT)
            .header("Authorization", &format!("Bearer {token}"))
            .json(&items)
            .map_err(|e| OrderApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| OrderApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(error_for_status(resp.status()));
        }
        resp.json::<OrderReceipt>()
            .await
            .map_err(|e| OrderApiError::Network(e.to_string()))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (token, items);
        Err(OrderApiError::Network("not available outside the browser".to_owned()))
    }
}
