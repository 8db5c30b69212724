//! Order recording against the user's provider profile.
//!
//! ARCHITECTURE
//! ============
//! The server owns no database. An accepted order is appended to the
//! `orders` array inside the user's profile metadata through the provider's
//! management API: read the current metadata, append, patch it back. The
//! management token comes from the client-credentials grant and is cached
//! until shortly before expiry.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::time::{Duration, Instant};

use orders::OrderRecord;
use serde_json::{Value, json};

use crate::config::ManagementConfig;
use crate::state::{AppState, CachedToken};

/// Refresh the management token this long before the provider expires it.
const TOKEN_LEEWAY: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("management API not configured")]
    NotConfigured,
    #[error("management token request failed: {0}")]
    Token(String),
    #[error("profile read failed: {0}")]
    Read(String),
    #[error("profile update failed: {0}")]
    Update(String),
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds.
    expires_in: u64,
}

/// Audience of the management API for a tenant.
#[must_use]
pub fn management_audience(domain: &str) -> String {
    format!("https://{domain}/api/v2/")
}

/// Percent-encode a user id for use as a URL path segment. Provider subjects
/// look like `auth0|abc123`, and `|` is not a valid path byte.
#[must_use]
pub fn encode_user_id(sub: &str) -> String {
    let mut out = String::with_capacity(sub.len());
    for byte in sub.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

/// Append `record` to the `orders` array of a profile-metadata document,
/// preserving any unrelated metadata keys.
#[must_use]
pub fn append_order(metadata: Option<Value>, record: &OrderRecord) -> Value {
    let mut map = match metadata {
        Some(Value::Object(map)) => map,
        // Anything else (absent, null, wrong shape) starts fresh.
        _ => serde_json::Map::new(),
    };

    let orders_entry = map.entry("orders").or_insert_with(|| Value::Array(Vec::new()));
    if !orders_entry.is_array() {
        *orders_entry = Value::Array(Vec::new());
    }
    if let (Some(array), Ok(entry)) = (orders_entry.as_array_mut(), serde_json::to_value(record)) {
        array.push(entry);
    }
    Value::Object(map)
}

async fn management_token(state: &AppState, mgmt: &ManagementConfig) -> Result<String, ProfileError> {
    {
        let cached = state.mgmt_token.read().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_live()) {
            return Ok(token.token.clone());
        }
    }

    let domain = &state.config.auth.domain;
    let resp = state
        .http
        .post(format!("https://{domain}/oauth/token"))
        .json(&json!({
            "grant_type": "client_credentials",
            "client_id": mgmt.client_id,
            "client_secret": mgmt.client_secret,
            "audience": management_audience(domain),
        }))
        .send()
        .await
        .map_err(|e| ProfileError::Token(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(ProfileError::Token(format!("status {}", resp.status())));
    }
    let token: TokenResponse = resp.json().await.map_err(|e| ProfileError::Token(e.to_string()))?;

    let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_LEEWAY);
    *state.mgmt_token.write().await = Some(CachedToken {
        token: token.access_token.clone(),
        expires_at: Instant::now() + lifetime,
    });
    Ok(token.access_token)
}

/// Record an accepted order into the caller's profile metadata.
///
/// # Errors
///
/// Returns [`ProfileError`] when the management API is not configured or any
/// leg of the read-append-patch round-trip fails.
pub async fn record_order(state: &AppState, sub: &str, record: &OrderRecord) -> Result<(), ProfileError> {
    let mgmt = state.config.management.as_ref().ok_or(ProfileError::NotConfigured)?;
    let token = management_token(state, mgmt).await?;

    let domain = &state.config.auth.domain;
    let user_url = format!("https://{domain}/api/v2/users/{}", encode_user_id(sub));

    let resp = state
        .http
        .get(format!("{user_url}?fields=user_metadata"))
        .bearer_auth(&token)
        .send()
        .await
        .map_err(|e| ProfileError::Read(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(ProfileError::Read(format!("status {}", resp.status())));
    }
    let body: Value = resp.json().await.map_err(|e| ProfileError::Read(e.to_string()))?;
    let metadata = append_order(body.get("user_metadata").cloned(), record);

    let resp = state
        .http
        .patch(&user_url)
        .bearer_auth(&token)
        .json(&json!({ "user_metadata": metadata }))
        .send()
        .await
        .map_err(|e| ProfileError::Update(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(ProfileError::Update(format!("status {}", resp.status())));
    }

    tracing::debug!(%sub, order_id = %record.order_id, "order recorded to profile");
    Ok(())
}
