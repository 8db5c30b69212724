//! Tenant JWKS fetch, cache, and key lookup.
//!
//! TRADE-OFFS
//! ==========
//! The key set is fetched lazily and cached for the process lifetime; an
//! unknown key id forces one refetch so tenant key rotation is picked up
//! without a restart. A per-minute fetch budget is not enforced here — the
//! refetch-on-miss rule already bounds traffic to one fetch per unknown kid.

#[cfg(test)]
#[path = "jwks_test.rs"]
mod jwks_test;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;

use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("jwks fetch failed: {0}")]
    Fetch(String),
    #[error("no signing key matches kid {0:?}")]
    UnknownKid(String),
    #[error("unusable signing key: {0}")]
    BadKey(String),
}

/// Build a decoding key for `kid` from a key set.
///
/// # Errors
///
/// Returns [`JwksError::UnknownKid`] when the set has no such key and
/// [`JwksError::BadKey`] when the key material cannot be used.
pub fn key_from_set(set: &JwkSet, kid: &str) -> Result<DecodingKey, JwksError> {
    let jwk = set.find(kid).ok_or_else(|| JwksError::UnknownKid(kid.to_owned()))?;
    DecodingKey::from_jwk(jwk).map_err(|e| JwksError::BadKey(e.to_string()))
}

async fn fetch_key_set(state: &AppState) -> Result<JwkSet, JwksError> {
    let url = state.config.auth.jwks_url();
    let resp = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| JwksError::Fetch(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(JwksError::Fetch(format!("{} from {url}", resp.status())));
    }
    resp.json::<JwkSet>()
        .await
        .map_err(|e| JwksError::Fetch(e.to_string()))
}

/// Resolve the decoding key for `kid`, consulting the cache first and
/// refetching once on a miss.
///
/// # Errors
///
/// Returns [`JwksError`] when the set cannot be fetched or the key id is
/// unknown even after a refetch.
pub async fn decoding_key_for(state: &AppState, kid: &str) -> Result<DecodingKey, JwksError> {
    {
        let cached = state.jwks.read().await;
        if let Some(set) = cached.as_ref() {
            if let Ok(key) = key_from_set(set, kid) {
                return Ok(key);
            }
        }
    }

    let fresh = fetch_key_set(state).await?;
    let key = key_from_set(&fresh, kid);
    *state.jwks.write().await = Some(fresh);
    key
}
