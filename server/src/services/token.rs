//! Bearer-token verification against the tenant's signing keys.
//!
//! ERROR HANDLING
//! ==============
//! Every failure collapses to 401 at the route layer except a missing scope,
//! which the handler reports as 403 so the client can prompt a fresh login
//! with full permissions.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use orders::AuthSettings;
use serde::Deserialize;

use crate::services::jwks::{self, JwksError};
use crate::state::AppState;

/// Claims the order API cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Provider user id the order is recorded against.
    pub sub: String,
    /// Space-separated granted permissions.
    #[serde(default)]
    pub scope: Option<String>,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("missing bearer token")]
    Missing,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error(transparent)]
    Jwks(#[from] JwksError),
    #[error("token rejected: {0}")]
    Rejected(String),
}

/// Pull the bearer token out of the `Authorization` header.
///
/// # Errors
///
/// Returns [`TokenError::Missing`] when the header is absent or not a bearer
/// credential.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(TokenError::Missing)
}

/// RS256 validation pinned to the tenant's issuer and the API audience.
#[must_use]
pub fn validation_for(settings: &AuthSettings) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[settings.audience.as_str()]);
    validation.set_issuer(&[settings.issuer()]);
    validation
}

/// Verify `token` and return its claims.
///
/// # Errors
///
/// Returns [`TokenError`] for malformed tokens, unknown signing keys, and
/// signature/claim validation failures.
pub async fn verify(state: &AppState, token: &str) -> Result<Claims, TokenError> {
    let header = decode_header(token).map_err(|e| TokenError::Malformed(e.to_string()))?;
    let kid = header
        .kid
        .ok_or_else(|| TokenError::Malformed("no key id".to_owned()))?;

    let key = jwks::decoding_key_for(state, &kid).await?;
    let validation = validation_for(&state.config.auth);
    let data = decode::<Claims>(token, &key, &validation).map_err(|e| TokenError::Rejected(e.to_string()))?;
    Ok(data.claims)
}
