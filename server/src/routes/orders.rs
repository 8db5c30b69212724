//! Order API — token-gated order intake.

#[cfg(test)]
#[path = "orders_test.rs"]
mod orders_test;

use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orders::{ApiErrorBody, CartItem, OrderReceipt, OrderRecord, SCOPE_CREATE_ORDERS, scope_grants};

use crate::services::profile::{self, ProfileError};
use crate::services::token::{self, Claims};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Verified caller extracted from the bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    /// Demand a permission from the token's `scope` claim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] when the scope is not granted — the
    /// 403 is what tells the client to prompt a fresh, fully scoped login.
    pub fn require_scope(&self, scope: &str) -> Result<(), ApiError> {
        if scope_grants(self.claims.scope.as_deref(), scope) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = token::bearer_token(&parts.headers).map_err(|_| StatusCode::UNAUTHORIZED)?;
        let claims = token::verify(&app_state, token).await.map_err(|e| {
            tracing::debug!(error = %e, "token verification failed");
            StatusCode::UNAUTHORIZED
        })?;
        Ok(Self { claims })
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("token lacks the {SCOPE_CREATE_ORDERS} permission")]
    Forbidden,
    #[error("order contains no items")]
    EmptyOrder,
    #[error(transparent)]
    Recording(#[from] ProfileError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::EmptyOrder => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Recording(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Forbidden => "insufficient_scope",
            Self::EmptyOrder => "empty_order",
            Self::Recording(_) => "recording_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody { error: self.tag().to_owned(), message: self.to_string() };
        (self.status(), Json(body)).into_response()
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/orders` — accept a cart, record it against the caller's
/// profile, and return the receipt.
pub async fn place_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(items): Json<Vec<CartItem>>,
) -> Result<Json<OrderReceipt>, ApiError> {
    auth.require_scope(SCOPE_CREATE_ORDERS)?;
    if items.is_empty() {
        return Err(ApiError::EmptyOrder);
    }

    let record = OrderRecord::new(items, now_ms());

    if state.config.management.is_some() {
        profile::record_order(&state, &auth.claims.sub, &record).await?;
    } else {
        tracing::warn!(sub = %auth.claims.sub, "management API not configured; order accepted but not recorded");
    }

    tracing::info!(order_id = %record.order_id, items = record.items.len(), "order placed");
    Ok(Json(OrderReceipt::for_order(&record)))
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(i64::MAX)
}
