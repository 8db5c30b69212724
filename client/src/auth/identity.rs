//! Narrow interface over the hosted identity provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! Token issuance and user-data persistence are delegated entirely to the
//! provider; the app only ever talks to it through this trait. The session
//! gate and the order API are written against the trait so tests substitute
//! a scripted fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity record the provider reports for the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Options for starting the login flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginOptions {
    /// Path to return to after the round-trip, consumed exactly once.
    pub target_path: Option<String>,
    /// Ask the provider to open its signup screen instead of login.
    pub signup: bool,
}

/// What a completed redirect callback carried.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedirectOutcome {
    /// The pending navigation target recorded when login started, if any.
    pub target_path: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("no active session")]
    NotAuthenticated,
    #[error("login transaction missing or mismatched")]
    BadTransaction,
    #[error("redirect callback carries no authorization artifacts")]
    NoCallbackArtifacts,
    #[error("identity provider request failed: {0}")]
    Provider(String),
    #[error("browser API unavailable: {0}")]
    Browser(&'static str),
}

/// Asynchronous identity-provider client surface.
///
/// All methods are network- or storage-backed and may fail; callers that
/// cannot tolerate failure must fail closed themselves.
#[async_trait(?Send)]
pub trait IdentityClient {
    /// Whether the visitor currently holds a live session.
    async fn is_authenticated(&self) -> Result<bool, IdentityError>;

    /// Fetch the signed-in user's identity record. Fresh per call.
    async fn get_user(&self) -> Result<UserProfile, IdentityError>;

    /// An access token for the configured audience, if a live session exists.
    async fn get_token_silently(&self) -> Result<String, IdentityError>;

    /// Start the redirect login flow. On success the browser leaves the page.
    async fn login_with_redirect(&self, options: LoginOptions) -> Result<(), IdentityError>;

    /// Drop the session and send the browser through the provider's logout.
    async fn logout(&self) -> Result<(), IdentityError>;

    /// Consume the authorization artifacts in the current URL after the
    /// provider redirected back, leaving the visible URL clean.
    async fn handle_redirect_callback(&self) -> Result<RedirectOutcome, IdentityError>;
}
