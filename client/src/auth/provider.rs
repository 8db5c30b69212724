//! Production identity client: authorization-code + PKCE against the hosted
//! provider.
//!
//! ARCHITECTURE
//! ============
//! The login round-trip leaves the page, so everything the return leg needs
//! (CSRF state, PKCE verifier, the pending navigation target) is persisted as
//! a login transaction in session storage and consumed exactly once on
//! callback. The access token is held in session storage alongside its
//! expiry; every session check re-reads and re-judges it, so there is no
//! separate truth cache to go stale.
//!
//! URL construction, query parsing, and expiry judgment are pure functions;
//! the browser-only pieces (redirects, token exchange, userinfo) are gated on
//! the `csr` feature.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use orders::{AuthSettings, DEFAULT_SCOPE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::identity::{IdentityClient, IdentityError, LoginOptions, RedirectOutcome, UserProfile};
use crate::util::storage::{KeyValueStore, load_json, save_json};

/// Session-storage key for the access token.
pub const TOKEN_KEY: &str = "pizza42.session";
/// Session-storage key for the in-flight login transaction.
pub const TX_KEY: &str = "pizza42.login_tx";

/// Tokens this close to expiry are treated as dead.
const EXPIRY_LEEWAY_MS: i64 = 30_000;

/// Access token plus its absolute expiry, as persisted between checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    /// Milliseconds since the Unix epoch.
    pub expires_at: i64,
}

/// Everything the callback leg needs to finish a login round-trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginTransaction {
    pub state: String,
    pub code_verifier: String,
    pub target_path: Option<String>,
}

/// Authorization artifacts found in the callback URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

#[cfg(feature = "csr")]
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds.
    expires_in: i64,
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Random URL-safe token for CSRF state and PKCE verifiers.
#[must_use]
pub fn random_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// S256 PKCE challenge for `verifier` (RFC 7636).
#[must_use]
pub fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Percent-encode a query-string component.
#[must_use]
pub fn encode_query_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
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

/// Provider authorization URL for a prepared login transaction.
#[must_use]
pub fn authorize_url(
    settings: &AuthSettings,
    tx: &LoginTransaction,
    signup: bool,
    redirect_uri: &str,
) -> String {
    let mut url = format!(
        "https://{}/authorize?response_type=code&client_id={}&redirect_uri={}&scope={}&audience={}&state={}&code_challenge={}&code_challenge_method=S256",
        settings.domain,
        encode_query_component(&settings.client_id),
        encode_query_component(redirect_uri),
        encode_query_component(DEFAULT_SCOPE),
        encode_query_component(&settings.audience),
        tx.state,
        pkce_challenge(&tx.code_verifier),
    );
    if signup {
        url.push_str("&screen_hint=signup");
    }
    url
}

/// Provider logout URL returning to `return_to`.
#[must_use]
pub fn logout_url(settings: &AuthSettings, return_to: &str) -> String {
    format!(
        "https://{}/v2/logout?client_id={}&returnTo={}",
        settings.domain,
        encode_query_component(&settings.client_id),
        encode_query_component(return_to),
    )
}

/// Extract `code` and `state` from a callback query string (with or without
/// the leading `?`). Returns `None` unless both are present and non-empty.
#[must_use]
pub fn parse_callback_query(query: &str) -> Option<CallbackParams> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut code = None;
    let mut state = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("code", v)) if !v.is_empty() => code = Some(v.to_owned()),
            Some(("state", v)) if !v.is_empty() => state = Some(v.to_owned()),
            _ => {}
        }
    }
    Some(CallbackParams { code: code?, state: state? })
}

/// Whether a stored token is still usable at `now_ms`.
#[must_use]
pub fn token_is_live(token: &StoredToken, now_ms: i64) -> bool {
    !token.access_token.is_empty() && token.expires_at - EXPIRY_LEEWAY_MS > now_ms
}

/// Absolute expiry for a token issued now with `expires_in` seconds of life.
#[must_use]
pub fn expires_at(now_ms: i64, expires_in_secs: i64) -> i64 {
    now_ms.saturating_add(expires_in_secs.saturating_mul(1000))
}

fn now_ms() -> i64 {
    #[cfg(feature = "csr")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(feature = "csr"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

// =============================================================================
// PROVIDER CLIENT
// =============================================================================

/// Identity client bound to a tenant and a browser storage area.
pub struct ProviderClient<S: KeyValueStore> {
    settings: AuthSettings,
    store: S,
}

impl<S: KeyValueStore> ProviderClient<S> {
    #[must_use]
    pub fn new(settings: AuthSettings, store: S) -> Self {
        Self { settings, store }
    }

    fn stored_token(&self) -> Option<StoredToken> {
        load_json(&self.store, TOKEN_KEY)
    }

    /// Create and persist a login transaction for a redirect about to start.
    pub fn begin_transaction(&self, target_path: Option<String>) -> LoginTransaction {
        let tx = LoginTransaction {
            state: random_token(),
            code_verifier: random_token(),
            target_path,
        };
        save_json(&self.store, TX_KEY, &tx);
        tx
    }

    /// Consume the stored transaction, validating the returned CSRF state.
    /// The transaction is removed regardless of the verdict so artifacts are
    /// processed at most once.
    pub fn take_transaction(&self, returned_state: &str) -> Result<LoginTransaction, IdentityError> {
        let tx: Option<LoginTransaction> = load_json(&self.store, TX_KEY);
        self.store.remove(TX_KEY);
        match tx {
            Some(tx) if tx.state == returned_state => Ok(tx),
            _ => Err(IdentityError::BadTransaction),
        }
    }

    fn live_token(&self) -> Option<StoredToken> {
        self.stored_token().filter(|t| token_is_live(t, now_ms()))
    }
}

#[cfg(feature = "csr")]
fn browser_window() -> Result<web_sys::Window, IdentityError> {
    web_sys::window().ok_or(IdentityError::Browser("no window"))
}

#[cfg(feature = "csr")]
fn page_origin() -> Result<String, IdentityError> {
    browser_window()?
        .location()
        .origin()
        .map_err(|_| IdentityError::Browser("no origin"))
}

#[async_trait(?Send)]
impl<S: KeyValueStore> IdentityClient for ProviderClient<S> {
    async fn is_authenticated(&self) -> Result<bool, IdentityError> {
        Ok(self.live_token().is_some())
    }

    async fn get_user(&self) -> Result<UserProfile, IdentityError> {
        let token = self.get_token_silently().await?;
        #[cfg(feature = "csr")]
        {
            let url = format!("https://{}/userinfo", self.settings.domain);
            let resp = gloo_net::http::Request::get(&url)
                .header("Authorization", &format!("Bearer {token}"))
                .send()
                .await
                .map_err(|e| IdentityError::Provider(e.to_string()))?;
            if !resp.ok() {
                return Err(IdentityError::Provider(format!("userinfo failed: {}", resp.status())));
            }
            resp.json::<UserProfile>()
                .await
                .map_err(|e| IdentityError::Provider(e.to_string()))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
            Err(IdentityError::Browser("userinfo requires the browser"))
        }
    }

    async fn get_token_silently(&self) -> Result<String, IdentityError> {
        self.live_token()
            .map(|t| t.access_token)
            .ok_or(IdentityError::NotAuthenticated)
    }

    async fn login_with_redirect(&self, options: LoginOptions) -> Result<(), IdentityError> {
        #[cfg(feature = "csr")]
        {
            let origin = page_origin()?;
            let tx = self.begin_transaction(options.target_path);
            let url = authorize_url(&self.settings, &tx, options.signup, &origin);
            browser_window()?
                .location()
                .set_href(&url)
                .map_err(|_| IdentityError::Browser("redirect failed"))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = options;
            Err(IdentityError::Browser("login redirect requires the browser"))
        }
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        self.store.remove(TOKEN_KEY);
        #[cfg(feature = "csr")]
        {
            let origin = page_origin()?;
            browser_window()?
                .location()
                .set_href(&logout_url(&self.settings, &origin))
                .map_err(|_| IdentityError::Browser("redirect failed"))?;
        }
        Ok(())
    }

    async fn handle_redirect_callback(&self) -> Result<RedirectOutcome, IdentityError> {
        #[cfg(feature = "csr")]
        {
            let window = browser_window()?;
            let query = window
                .location()
                .search()
                .map_err(|_| IdentityError::Browser("no location"))?;
            let params = parse_callback_query(&query).ok_or(IdentityError::NoCallbackArtifacts)?;
            let tx = self.take_transaction(&params.state)?;

            let origin = page_origin()?;
            let body = serde_json::json!({
                "grant_type": "authorization_code",
                "client_id": self.settings.client_id,
                "code": params.code,
                "code_verifier": tx.code_verifier,
                "redirect_uri": origin,
            });
            let url = format!("https://{}/oauth/token", self.settings.domain);
            let resp = gloo_net::http::Request::post(&url)
                .json(&body)
                .map_err(|e| IdentityError::Provider(e.to_string()))?
                .send()
                .await
                .map_err(|e| IdentityError::Provider(e.to_string()))?;
            if !resp.ok() {
                return Err(IdentityError::Provider(format!("token exchange failed: {}", resp.status())));
            }
            let token: TokenResponse = resp
                .json()
                .await
                .map_err(|e| IdentityError::Provider(e.to_string()))?;

            save_json(
                &self.store,
                TOKEN_KEY,
                &StoredToken {
                    access_token: token.access_token,
                    expires_at: expires_at(now_ms(), token.expires_in),
                },
            );

            // Drop the code/state query so a reload cannot replay them.
            let pathname = window
                .location()
                .pathname()
                .unwrap_or_else(|_| "/".to_owned());
            if let Ok(history) = window.history() {
                let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&pathname));
            }

            Ok(RedirectOutcome { target_path: tx.target_path })
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(IdentityError::Browser("redirect callback requires the browser"))
        }
    }
}
