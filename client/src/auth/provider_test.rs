use futures::executor::block_on;
use orders::AuthSettings;

use super::*;
use crate::auth::identity::{IdentityClient, IdentityError};
use crate::util::storage::test_helpers::MemoryStore;

fn settings() -> AuthSettings {
    AuthSettings {
        domain: "tenant.example.com".to_owned(),
        client_id: "client123".to_owned(),
        audience: "https://pizza42.example.com/api".to_owned(),
    }
}

fn client() -> ProviderClient<MemoryStore> {
    ProviderClient::new(settings(), MemoryStore::new())
}

fn live_token(now: i64) -> StoredToken {
    StoredToken { access_token: "tok".to_owned(), expires_at: now + 3_600_000 }
}

// =============================================================================
// PKCE
// =============================================================================

#[test]
fn pkce_challenge_matches_rfc7636_vector() {
    assert_eq!(
        pkce_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn random_tokens_are_long_and_distinct() {
    let a = random_token();
    let b = random_token();
    assert_eq!(a.len(), 64);
    assert_ne!(a, b);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

// =============================================================================
// URL building and parsing
// =============================================================================

#[test]
fn encode_query_component_escapes_reserved_characters() {
    assert_eq!(encode_query_component("a b&c"), "a%20b%26c");
    assert_eq!(encode_query_component("https://x/y"), "https%3A%2F%2Fx%2Fy");
    assert_eq!(encode_query_component("safe-._~"), "safe-._~");
}

#[test]
fn authorize_url_carries_the_full_grant_request() {
    let tx = LoginTransaction {
        state: "st4te".to_owned(),
        code_verifier: "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_owned(),
        target_path: None,
    };
    let url = authorize_url(&settings(), &tx, false, "https://app.example.com");
    assert!(url.starts_with("https://tenant.example.com/authorize?response_type=code"));
    assert!(url.contains("client_id=client123"));
    assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example.com"));
    assert!(url.contains("scope=openid%20profile%20email%20create%3Aorders"));
    assert!(url.contains("state=st4te"));
    assert!(url.contains("code_challenge=E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"));
    assert!(url.contains("code_challenge_method=S256"));
    assert!(!url.contains("screen_hint"));
}

#[test]
fn authorize_url_signup_adds_screen_hint() {
    let tx = LoginTransaction { state: "s".to_owned(), code_verifier: "v".to_owned(), target_path: None };
    let url = authorize_url(&settings(), &tx, true, "https://app.example.com");
    assert!(url.ends_with("&screen_hint=signup"));
}

#[test]
fn logout_url_returns_to_origin() {
    let url = logout_url(&settings(), "https://app.example.com");
    assert_eq!(
        url,
        "https://tenant.example.com/v2/logout?client_id=client123&returnTo=https%3A%2F%2Fapp.example.com"
    );
}

#[test]
fn parse_callback_query_accepts_both_artifacts() {
    let params = parse_callback_query("?code=abc&state=xyz").expect("params");
    assert_eq!(params.code, "abc");
    assert_eq!(params.state, "xyz");
    // Leading '?' is optional; extra pairs are ignored.
    assert!(parse_callback_query("state=xyz&foo=1&code=abc").is_some());
}

#[test]
fn parse_callback_query_rejects_partial_artifacts() {
    assert!(parse_callback_query("?code=abc").is_none());
    assert!(parse_callback_query("?state=xyz").is_none());
    assert!(parse_callback_query("?code=&state=xyz").is_none());
    assert!(parse_callback_query("").is_none());
}

// =============================================================================
// Token lifetime
// =============================================================================

#[test]
fn token_is_live_within_expiry() {
    assert!(token_is_live(&live_token(1_000_000), 1_000_000));
}

#[test]
fn token_is_dead_at_and_past_expiry() {
    let token = StoredToken { access_token: "tok".to_owned(), expires_at: 1_000_000 };
    assert!(!token_is_live(&token, 1_000_000));
    assert!(!token_is_live(&token, 2_000_000));
}

#[test]
fn token_near_expiry_is_treated_as_dead() {
    let token = StoredToken { access_token: "tok".to_owned(), expires_at: 1_000_000 };
    // Inside the 30s leeway window.
    assert!(!token_is_live(&token, 1_000_000 - 10_000));
}

#[test]
fn empty_token_is_never_live() {
    let token = StoredToken { access_token: String::new(), expires_at: i64::MAX };
    assert!(!token_is_live(&token, 0));
}

#[test]
fn expires_at_converts_seconds_to_absolute_ms() {
    assert_eq!(expires_at(1_000, 86_400), 1_000 + 86_400_000);
}

// =============================================================================
// Session checks over stored state
// =============================================================================

#[test]
fn is_authenticated_false_with_empty_store() {
    assert!(!block_on(client().is_authenticated()).expect("check"));
}

#[test]
fn is_authenticated_true_with_live_stored_token() {
    let store = MemoryStore::new();
    let client = ProviderClient::new(settings(), &store);
    let token = StoredToken { access_token: "tok".to_owned(), expires_at: i64::MAX };
    crate::util::storage::save_json(&store, TOKEN_KEY, &token);
    assert!(block_on(client.is_authenticated()).expect("check"));
    assert_eq!(block_on(client.get_token_silently()).expect("token"), "tok");
}

#[test]
fn get_token_silently_rejects_expired_token() {
    let store = MemoryStore::new();
    let client = ProviderClient::new(settings(), &store);
    let stale = StoredToken { access_token: "tok".to_owned(), expires_at: 1 };
    crate::util::storage::save_json(&store, TOKEN_KEY, &stale);
    assert!(block_on(client.get_token_silently()).is_err());
}

#[test]
fn logout_discards_the_stored_token() {
    let store = MemoryStore::new();
    let client = ProviderClient::new(settings(), &store);
    let token = StoredToken { access_token: "tok".to_owned(), expires_at: i64::MAX };
    crate::util::storage::save_json(&store, TOKEN_KEY, &token);

    block_on(client.logout()).expect("logout");
    assert!(!block_on(client.is_authenticated()).expect("check"));
    assert_eq!(store.get(TOKEN_KEY), None);
}

// =============================================================================
// Login transactions
// =============================================================================

#[test]
fn begin_transaction_persists_state_and_verifier() {
    let client = client();
    let tx = client.begin_transaction(Some("/profile".to_owned()));
    assert_eq!(tx.target_path.as_deref(), Some("/profile"));
    let taken = client.take_transaction(&tx.state).expect("transaction");
    assert_eq!(taken, tx);
}

#[test]
fn take_transaction_consumes_exactly_once() {
    let client = client();
    let tx = client.begin_transaction(None);
    assert!(client.take_transaction(&tx.state).is_ok());
    assert!(client.take_transaction(&tx.state).is_err());
}

#[test]
fn take_transaction_rejects_mismatched_state() {
    let client = client();
    let _ = client.begin_transaction(None);
    assert!(matches!(client.take_transaction("forged"), Err(IdentityError::BadTransaction)));
    // A mismatch still burns the stored transaction.
    assert!(client.take_transaction("anything").is_err());
}
