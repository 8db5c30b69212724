//! Shared wire model for the pizza ordering demo.
//!
//! This crate owns the JSON shapes that cross the client/server boundary and
//! the boundary to the hosted identity provider: cart items, order records,
//! order receipts, and the auth configuration document the SPA consumes at
//! startup. Field names are camelCase on the wire (`pizzaId`, `clientId`)
//! because the original documents are consumed by browser code.


use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission a token must carry to submit an order.
pub const SCOPE_CREATE_ORDERS: &str = "create:orders";

/// Default scope requested during login.
pub const DEFAULT_SCOPE: &str = "openid profile email create:orders";

/// One menu item placed in the cart.
///
/// `price` is the display price shown in the menu (e.g. `"$10"`); the demo
/// performs no arithmetic on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Menu identifier of the pizza.
    pub pizza_id: String,
    /// Human-readable name.
    pub title: String,
    /// Display price as shown in the menu.
    pub price: String,
}

/// An accepted order as recorded against the user's profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Server-assigned order identifier.
    pub order_id: String,
    /// Items at the time the order was placed.
    pub items: Vec<CartItem>,
    /// Milliseconds since the Unix epoch when the server accepted the order.
    pub placed_at: i64,
}

impl OrderRecord {
    /// Build a new record with a fresh order id.
    #[must_use]
    pub fn new(items: Vec<CartItem>, placed_at: i64) -> Self {
        Self { order_id: Uuid::new_v4().to_string(), items, placed_at }
    }
}

/// Response body for a successfully placed order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Identifier of the recorded order.
    pub order_id: String,
    /// Number of items the order contained.
    pub item_count: usize,
    /// Human-readable confirmation.
    pub message: String,
}

impl OrderReceipt {
    /// Build the receipt for an accepted order.
    #[must_use]
    pub fn for_order(record: &OrderRecord) -> Self {
        Self {
            order_id: record.order_id.clone(),
            item_count: record.items.len(),
            message: "Order placed".to_owned(),
        }
    }
}

/// Identity-provider settings served at `GET /auth_config.json`.
///
/// Consumed once by the SPA at startup to construct its identity client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSettings {
    /// Provider tenant domain, e.g. `dev-xyz.us.auth0.com`.
    pub domain: String,
    /// OAuth client id of the SPA application.
    pub client_id: String,
    /// API audience the SPA requests tokens for.
    pub audience: String,
}

impl AuthSettings {
    /// Token issuer derived from the tenant domain.
    #[must_use]
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// JWKS document location for this tenant.
    #[must_use]
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }
}

/// Error body returned by the order API for non-2xx responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error tag, e.g. `"insufficient_scope"`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Check whether a space-separated OAuth `scope` claim grants `required`.
#[must_use]
pub fn scope_grants(scope: Option<&str>, required: &str) -> bool {
    scope
        .map(|s| s.split_whitespace().any(|granted| granted == required))
        .unwrap_or(false)
}
