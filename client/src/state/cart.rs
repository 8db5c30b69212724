//! Cart persistence over browser local storage.
//!
//! DESIGN
//! ======
//! The cart is a plain JSON array under the `cart` key, matching the document
//! the backend accepts verbatim. All reads decode defensively: a corrupt or
//! missing entry degrades to an empty cart, never an error.

#[cfg(test)]
#[path = "cart_test.rs"]
mod cart_test;

use orders::CartItem;

use crate::util::storage::{KeyValueStore, load_json, save_json};

/// Storage key holding the JSON-encoded cart array.
pub const CART_KEY: &str = "cart";

/// Cart operations bound to a key-value store.
#[derive(Debug)]
pub struct CartStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current cart contents. Missing or undecodable state yields an empty
    /// cart.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        load_json(&self.store, CART_KEY).unwrap_or_default()
    }

    /// Number of items currently in the cart.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items().len()
    }

    /// Append `item` and persist, returning the updated contents.
    pub fn add(&self, item: CartItem) -> Vec<CartItem> {
        let mut items = self.items();
        items.push(item);
        save_json(&self.store, CART_KEY, &items);
        items
    }

    /// Reset the cart to empty.
    pub fn clear(&self) {
        save_json(&self.store, CART_KEY, &Vec::<CartItem>::new());
    }
}
