//! Static pizza menu.
//!
//! Catalog management is out of scope; the menu is the same fixed set the
//! demo has always shipped with.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use orders::CartItem;

/// One orderable pizza.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pizza {
    pub id: &'static str,
    pub title: &'static str,
    pub price: &'static str,
    pub description: &'static str,
}

impl Pizza {
    /// Convert to the wire shape the order API accepts.
    #[must_use]
    pub fn to_cart_item(&self) -> CartItem {
        CartItem { pizza_id: self.id.to_owned(), title: self.title.to_owned(), price: self.price.to_owned() }
    }
}

/// The fixed menu shown on the home view.
pub const MENU: &[Pizza] = &[
    Pizza { id: "1", title: "Margherita", price: "$10", description: "Tomato, mozzarella, basil" },
    Pizza { id: "2", title: "Pepperoni", price: "$12", description: "Pepperoni, mozzarella, oregano" },
    Pizza { id: "3", title: "Hawaiian", price: "$12", description: "Ham, pineapple, mozzarella" },
    Pizza { id: "4", title: "Quattro Formaggi", price: "$14", description: "Four cheeses, no arguments" },
    Pizza { id: "5", title: "Diavola", price: "$13", description: "Spicy salami, chili, mozzarella" },
    Pizza { id: "6", title: "Funghi", price: "$11", description: "Mushrooms, garlic, mozzarella" },
];
