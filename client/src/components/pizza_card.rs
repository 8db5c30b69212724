//! One menu entry with its order button.
//!
//! Ordering requires a signed-in session; anonymous clicks get the login
//! prompt instead of a cart mutation, matching the gate-before-mutate rule
//! the order API enforces server-side.

use leptos::prelude::*;
use orders::CartItem;

use crate::app::HandleSlot;
use crate::components::notice::Notice;
use crate::state::cart::CartStore;
use crate::state::menu::Pizza;
use crate::util::storage::BrowserLocalStore;

#[component]
pub fn PizzaCard(pizza: Pizza) -> impl IntoView {
    let cart_items = expect_context::<RwSignal<Vec<CartItem>>>();
    let cart_open = expect_context::<RwSignal<bool>>();
    let notice = expect_context::<RwSignal<Option<Notice>>>();
    let handles = expect_context::<HandleSlot>();

    let on_order = move |_| {
        let Some(handles) = handles.get_value() else {
            return;
        };
        let item = pizza.to_cart_item();
        #[cfg(feature = "csr")]
        wasm_bindgen_futures::spawn_local(async move {
            if handles.gate.is_authenticated().await {
                let items = CartStore::new(BrowserLocalStore).add(item);
                cart_items.set(items);
                cart_open.set(true);
            } else {
                notice.set(Some(Notice::login_prompt()));
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = (handles, item);
    };

    view! {
        <div class="pizza-item" data-pizza-id=pizza.id>
            <h3 class="pizza-title">{pizza.title}</h3>
            <p class="pizza-description">{pizza.description}</p>
            <div class="pizza-footer">
                <span class="price">{pizza.price}</span>
                <button class="order-button btn btn-warning" on:click=on_order>
                    "Add to order"
                </button>
            </div>
        </div>
    }
}
