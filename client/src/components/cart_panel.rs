//! Cart overlay: review items, clear, or place the order.

use leptos::prelude::*;
use orders::CartItem;

use crate::app::HandleSlot;
use crate::components::notice::Notice;
use crate::state::cart::CartStore;
use crate::util::storage::BrowserLocalStore;

#[component]
pub fn CartPanel() -> impl IntoView {
    let cart_items = expect_context::<RwSignal<Vec<CartItem>>>();
    let cart_open = expect_context::<RwSignal<bool>>();
    let notice = expect_context::<RwSignal<Option<Notice>>>();
    let handles = expect_context::<HandleSlot>();
    let busy = RwSignal::new(false);

    let on_close = move |_| cart_open.set(false);

    let on_clear = move |_| {
        CartStore::new(BrowserLocalStore).clear();
        cart_items.set(Vec::new());
    };

    let on_place_order = move |_| {
        if busy.get() {
            return;
        }
        let Some(handles) = handles.get_value() else {
            return;
        };
        let items = cart_items.get_untracked();
        if items.is_empty() {
            notice.set(Some(Notice::info("Cart is empty", "Add a pizza first.")));
            return;
        }
        busy.set(true);
        #[cfg(feature = "csr")]
        wasm_bindgen_futures::spawn_local(async move {
            let identity = handles.gate.identity();
            match crate::net::api::place_order(&*identity, &items).await {
                Ok(receipt) => {
                    CartStore::new(BrowserLocalStore).clear();
                    cart_items.set(Vec::new());
                    cart_open.set(false);
                    notice.set(Some(Notice::info("Order placed", &receipt.message)));
                }
                Err(e) => {
                    log::warn!("order submission failed: {e}");
                    notice.set(Some(Notice::from_order_error(&e)));
                }
            }
            busy.set(false);
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (handles, items);
            busy.set(false);
        }
    };

    view! {
        <Show when=move || cart_open.get()>
            <div class="cart-overlay">
                <div class="cart-card">
                    <h2 class="cart-title">"Cart"</h2>
                    <Show
                        when=move || !cart_items.get().is_empty()
                        fallback=|| view! { <p class="cart-empty">"Your cart is empty"</p> }
                    >
                        <ul class="cart-lines">
                            <For
                                each=move || cart_items.get().into_iter().enumerate()
                                key=|(i, _)| *i
                                children=|(_, item)| {
                                    view! {
                                        <li class="cart-line">
                                            <span class="cart-line-title">{item.title.clone()}</span>
                                            <span class="cart-line-price">{item.price.clone()}</span>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>
                    <div class="cart-actions">
                        <button
                            class="btn btn-warning cart-action-btn"
                            disabled=move || busy.get()
                            on:click=on_place_order
                        >
                            "Place Order"
                        </button>
                        <button class="btn cart-action-btn" on:click=on_clear>"Clear cart"</button>
                        <button class="btn cart-action-btn" on:click=on_close>"Close"</button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
