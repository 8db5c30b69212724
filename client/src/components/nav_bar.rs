//! Top navigation bar: route links, cart button, session controls.

use leptos::prelude::*;
use orders::CartItem;

use crate::app::HandleSlot;
use crate::state::session::SessionState;

#[component]
pub fn NavBar() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let cart_items = expect_context::<RwSignal<Vec<CartItem>>>();
    let cart_open = expect_context::<RwSignal<bool>>();
    let handles = expect_context::<HandleSlot>();

    let on_logout = move |_| {
        let Some(handles) = handles.get_value() else {
            return;
        };
        #[cfg(feature = "csr")]
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = handles.gate.identity().logout().await {
                log::warn!("logout failed: {e}");
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = handles;
    };

    view! {
        <nav class="nav-bar">
            <a href="/" class="route-link nav-brand">"Pizza 42"</a>
            <div class="nav-links">
                <a href="/" class="route-link">"Menu"</a>
                <a
                    href="/profile"
                    class="route-link"
                    class:hidden=move || !session.get().signed_in()
                >
                    "Profile"
                </a>
            </div>
            <div class="nav-session">
                <button class="nav-cart" on:click=move |_| cart_open.set(true)>
                    "Cart (" {move || cart_items.get().len()} ")"
                </button>
                <Show
                    when=move || session.get().signed_in()
                    fallback=|| {
                        view! {
                            <a href="/login" class="route-link btn btn-warning nav-login">"Log in"</a>
                        }
                    }
                >
                    <span class="nav-user">
                        {move || session.get().user.map(|u| u.name).unwrap_or_default()}
                    </span>
                    <button class="nav-logout" on:click=on_logout>"Log out"</button>
                </Show>
            </div>
        </nav>
    }
}
