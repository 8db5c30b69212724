//! App-wide notification overlay.
//!
//! The demo's only error surface: order failures, login prompts, and
//! verification nags all land here. A notice may carry a login affordance,
//! which routes through `/login` when clicked.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use leptos::prelude::*;

use crate::app::HandleSlot;
use crate::net::api::OrderApiError;

/// One notification to show the visitor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    /// Offer a "log in again" action as the remedy.
    pub offer_login: bool,
}

impl Notice {
    #[must_use]
    pub fn info(title: &str, body: &str) -> Self {
        Self { title: title.to_owned(), body: body.to_owned(), offer_login: false }
    }

    /// Prompt shown when an anonymous visitor tries to order.
    #[must_use]
    pub fn login_prompt() -> Self {
        Self {
            title: "Log in or sign up to order".to_owned(),
            body: "Your cart is kept on this device; sign in to place the order.".to_owned(),
            offer_login: true,
        }
    }

    /// Map an order-submission failure onto a notice.
    #[must_use]
    pub fn from_order_error(err: &OrderApiError) -> Self {
        Self { title: "Sorry!".to_owned(), body: err.to_string(), offer_login: err.wants_relogin() }
    }
}

/// Renders the active notice, if any.
#[component]
pub fn NoticeHost() -> impl IntoView {
    let notice = expect_context::<RwSignal<Option<Notice>>>();
    let handles = expect_context::<HandleSlot>();

    let on_dismiss = move |_| notice.set(None);
    let on_login = move |_| {
        notice.set(None);
        if let Some(handles) = handles.get_value() {
            handles.router.navigate("/login");
        }
    };

    view! {
        <Show when=move || notice.get().is_some()>
            <div class="notice-overlay">
                <div class="notice-card">
                    <h2 class="notice-title">{move || notice.get().map(|n| n.title).unwrap_or_default()}</h2>
                    <p class="notice-body">{move || notice.get().map(|n| n.body).unwrap_or_default()}</p>
                    <div class="notice-actions">
                        <Show when=move || notice.get().is_some_and(|n| n.offer_login)>
                            <button class="btn btn-warning" on:click=on_login>"Log in again"</button>
                        </Show>
                        <button class="btn" on:click=on_dismiss>"Okay"</button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
