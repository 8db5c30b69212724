//! # client
//!
//! Leptos + WASM frontend for the pizza ordering demo: menu browsing, a cart
//! persisted to browser local storage, redirect-based login against the
//! hosted identity provider, and a session-gated view router that keeps the
//! address bar and history consistent with the visible view.

pub mod app;
pub mod auth;
pub mod components;
pub mod nav;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
