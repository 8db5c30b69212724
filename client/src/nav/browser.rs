//! Browser bindings for the navigation controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the History API and the document-level listeners: pushing/replacing
//! `NavigationState` entries, replaying them on popstate, and intercepting
//! clicks on `a.route-link` anchors so matched paths route in-page instead of
//! reloading.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::nav::router::{NavHost, NavigationState, Router};

/// Path portion of the current location.
#[must_use]
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_owned())
}

/// Query-string portion of the current location (with leading `?`, possibly
/// empty).
#[must_use]
pub fn current_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

fn state_value(path: &str) -> wasm_bindgen::JsValue {
    serde_json::to_string(&NavigationState::new(path))
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(wasm_bindgen::JsValue::NULL)
}

/// Push a history entry for `path` without a page load.
pub fn push_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&state_value(path), "", Some(path));
    }
}

/// Replace the current history entry with one for `path`.
pub fn replace_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.replace_state_with_url(&state_value(path), "", Some(path));
    }
}

fn decode_state(value: &wasm_bindgen::JsValue) -> Option<NavigationState> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let json = js_sys::JSON::stringify(value).ok()?;
    serde_json::from_str(&String::from(json)).ok()
}

/// Replay history entries on back/forward.
pub fn install_popstate<H: NavHost + 'static>(router: Rc<Router<H>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |event: web_sys::PopStateEvent| {
        let state = decode_state(&event.state());
        router.on_history_pop(state.as_ref());
    });
    let _ = window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
    // The listener lives for the page lifetime.
    closure.forget();
}

/// Intercept clicks on in-page route links. Unmatched hrefs fall through to
/// normal browser navigation.
pub fn install_link_interception<H: NavHost + 'static>(router: Rc<Router<H>>) {
    let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |event: web_sys::MouseEvent| {
        let Some(target) = event.target() else {
            return;
        };
        let Ok(element) = target.dyn_into::<web_sys::Element>() else {
            return;
        };
        let Ok(Some(anchor)) = element.closest("a.route-link") else {
            return;
        };
        let Some(href) = anchor.get_attribute("href") else {
            return;
        };
        if router.intercept_link(&href) {
            event.prevent_default();
        }
    });
    let _ = body.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
