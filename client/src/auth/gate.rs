//! Session gate: the guarded-execution primitive in front of protected views.
//!
//! ERROR HANDLING
//! ==============
//! Every identity failure is fail-closed: a check that errors answers "not
//! authenticated", gets logged, and never propagates. Authentication problems
//! must never crash the UI.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::rc::Rc;

use crate::auth::identity::{IdentityClient, LoginOptions};

/// Owns the asynchronous question "is the current visitor authenticated?".
#[derive(Clone)]
pub struct SessionGate {
    identity: Rc<dyn IdentityClient>,
}

impl SessionGate {
    #[must_use]
    pub fn new(identity: Rc<dyn IdentityClient>) -> Self {
        Self { identity }
    }

    /// The underlying identity client, for callers that need tokens or the
    /// user record.
    #[must_use]
    pub fn identity(&self) -> Rc<dyn IdentityClient> {
        self.identity.clone()
    }

    /// Fresh asynchronous session check. Never errors: any internal failure
    /// resolves to `false`.
    pub async fn is_authenticated(&self) -> bool {
        match self.identity.is_authenticated().await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                log::warn!("identity check failed, treating as signed out: {e}");
                false
            }
        }
    }

    /// Run `action` if the session is live; otherwise start the login flow
    /// with `target_path` recorded for the post-login return and run nothing.
    ///
    /// The login flow ends with the browser leaving the page, so code after
    /// an unauthenticated `require_auth` only runs in the window before the
    /// redirect takes effect.
    pub async fn require_auth<T>(&self, action: impl FnOnce() -> T, target_path: &str) -> Option<T> {
        if self.is_authenticated().await {
            return Some(action());
        }

        let options = LoginOptions { target_path: Some(target_path.to_owned()), ..LoginOptions::default() };
        if let Err(e) = self.identity.login_with_redirect(options).await {
            log::warn!("login redirect failed: {e}");
        }
        None
    }

    /// Complete the return leg of the login round-trip: consume the
    /// authorization artifacts in the URL and hand back the pending
    /// navigation target, if one was recorded.
    ///
    /// Malformed or expired artifacts are logged and yield `None`; the
    /// caller falls through to the default view.
    pub async fn complete_login_redirect(&self) -> Option<String> {
        match self.identity.handle_redirect_callback().await {
            Ok(outcome) => outcome.target_path,
            Err(e) => {
                log::warn!("redirect callback not completed: {e}");
                None
            }
        }
    }
}
