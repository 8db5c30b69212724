//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the nav bar and the profile view to coordinate identity-dependent
//! rendering: auth-only chrome stays hidden until the session question has
//! been answered.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::auth::identity::UserProfile;

/// Session state tracking the current user and loading status.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    /// True until the startup identity check has resolved.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

impl SessionState {
    /// Whether a signed-in user is known.
    #[must_use]
    pub fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the signed-in user has a verified email address.
    #[must_use]
    pub fn email_verified(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.email_verified)
    }
}
