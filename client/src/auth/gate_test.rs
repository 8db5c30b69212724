use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::executor::block_on;

use super::*;
use crate::auth::identity::{IdentityError, RedirectOutcome, UserProfile};
use crate::nav::router::{NavHost, RouteTable, Router, ViewId};

// =============================================================================
// Scripted identity fake
// =============================================================================

#[derive(Default)]
struct FakeIdentity {
    authenticated: bool,
    check_fails: bool,
    callback_outcome: Option<RedirectOutcome>,
    login_requests: RefCell<Vec<LoginOptions>>,
}

impl FakeIdentity {
    fn signed_in() -> Self {
        Self { authenticated: true, ..Self::default() }
    }

    fn signed_out() -> Self {
        Self::default()
    }

    fn broken() -> Self {
        Self { check_fails: true, ..Self::default() }
    }
}

#[async_trait(?Send)]
impl IdentityClient for FakeIdentity {
    async fn is_authenticated(&self) -> Result<bool, IdentityError> {
        if self.check_fails {
            return Err(IdentityError::Provider("boom".to_owned()));
        }
        Ok(self.authenticated)
    }

    async fn get_user(&self) -> Result<UserProfile, IdentityError> {
        Err(IdentityError::NotAuthenticated)
    }

    async fn get_token_silently(&self) -> Result<String, IdentityError> {
        Err(IdentityError::NotAuthenticated)
    }

    async fn login_with_redirect(&self, options: LoginOptions) -> Result<(), IdentityError> {
        self.login_requests.borrow_mut().push(options);
        Ok(())
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        Ok(())
    }

    async fn handle_redirect_callback(&self) -> Result<RedirectOutcome, IdentityError> {
        self.callback_outcome.clone().ok_or(IdentityError::NoCallbackArtifacts)
    }
}

fn gate(identity: FakeIdentity) -> (SessionGate, Rc<FakeIdentity>) {
    let identity = Rc::new(identity);
    (SessionGate::new(identity.clone()), identity)
}

// =============================================================================
// is_authenticated
// =============================================================================

#[test]
fn is_authenticated_reports_live_session() {
    let (gate, _) = gate(FakeIdentity::signed_in());
    assert!(block_on(gate.is_authenticated()));
}

#[test]
fn is_authenticated_fails_closed_on_error() {
    let (gate, _) = gate(FakeIdentity::broken());
    assert!(!block_on(gate.is_authenticated()));
}

// =============================================================================
// require_auth
// =============================================================================

#[test]
fn require_auth_runs_action_exactly_once_when_signed_in() {
    let (gate, identity) = gate(FakeIdentity::signed_in());
    let calls = RefCell::new(0);
    let result = block_on(gate.require_auth(
        || {
            *calls.borrow_mut() += 1;
            "shown"
        },
        "/profile",
    ));
    assert_eq!(result, Some("shown"));
    assert_eq!(*calls.borrow(), 1);
    assert!(identity.login_requests.borrow().is_empty());
}

#[test]
fn require_auth_defers_action_and_records_target_when_signed_out() {
    let (gate, identity) = gate(FakeIdentity::signed_out());
    let result = block_on(gate.require_auth(|| "shown", "/profile"));
    assert_eq!(result, None);
    let requests = identity.login_requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].target_path.as_deref(), Some("/profile"));
    assert!(!requests[0].signup);
}

#[test]
fn require_auth_treats_check_failure_as_signed_out() {
    let (gate, identity) = gate(FakeIdentity::broken());
    let result = block_on(gate.require_auth(|| "shown", "/profile"));
    assert_eq!(result, None);
    assert_eq!(identity.login_requests.borrow().len(), 1);
}

// =============================================================================
// complete_login_redirect
// =============================================================================

#[test]
fn complete_login_redirect_resolves_pending_target() {
    let (gate, _) = gate(FakeIdentity {
        authenticated: true,
        callback_outcome: Some(RedirectOutcome { target_path: Some("/profile".to_owned()) }),
        ..FakeIdentity::default()
    });
    assert_eq!(block_on(gate.complete_login_redirect()), Some("/profile".to_owned()));
}

#[test]
fn complete_login_redirect_without_target_is_none() {
    let (gate, _) = gate(FakeIdentity {
        authenticated: true,
        callback_outcome: Some(RedirectOutcome::default()),
        ..FakeIdentity::default()
    });
    assert_eq!(block_on(gate.complete_login_redirect()), None);
}

#[test]
fn complete_login_redirect_swallows_malformed_artifacts() {
    let (gate, _) = gate(FakeIdentity::signed_out());
    assert_eq!(block_on(gate.complete_login_redirect()), None);
}

// =============================================================================
// Callback-to-view restoration, end to end over a blocking host
// =============================================================================

struct BlockingHost {
    gate: SessionGate,
    active: Rc<RefCell<Option<ViewId>>>,
}

impl NavHost for BlockingHost {
    fn activate_view(&self, view: ViewId) {
        *self.active.borrow_mut() = Some(view);
    }

    fn guard(&self, view: ViewId, target: &str) {
        let active = self.active.clone();
        let _ = block_on(self.gate.require_auth(move || *active.borrow_mut() = Some(view), target));
    }

    fn begin_login(&self) {}

    fn push_history(&self, _path: &str) {}

    fn replace_history(&self, _path: &str) {}
}

#[test]
fn redirect_callback_with_target_restores_profile_view() {
    let (gate, _) = gate(FakeIdentity {
        authenticated: true,
        callback_outcome: Some(RedirectOutcome { target_path: Some("/profile".to_owned()) }),
        ..FakeIdentity::default()
    });
    let active = Rc::new(RefCell::new(None));
    let router = Router::new(
        RouteTable::standard(),
        BlockingHost { gate: gate.clone(), active: active.clone() },
    );

    let target = block_on(gate.complete_login_redirect()).expect("pending target");
    assert!(router.dispatch(&target));
    assert_eq!(*active.borrow(), Some(ViewId::Profile));
}
