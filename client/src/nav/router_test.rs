use std::cell::RefCell;
use std::rc::Rc;

use super::*;

// =============================================================================
// Recording host
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum HostEvent {
    Activated(ViewId),
    Guarded(ViewId, String),
    Login,
    Pushed(String),
    Replaced(String),
}

#[derive(Clone, Default)]
struct RecordingHost {
    events: Rc<RefCell<Vec<HostEvent>>>,
    active: Rc<RefCell<Option<ViewId>>>,
}

impl RecordingHost {
    fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    fn active(&self) -> Option<ViewId> {
        *self.active.borrow()
    }
}

impl NavHost for RecordingHost {
    fn activate_view(&self, view: ViewId) {
        *self.active.borrow_mut() = Some(view);
        self.events.borrow_mut().push(HostEvent::Activated(view));
    }

    fn guard(&self, view: ViewId, target: &str) {
        self.events.borrow_mut().push(HostEvent::Guarded(view, target.to_owned()));
    }

    fn begin_login(&self) {
        self.events.borrow_mut().push(HostEvent::Login);
    }

    fn push_history(&self, path: &str) {
        self.events.borrow_mut().push(HostEvent::Pushed(path.to_owned()));
    }

    fn replace_history(&self, path: &str) {
        self.events.borrow_mut().push(HostEvent::Replaced(path.to_owned()));
    }
}

fn router() -> Router<RecordingHost> {
    Router::new(RouteTable::standard(), RecordingHost::default())
}

// =============================================================================
// Route table resolution
// =============================================================================

#[test]
fn resolve_root_activates_home() {
    let table = RouteTable::standard();
    assert_eq!(table.resolve("/"), NavOutcome::Activate(ViewId::Home));
}

#[test]
fn resolve_profile_is_guarded_with_target() {
    let table = RouteTable::standard();
    assert_eq!(
        table.resolve("/profile"),
        NavOutcome::Guard { view: ViewId::Profile, target: "/profile".to_owned() }
    );
}

#[test]
fn resolve_login_begins_login() {
    let table = RouteTable::standard();
    assert_eq!(table.resolve("/login"), NavOutcome::Login);
}

#[test]
fn resolve_unknown_path_misses() {
    let table = RouteTable::standard();
    assert_eq!(table.resolve("/unknown-deep-link"), NavOutcome::Miss);
    assert_eq!(table.resolve(""), NavOutcome::Miss);
    assert_eq!(table.resolve("/profile/extra"), NavOutcome::Miss);
}

#[test]
fn replay_of_missing_state_misses() {
    let table = RouteTable::standard();
    assert_eq!(table.replay(None), NavOutcome::Miss);
}

#[test]
fn replay_of_removed_route_misses() {
    let table = RouteTable::new(vec![Route {
        path: "/",
        action: RouteAction::Activate { view: ViewId::Home, requires_auth: false },
    }]);
    let stale = NavigationState::new("/profile");
    assert_eq!(table.replay(Some(&stale)), NavOutcome::Miss);
}

// =============================================================================
// dispatch
// =============================================================================

#[test]
fn dispatch_unknown_path_returns_false_and_leaves_view_unchanged() {
    let router = router();
    router.dispatch("/");
    assert!(!router.dispatch("/nope"));
    assert_eq!(router.host().active(), Some(ViewId::Home));
}

#[test]
fn dispatch_known_path_returns_true_with_one_view_active() {
    let router = router();
    assert!(router.dispatch("/"));
    assert_eq!(router.host().active(), Some(ViewId::Home));
}

#[test]
fn dispatch_guarded_path_defers_to_gate() {
    let router = router();
    assert!(router.dispatch("/profile"));
    assert_eq!(router.host().events(), vec![HostEvent::Guarded(ViewId::Profile, "/profile".to_owned())]);
    // The view itself is not activated until the gate answers.
    assert_eq!(router.host().active(), None);
}

#[test]
fn dispatch_login_route_starts_login_flow() {
    let router = router();
    assert!(router.dispatch("/login"));
    assert_eq!(router.host().events(), vec![HostEvent::Login]);
}

#[test]
fn activate_view_is_idempotent() {
    let router = router();
    router.dispatch("/");
    router.dispatch("/");
    assert_eq!(router.host().active(), Some(ViewId::Home));
}

// =============================================================================
// navigate and history
// =============================================================================

#[test]
fn navigate_pushes_history_only_on_match() {
    let router = router();
    assert!(router.navigate("/"));
    assert!(!router.navigate("/nope"));
    assert_eq!(
        router.host().events(),
        vec![HostEvent::Activated(ViewId::Home), HostEvent::Pushed("/".to_owned())]
    );
}

#[test]
fn history_pop_redispatches_live_route() {
    let router = router();
    let state = NavigationState::new("/");
    router.on_history_pop(Some(&state));
    assert_eq!(router.host().active(), Some(ViewId::Home));
    // Replays never write history.
    assert!(!router.host().events().iter().any(|e| matches!(e, HostEvent::Pushed(_) | HostEvent::Replaced(_))));
}

#[test]
fn history_pop_without_state_is_a_no_op() {
    let router = router();
    router.on_history_pop(None);
    assert!(router.host().events().is_empty());
}

// =============================================================================
// startup
// =============================================================================

#[test]
fn startup_with_known_path_dispatches_it() {
    let router = router();
    router.startup("/");
    assert_eq!(router.host().events(), vec![HostEvent::Activated(ViewId::Home)]);
}

#[test]
fn startup_with_unknown_deep_link_falls_back_to_root_and_rewrites_history() {
    let router = router();
    router.startup("/unknown-deep-link");
    assert_eq!(
        router.host().events(),
        vec![HostEvent::Activated(ViewId::Home), HostEvent::Replaced("/".to_owned())]
    );
    assert_eq!(router.host().active(), Some(ViewId::Home));
}

// =============================================================================
// link interception
// =============================================================================

#[test]
fn intercept_link_handles_known_routes() {
    let router = router();
    assert!(router.intercept_link("/profile"));
    assert_eq!(
        router.host().events(),
        vec![
            HostEvent::Guarded(ViewId::Profile, "/profile".to_owned()),
            HostEvent::Pushed("/profile".to_owned()),
        ]
    );
}

#[test]
fn intercept_link_falls_through_for_external_paths() {
    let router = router();
    assert!(!router.intercept_link("/docs/external"));
    assert!(router.host().events().is_empty());
}

// =============================================================================
// navigation state serde
// =============================================================================

#[test]
fn navigation_state_round_trips_as_json() {
    let state = NavigationState::new("/profile");
    let json = serde_json::to_string(&state).expect("serialize");
    let restored: NavigationState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, state);
}
