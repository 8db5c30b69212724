//! Route/session-gated navigation controller.
//!
//! DESIGN
//! ======
//! Routes form a fixed table of tagged variants rather than closures, so the
//! controller's lookup, guarding, and history behavior stay uniform and
//! testable independent of what each view renders. Resolution is pure
//! (`RouteTable` -> `NavOutcome`); effects run through a `NavHost`, which in
//! the browser binds to the Leptos view signal, the session gate, and the
//! History API, and in tests to a recording fake.
//!
//! CONCURRENCY
//! ===========
//! Guarded dispatches suspend on an async identity check. A fast second
//! navigation may land before a slow first check resolves; that interleaving
//! is safe because view activation is idempotent and the superseded check's
//! result is simply applied to the same single active-view slot.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use serde::{Deserialize, Serialize};

/// Identifier of a content view. Exactly one view is visible at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewId {
    Home,
    Profile,
}

/// What a route does when dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAction {
    /// Show a view, optionally behind the session gate.
    Activate { view: ViewId, requires_auth: bool },
    /// Start the external login flow.
    BeginLogin,
}

/// Immutable pair of path and action. The route set is fixed at startup.
#[derive(Clone, Debug)]
pub struct Route {
    pub path: &'static str,
    pub action: RouteAction,
}

/// Payload attached to each browser-history entry, replayed on back/forward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub path: String,
}

impl NavigationState {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self { path: path.to_owned() }
    }
}

/// Result of resolving a path against the route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Activate the view directly.
    Activate(ViewId),
    /// Ask the session gate before activating; `target` is remembered across
    /// the login round-trip.
    Guard { view: ViewId, target: String },
    /// Start the login flow.
    Login,
    /// No route matched. Expected and silent.
    Miss,
}

/// Fixed path -> action mapping. Paths are unique keys.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table from a fixed route set.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if two routes share a path.
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        debug_assert!(
            routes.iter().enumerate().all(|(i, a)| routes[i + 1..].iter().all(|b| a.path != b.path)),
            "route paths must be unique"
        );
        Self { routes }
    }

    /// The application's route set: home, gated profile, login.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Route { path: "/", action: RouteAction::Activate { view: ViewId::Home, requires_auth: false } },
            Route { path: "/profile", action: RouteAction::Activate { view: ViewId::Profile, requires_auth: true } },
            Route { path: "/login", action: RouteAction::BeginLogin },
        ])
    }

    /// Look up the action registered for `path`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<RouteAction> {
        self.routes.iter().find(|r| r.path == path).map(|r| r.action)
    }

    /// Resolve `path` to a navigation outcome without side effects.
    #[must_use]
    pub fn resolve(&self, path: &str) -> NavOutcome {
        match self.lookup(path) {
            Some(RouteAction::Activate { view, requires_auth: false }) => NavOutcome::Activate(view),
            Some(RouteAction::Activate { view, requires_auth: true }) => {
                NavOutcome::Guard { view, target: path.to_owned() }
            }
            Some(RouteAction::BeginLogin) => NavOutcome::Login,
            None => NavOutcome::Miss,
        }
    }

    /// Resolve a history-state replay. A state referencing a removed route is
    /// a no-op, never an error.
    #[must_use]
    pub fn replay(&self, state: Option<&NavigationState>) -> NavOutcome {
        state.map_or(NavOutcome::Miss, |s| self.resolve(&s.path))
    }
}

/// Effect seam the controller drives.
///
/// `activate_view` is the only mutation point for which view is visible and
/// must be idempotent. `guard` runs the async session check and, depending on
/// its answer, either activates the view or starts the login flow with
/// `target` recorded for the post-login return.
pub trait NavHost {
    fn activate_view(&self, view: ViewId);
    fn guard(&self, view: ViewId, target: &str);
    fn begin_login(&self);
    fn push_history(&self, path: &str);
    fn replace_history(&self, path: &str);
}

/// The navigation controller: a route table bound to a host.
pub struct Router<H: NavHost> {
    table: RouteTable,
    host: H,
}

impl<H: NavHost> Router<H> {
    #[must_use]
    pub fn new(table: RouteTable, host: H) -> Self {
        Self { table, host }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Dispatch `path`: perform its action and return `true`, or return
    /// `false` untouched when no route matches.
    pub fn dispatch(&self, path: &str) -> bool {
        self.perform(self.table.resolve(path))
    }

    /// Dispatch `path` and, on success, push a history entry for it.
    pub fn navigate(&self, path: &str) -> bool {
        if self.dispatch(path) {
            self.host.push_history(path);
            true
        } else {
            false
        }
    }

    /// Replay a history entry on back/forward. Unknown or absent states are
    /// silently ignored; no history entries are written.
    pub fn on_history_pop(&self, state: Option<&NavigationState>) {
        self.perform(self.table.replay(state));
    }

    /// Initial-load sequence: dispatch the current path, falling back to the
    /// root view (with the address bar rewritten to match) for unknown deep
    /// links.
    pub fn startup(&self, path: &str) {
        if !self.dispatch(path) {
            self.dispatch("/");
            self.host.replace_history("/");
        }
    }

    /// Route an intercepted link click. Returns `true` when the click was
    /// handled here; `false` means the browser should navigate normally.
    pub fn intercept_link(&self, href: &str) -> bool {
        self.navigate(href)
    }

    fn perform(&self, outcome: NavOutcome) -> bool {
        match outcome {
            NavOutcome::Activate(view) => {
                self.host.activate_view(view);
                true
            }
            NavOutcome::Guard { view, target } => {
                self.host.guard(view, &target);
                true
            }
            NavOutcome::Login => {
                self.host.begin_login();
                true
            }
            NavOutcome::Miss => false,
        }
    }
}
