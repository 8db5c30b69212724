//! Root application component: context wiring, startup sequence, and the
//! binding between the navigation controller and the Leptos view layer.
//!
//! DESIGN
//! ======
//! There are no module-global singletons. The identity client, session gate,
//! and router are constructed once here, after the auth configuration
//! document arrives, and handed to components through a context slot. Until
//! that moment interactive chrome is inert, matching the original app's
//! window between page load and identity-client configuration.

use std::rc::Rc;

use leptos::prelude::*;
use orders::CartItem;

use crate::auth::gate::SessionGate;
use crate::components::cart_panel::CartPanel;
use crate::components::nav_bar::NavBar;
use crate::components::notice::{Notice, NoticeHost};
use crate::nav::router::{NavHost, RouteTable, Router, ViewId};
use crate::pages::home::HomePage;
use crate::pages::profile::ProfilePage;
use crate::state::session::SessionState;

/// Binds navigation outcomes to the view signal and the session gate.
pub struct LeptosNavHost {
    active: RwSignal<Option<ViewId>>,
    gate: SessionGate,
}

impl LeptosNavHost {
    #[must_use]
    pub fn new(active: RwSignal<Option<ViewId>>, gate: SessionGate) -> Self {
        Self { active, gate }
    }
}

impl NavHost for LeptosNavHost {
    fn activate_view(&self, view: ViewId) {
        // Setting the signal hides every other view; idempotent by
        // construction.
        self.active.set(Some(view));
    }

    fn guard(&self, view: ViewId, target: &str) {
        #[cfg(feature = "csr")]
        {
            let gate = self.gate.clone();
            let active = self.active;
            let target = target.to_owned();
            wasm_bindgen_futures::spawn_local(async move {
                let _ = gate.require_auth(move || active.set(Some(view)), &target).await;
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (view, target);
        }
    }

    fn begin_login(&self) {
        #[cfg(feature = "csr")]
        {
            let gate = self.gate.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let identity = gate.identity();
                if let Err(e) = identity
                    .login_with_redirect(crate::auth::identity::LoginOptions::default())
                    .await
                {
                    log::warn!("login redirect failed: {e}");
                }
            });
        }
    }

    fn push_history(&self, path: &str) {
        #[cfg(feature = "csr")]
        crate::nav::browser::push_state(path);
        #[cfg(not(feature = "csr"))]
        let _ = path;
    }

    fn replace_history(&self, path: &str) {
        #[cfg(feature = "csr")]
        crate::nav::browser::replace_state(path);
        #[cfg(not(feature = "csr"))]
        let _ = path;
    }
}

/// The app router bound to the Leptos host.
pub type AppRouter = Router<LeptosNavHost>;

/// Handles components use to reach the gate and the router.
#[derive(Clone)]
pub struct AppHandles {
    pub gate: SessionGate,
    pub router: Rc<AppRouter>,
}

/// Context slot for [`AppHandles`]; empty until startup configuration
/// resolves.
pub type HandleSlot = StoredValue<Option<AppHandles>, LocalStorage>;

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    let active = RwSignal::new(None::<ViewId>);
    let session = RwSignal::new(SessionState::default());
    let cart_items = RwSignal::new(Vec::<CartItem>::new());
    let cart_open = RwSignal::new(false);
    let notice = RwSignal::new(None::<Notice>);
    let handles: HandleSlot = StoredValue::new_local(None);

    provide_context(active);
    provide_context(session);
    provide_context(cart_items);
    provide_context(cart_open);
    provide_context(notice);
    provide_context(handles);

    #[cfg(feature = "csr")]
    wasm_bindgen_futures::spawn_local(run_startup(handles, active, session, cart_items, notice));

    view! {
        <NavBar/>
        <main class="content">
            <Show when=move || active.get() == Some(ViewId::Home)>
                <HomePage/>
            </Show>
            <Show when=move || active.get() == Some(ViewId::Profile)>
                <ProfilePage/>
            </Show>
        </main>
        <CartPanel/>
        <NoticeHost/>
    }
}

/// Startup sequence, in the order the original page load runs it: configure
/// the identity client, dispatch the current path (falling back to the root
/// for unknown deep links), then resolve the session — completing a login
/// redirect if the URL carries authorization artifacts.
#[cfg(feature = "csr")]
async fn run_startup(
    handles: HandleSlot,
    active: RwSignal<Option<ViewId>>,
    session: RwSignal<SessionState>,
    cart_items: RwSignal<Vec<CartItem>>,
    notice: RwSignal<Option<Notice>>,
) {
    use crate::auth::provider::{ProviderClient, parse_callback_query};
    use crate::nav::browser;
    use crate::state::cart::CartStore;
    use crate::util::storage::{BrowserLocalStore, BrowserSessionStore};

    let settings = match crate::net::api::fetch_auth_settings().await {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("auth configuration unavailable: {e}");
            notice.set(Some(Notice::info(
                "Configuration error",
                "Could not load the sign-in configuration. Reload to try again.",
            )));
            session.update(|s| s.loading = false);
            return;
        }
    };

    let identity = Rc::new(ProviderClient::new(settings, BrowserSessionStore));
    let gate = SessionGate::new(identity);
    let router = Rc::new(Router::new(
        RouteTable::standard(),
        LeptosNavHost::new(active, gate.clone()),
    ));
    handles.set_value(Some(AppHandles { gate: gate.clone(), router: router.clone() }));

    browser::install_popstate(router.clone());
    browser::install_link_interception(router.clone());

    cart_items.set(CartStore::new(BrowserLocalStore).items());

    router.startup(&browser::current_path());

    if gate.is_authenticated().await {
        load_user(&gate, session).await;
        return;
    }

    if parse_callback_query(&browser::current_query()).is_some() {
        if let Some(target) = gate.complete_login_redirect().await {
            if router.dispatch(&target) {
                browser::replace_state(&target);
            }
        }
        if gate.is_authenticated().await {
            load_user(&gate, session).await;
            return;
        }
    }

    session.update(|s| s.loading = false);
}

#[cfg(feature = "csr")]
async fn load_user(gate: &SessionGate, session: RwSignal<SessionState>) {
    match gate.identity().get_user().await {
        Ok(user) => session.set(SessionState { user: Some(user), loading: false }),
        Err(e) => {
            log::warn!("profile fetch failed: {e}");
            session.update(|s| s.loading = false);
        }
    }
}
