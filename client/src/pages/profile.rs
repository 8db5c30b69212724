//! Profile view. Reached only through the session gate, so by the time it is
//! visible the session state normally carries a user record.

use leptos::prelude::*;

use crate::state::session::SessionState;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();

    view! {
        <section class="page page-profile">
            <h1>"Your profile"</h1>
            <Show
                when=move || session.get().signed_in()
                fallback=|| view! { <p class="profile-loading">"Loading profile..."</p> }
            >
                <div class="profile-card">
                    <Show when=move || session.get().user.is_some_and(|u| u.picture.is_some())>
                        <img
                            class="profile-image"
                            src=move || {
                                session.get().user.and_then(|u| u.picture).unwrap_or_default()
                            }
                            alt="avatar"
                        />
                    </Show>
                    <p class="user-name">
                        {move || session.get().user.map(|u| u.name).unwrap_or_default()}
                    </p>
                    <p class="user-email">
                        {move || session.get().user.map(|u| u.email).unwrap_or_default()}
                    </p>
                    <p class="user-verified">
                        {move || {
                            if session.get().email_verified() {
                                "Email verified"
                            } else {
                                "Email not verified — check your inbox"
                            }
                        }}
                    </p>
                </div>
            </Show>
        </section>
    }
}
