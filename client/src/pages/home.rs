//! Home view: the menu.

use leptos::prelude::*;

use crate::components::pizza_card::PizzaCard;
use crate::state::menu::MENU;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <section class="page page-home">
            <header class="hero">
                <h1>"Pizza 42"</h1>
                <p class="hero-tagline">"Hot pizza, cold math. Pick your slice."</p>
            </header>
            <div class="menu-grid">
                {MENU.iter().map(|pizza| view! { <PizzaCard pizza=*pizza/> }).collect_view()}
            </div>
        </section>
    }
}
