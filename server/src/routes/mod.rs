//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves everything: the order API, the auth configuration
//! document the SPA bootstraps from, a liveness probe, and the static SPA
//! itself with an index fallback so deep links load the shell and resolve
//! client-side.

pub mod orders;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::routing::{get, post};
// Leading `::` disambiguates the shared crate from the `orders` route module.
use ::orders::AuthSettings;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router: API plus static SPA fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let site_dir = state.config.site_dir.clone();
    let spa = ServeDir::new(&site_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(site_dir.join("index.html")));

    Router::new()
        .route("/auth_config.json", get(auth_config))
        .route("/api/orders", post(orders::place_order))
        .route("/healthz", get(healthz))
        .with_state(state)
        .fallback_service(spa)
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// `GET /auth_config.json` — identity-provider settings for the SPA.
async fn auth_config(State(state): State<AppState>) -> Json<AuthSettings> {
    Json(state.config.auth.clone())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
