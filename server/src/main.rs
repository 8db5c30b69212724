mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("configuration failed");
    if config.management.is_none() {
        tracing::warn!("management API credentials not set — orders will be accepted but not recorded to profiles");
    }

    let state = state::AppState::new(config);
    let port = state.config.port;

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "pizza42 listening");
    axum::serve(listener, app).await.expect("server failed");
}
