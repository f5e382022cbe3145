mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;

pub fn build_router(config: AppConfig) -> Router {
    let state = Arc::new(AppState::new(config));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/amenities", get(handlers::amenities))
        .route("/api/search", get(handlers::search))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start(config: AppConfig, host: &str, port: u16) -> std::io::Result<()> {
    let mode = config.mode;
    let app = build_router(config);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, %mode, "Amenity Finder server listening");
    eprintln!("  Amenity Finder server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
