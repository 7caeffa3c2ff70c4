//! Route table.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/logs", get(handlers::api_logs))
        .route("/api/models/count", get(handlers::api_model_count))
        .route("/static/style.css", get(handlers::stylesheet))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
