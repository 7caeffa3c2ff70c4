//! Request handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::dashboard::render_dashboard;
use crate::error::QueryError;
use crate::models::ScrapeLogEntry;
use crate::queries::{fetch_model_count, fetch_recent_scrape_logs};
use crate::render::templates::CSS;

/// Dashboard page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = render_dashboard(
        state.store.as_ref(),
        &state.options,
        state.handler.as_ref(),
    )
    .await;
    Html(view.page.to_document(&state.options.title))
}

/// Scrape log entries, newest first.
pub async fn api_logs(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScrapeLogEntry>>, ApiError> {
    let entries = fetch_recent_scrape_logs(state.store.as_ref(), state.options.log_limit).await?;
    Ok(Json(entries))
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Number of documents in the models collection.
pub async fn api_model_count(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = fetch_model_count(state.store.as_ref()).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], CSS)
}

/// Query failure surfaced as an HTTP error.
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("API query failed: {}", self.0);
        let status = if self.0.is_permission_denied() {
            StatusCode::FORBIDDEN
        } else {
            StatusCode::BAD_GATEWAY
        };
        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
