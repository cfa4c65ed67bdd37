use crate::startup::AppState;
use axum::{extract::State, http::header, response::IntoResponse};

/// Prometheus scrape endpoint.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
