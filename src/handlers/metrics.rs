use crate::app_state::AppState;
use crate::domain::WorkflowMetrics;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// Handler for the `/metrics` endpoint.
///
/// Returns the same Prometheus text snapshot the pusher ships, for
/// operators inspecting a running instance. Empty with the no-op backend.
pub async fn metrics_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    // ---

    let metrics_text = app_state.metrics().render();

    Ok((
        StatusCode::OK,
        [("content-type", prometheus::TEXT_FORMAT)],
        metrics_text,
    ))
}
