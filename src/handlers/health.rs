use crate::app_state::AppState;
use crate::domain::Database;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: String,
}

#[derive(Deserialize)]
pub struct HealthQuery {
    mode: Option<String>,
}

/// Responds with the health status of the service.
///
/// - By default (no query parameters), performs a light check to confirm the
///   process is serving requests.
///
/// - If `mode=full` is passed as a query parameter, also pings Postgres.
///
/// # Responses
/// - `200 OK` with `{ "status": "ok", "service": ... }` when healthy.
/// - `500 INTERNAL SERVER ERROR` with `{ "status": "error", ... }` if the
///   database ping fails in full mode.
pub async fn health_check(
    State(state): State<AppState>,
    Query(params): Query<HealthQuery>,
) -> (StatusCode, Json<HealthResponse>) {
    // ---
    let service = state.identity().service_name.clone();

    if params.mode.as_deref() == Some("full") {
        if let Err(err) = state.database().ping().await {
            tracing::error!("Health check failed: {err:#}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error",
                    service,
                }),
            );
        }
    }

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            service,
        }),
    )
}
