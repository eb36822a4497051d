// src/lib.rs
use axum::{routing::get, Router};

use handlers::{health_check, metrics_handler};

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

pub use app_state::AppState;
pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    connect_options, // ---
    create_database_client,
    create_logger,
    create_metrics,
    create_metrics_pusher,
    create_noop_metrics,
    create_postgres_client,
    create_prom_metrics,
    init_database_with_retry,
    Logger,
    MetricsPusher,
    PostgresClient,
};

/// Build the operator HTTP router (`/health`, `/metrics`).
pub fn create_router(state: AppState) -> Router {
    // ---
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
