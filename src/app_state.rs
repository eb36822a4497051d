//! Application state management.
//!
//! This module defines the process-wide container built once at startup.
//! It owns the service identity, the logger, the database client, the
//! metrics backend and the optional pusher, and is handed to every
//! consumer (HTTP handlers, the push loop, workflow code) by handle.
//!
//! The state is cheaply cloneable (using `Arc` internally) so it can be
//! passed to each request handler without copying resources.

use crate::config::{AppConfig, MetricsBackend};
use crate::domain::{DatabasePtr, MetricsPtr, ServiceIdentity};
use crate::infrastructure::{
    create_database_client, create_metrics, create_metrics_pusher, Logger, MetricsPusher,
};
use anyhow::Result;
use std::sync::Arc;

/// Shared application state.
///
/// # Design Principles
///
/// - **Dependency Inversion**: consumers depend on the `Database` and
///   `WorkflowMetrics` abstractions, not on Postgres or Prometheus.
/// - **Immutable After Initialization**: built once, never mutated.
/// - **Cheap Cloning**: heavy resources are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    identity: ServiceIdentity,
    logger: Logger,
    database: DatabasePtr,
    metrics: MetricsPtr,

    /// Present only with the Prometheus backend.
    pusher: Option<Arc<MetricsPusher>>,
}

impl AppState {
    // ---

    pub fn new(
        identity: ServiceIdentity,
        logger: Logger,
        database: DatabasePtr,
        metrics: MetricsPtr,
        pusher: Option<Arc<MetricsPusher>>,
    ) -> Self {
        // ---
        AppState {
            identity,
            logger,
            database,
            metrics,
            pusher,
        }
    }

    /// Builds every component from resolved configuration.
    ///
    /// Construction is synchronous and performs no network I/O, but the
    /// database pool must be created inside a tokio runtime. Errors from
    /// any component propagate unchanged.
    pub fn from_config(config: &AppConfig, logger: Logger) -> Result<Self> {
        // ---
        let database = create_database_client(&config.database, &config.service)?;
        let metrics = create_metrics(&config.metrics)?;

        let pusher = match config.metrics.backend {
            MetricsBackend::Prometheus => Some(Arc::new(create_metrics_pusher(
                &config.metrics,
                &config.service,
                &logger,
            )?)),
            MetricsBackend::Noop => None,
        };

        Ok(Self::new(
            config.service.clone(),
            logger,
            database,
            metrics,
            pusher,
        ))
    }

    pub fn identity(&self) -> &ServiceIdentity {
        // ---
        &self.identity
    }

    pub fn logger(&self) -> &Logger {
        // ---
        &self.logger
    }

    /// Get a reference to the database client.
    pub fn database(&self) -> &DatabasePtr {
        // ---
        &self.database
    }

    /// Get a reference to the metrics implementation.
    pub fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    pub fn pusher(&self) -> Option<&Arc<MetricsPusher>> {
        // ---
        self.pusher.as_ref()
    }
}
