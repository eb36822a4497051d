mod database;
pub mod logging;
pub mod metrics;

// Re-export the factory functions for easy access
pub use database::{
    connect_options, create_database_client, create_postgres_client, init_database_with_retry,
    PostgresClient,
};
pub use logging::{create_logger, Logger};
pub use metrics::{
    create_metrics, create_metrics_pusher, create_noop_metrics, create_prom_metrics,
    MetricsPusher,
};
