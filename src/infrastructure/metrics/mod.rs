pub mod noop;
pub mod prometheus;

use crate::config::{MetricsBackend, MetricsConfig};
use crate::domain::MetricsPtr;

// Re-export the factory functions for easy access
pub use self::prometheus::{create_metrics_pusher, MetricsPusher};
pub use noop::create as create_noop_metrics;
pub use self::prometheus::create as create_prom_metrics;

/// Creates the metrics backend selected by configuration.
pub fn create_metrics(config: &MetricsConfig) -> anyhow::Result<MetricsPtr> {
    // ---
    match config.backend {
        MetricsBackend::Prometheus => create_prom_metrics(),
        MetricsBackend::Noop => create_noop_metrics(),
    }
}
