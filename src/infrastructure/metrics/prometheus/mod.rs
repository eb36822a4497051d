mod instruments;
mod prometheus_metrics;
mod pusher;

pub use prometheus_metrics::PrometheusMetrics;
pub use pusher::{create_metrics_pusher, MetricsPusher};
use std::sync::Arc;

/// Creates a new Prometheus metrics implementation.
///
/// Declares the three workflow instruments in a registry owned by the
/// returned instance. Rendered snapshots are shipped by a [`MetricsPusher`].
///
/// Returns a fully initialized metrics instance ready for use.
pub fn create() -> anyhow::Result<crate::domain::MetricsPtr> {
    tracing::info!("Initializing Prometheus metrics");
    Ok(Arc::new(PrometheusMetrics::new()?))
}
