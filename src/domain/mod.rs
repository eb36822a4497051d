mod database;
mod identity;
mod log_level;
mod metrics;

pub use database::{Database, DatabasePtr};
pub use identity::{ServiceIdentity, SCHEMA_NAME, SERVICE_NAME};
pub use log_level::LogLevel;

// Publicly expose the metrics abstraction and its declarations
pub use metrics::{
    duration_bucket, DurationBucket, MetricDefinition, MetricKind, MetricsPtr, WorkflowMetrics,
    EVALUATIONS_STARTED, EVALUATIONS_STARTED_DEF, STEP_FAILURES_DEF, STEP_FAILURES_TOTAL,
    WORKFLOW_DURATION_BUCKETS, WORKFLOW_DURATION_DEF, WORKFLOW_DURATION_SECONDS,
    WORKFLOW_METRICS,
};
