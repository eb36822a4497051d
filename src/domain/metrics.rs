//! Workflow metric declarations and the recording abstraction.
//!
//! Metric names, help text, label schemas and bucket boundaries are a
//! wire-level contract with dashboards and alerts. Renaming anything here
//! breaks them.

use std::sync::Arc;

pub const EVALUATIONS_STARTED: &str = "evaluation_coordinator_evaluations_started";
pub const WORKFLOW_DURATION_SECONDS: &str = "evaluation_coordinator_workflow_duration_seconds";
pub const STEP_FAILURES_TOTAL: &str = "evaluation_coordinator_step_failures_total";

/// Upper bounds (inclusive, seconds) of the workflow duration histogram.
pub const WORKFLOW_DURATION_BUCKETS: [f64; 7] = [0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
}

/// Static declaration of one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
    pub kind: MetricKind,
    pub buckets: Option<&'static [f64]>,
}

pub const EVALUATIONS_STARTED_DEF: MetricDefinition = MetricDefinition {
    name: EVALUATIONS_STARTED,
    help: "Number of evaluation workflows started",
    label_names: &["journey_id"],
    kind: MetricKind::Counter,
    buckets: None,
};

pub const WORKFLOW_DURATION_DEF: MetricDefinition = MetricDefinition {
    name: WORKFLOW_DURATION_SECONDS,
    help: "Duration of completed evaluation workflows in seconds",
    label_names: &["status"],
    kind: MetricKind::Histogram,
    buckets: Some(&WORKFLOW_DURATION_BUCKETS),
};

pub const STEP_FAILURES_DEF: MetricDefinition = MetricDefinition {
    name: STEP_FAILURES_TOTAL,
    help: "Number of failed workflow steps",
    label_names: &["step_type", "error_type"],
    kind: MetricKind::Counter,
    buckets: None,
};

/// Every instrument the coordinator declares, in registration order.
pub const WORKFLOW_METRICS: [MetricDefinition; 3] = [
    EVALUATIONS_STARTED_DEF,
    WORKFLOW_DURATION_DEF,
    STEP_FAILURES_DEF,
];

/// Histogram bucket an observation is counted in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationBucket {
    /// Smallest boundary `le` with `seconds <= le`.
    UpTo(f64),
    /// Larger than the largest boundary (`+Inf`).
    Overflow,
}

/// Classifies a workflow duration against [`WORKFLOW_DURATION_BUCKETS`].
pub fn duration_bucket(seconds: f64) -> DurationBucket {
    // ---
    WORKFLOW_DURATION_BUCKETS
        .iter()
        .find(|&&le| seconds <= le)
        .map_or(DurationBucket::Overflow, |&le| DurationBucket::UpTo(le))
}

/// Abstraction for workflow lifecycle metrics.
pub trait WorkflowMetrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record that an evaluation workflow was started for a journey.
    fn record_evaluation_started(&self, journey_id: &str);

    /// Record the duration of a completed workflow.
    fn record_workflow_duration(&self, status: &str, seconds: f64);

    /// Record a single workflow step failure.
    fn record_step_failure(&self, step_type: &str, error_type: &str);
}

/// Type alias for any backend that implements WorkflowMetrics.
pub type MetricsPtr = Arc<dyn WorkflowMetrics>;
