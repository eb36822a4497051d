use crate::domain::WorkflowMetrics;

/// No-op metrics implementation for testing.
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl WorkflowMetrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_evaluation_started(&self, _: &str) {}
    fn record_workflow_duration(&self, _: &str, _: f64) {}
    fn record_step_failure(&self, _: &str, _: &str) {}
}
