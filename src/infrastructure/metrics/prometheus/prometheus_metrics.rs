//! Prometheus metrics implementation.
//!
//! Owns a dedicated `prometheus::Registry` instead of the crate's default
//! global one, so every [`PrometheusMetrics`] is an explicit object built
//! once at startup and handed to consumers through `MetricsPtr`.

use anyhow::Result;
use prometheus::{Registry, TextEncoder};

use super::instruments::WorkflowInstruments;
use crate::domain::{duration_bucket, WorkflowMetrics};

pub struct PrometheusMetrics {
    registry: Registry,
    instruments: WorkflowInstruments,
}

impl PrometheusMetrics {
    // ---
    pub fn new() -> Result<Self> {
        // ---
        let registry = Registry::new();
        let instruments = WorkflowInstruments::new()?;
        instruments.register(&registry)?;

        tracing::info!("Registered workflow metrics");
        Ok(Self {
            registry,
            instruments,
        })
    }
}

impl WorkflowMetrics for PrometheusMetrics {
    // ---
    fn render(&self) -> String {
        // ---
        let mut out = String::new();
        if let Err(err) = TextEncoder::new().encode_utf8(&self.registry.gather(), &mut out) {
            tracing::error!("Failed to encode metrics: {err}");
            return String::new();
        }
        out
    }

    fn record_evaluation_started(&self, journey_id: &str) {
        // ---
        tracing::debug!(journey_id, "Recording evaluation started");
        self.instruments
            .evaluations_started
            .with_label_values(&[journey_id])
            .inc();
    }

    fn record_workflow_duration(&self, status: &str, seconds: f64) {
        // ---
        if !seconds.is_finite() || seconds < 0.0 {
            tracing::warn!(status, seconds, "Ignoring invalid workflow duration");
            return;
        }

        tracing::debug!(
            status,
            seconds,
            bucket = ?duration_bucket(seconds),
            "Recording workflow duration"
        );
        self.instruments
            .workflow_duration
            .with_label_values(&[status])
            .observe(seconds);
    }

    fn record_step_failure(&self, step_type: &str, error_type: &str) {
        // ---
        tracing::debug!(step_type, error_type, "Recording step failure");
        self.instruments
            .step_failures
            .with_label_values(&[step_type, error_type])
            .inc();
    }
}
