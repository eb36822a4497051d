//! Periodic push of rendered metrics to a remote collector.
//!
//! The pusher ships the Prometheus text exposition produced by a
//! [`WorkflowMetrics`] backend. Aggregation stays in the backend and
//! transport in `reqwest`.

use anyhow::{bail, Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::Instrument;

use crate::config::MetricsConfig;
use crate::domain::{MetricsPtr, ServiceIdentity, WorkflowMetrics};
use crate::infrastructure::logging::Logger;

/// Header identifying the pushing service to the collector.
pub const SERVICE_NAME_HEADER: &str = "X-Service-Name";

const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MetricsPusher {
    service_name: String,
    endpoint: Url,
    interval: Duration,
    client: reqwest::Client,
    logger: Logger,
}

/// Creates the metrics pusher for the service.
///
/// `logger` scopes the pusher's own diagnostics to the service span.
pub fn create_metrics_pusher(
    config: &MetricsConfig,
    identity: &ServiceIdentity,
    logger: &Logger,
) -> Result<MetricsPusher> {
    // ---
    let client = reqwest::Client::builder()
        .timeout(PUSH_TIMEOUT)
        .build()
        .context("Failed to build metrics push client")?;

    Ok(MetricsPusher {
        service_name: identity.service_name.clone(),
        endpoint: config.alloy_url.clone(),
        interval: config.push_interval,
        client,
        logger: logger.clone(),
    })
}

impl MetricsPusher {
    // ---
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sends one snapshot of `metrics` to the endpoint.
    ///
    /// # Errors
    /// Fails on transport errors and on any non-2xx response.
    pub async fn push_once(&self, metrics: &dyn WorkflowMetrics) -> Result<()> {
        // ---
        let body = metrics.render();

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, prometheus::TEXT_FORMAT)
            .header(SERVICE_NAME_HEADER, &self.service_name)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to push metrics to {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Metrics push to {} rejected with {status}", self.endpoint);
        }

        tracing::trace!(endpoint = %self.endpoint, "Pushed metrics");
        Ok(())
    }

    /// Starts the push loop on the current runtime.
    ///
    /// The first push happens one interval after the call. Failures are
    /// logged and the loop keeps going until the task is aborted.
    pub fn spawn(self: Arc<Self>, metrics: MetricsPtr) -> JoinHandle<()> {
        // ---
        let span = self.logger.span();
        tracing::info!(
            parent: &span,
            endpoint = %self.endpoint,
            interval_secs = self.interval.as_secs(),
            "Starting metrics pusher"
        );

        tokio::spawn(
            async move {
                let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    ticker.tick().await;
                    if let Err(err) = self.push_once(metrics.as_ref()).await {
                        tracing::warn!("{err:#}");
                    }
                }
            }
            .instrument(span),
        )
    }
}
