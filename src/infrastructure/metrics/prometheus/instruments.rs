use anyhow::{Context, Result};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

use crate::domain::{
    MetricDefinition, EVALUATIONS_STARTED_DEF, STEP_FAILURES_DEF, WORKFLOW_DURATION_DEF,
};

/// The three workflow lifecycle instruments.
///
/// Built from the static declarations in `domain`, so names, help text,
/// label schemas and buckets live in exactly one place.
#[derive(Clone)]
pub struct WorkflowInstruments {
    pub evaluations_started: IntCounterVec,
    pub workflow_duration: HistogramVec,
    pub step_failures: IntCounterVec,
}

impl WorkflowInstruments {
    // ---
    pub fn new() -> Result<Self> {
        // ---
        Ok(Self {
            evaluations_started: counter_vec(&EVALUATIONS_STARTED_DEF)?,
            workflow_duration: histogram_vec(&WORKFLOW_DURATION_DEF)?,
            step_failures: counter_vec(&STEP_FAILURES_DEF)?,
        })
    }

    /// Registers all instruments with `registry`.
    ///
    /// # Errors
    /// Fails if any name is already registered there. Registration is not
    /// rolled back, so a failed call may leave earlier instruments behind.
    pub fn register(&self, registry: &Registry) -> Result<()> {
        // ---
        registry
            .register(Box::new(self.evaluations_started.clone()))
            .with_context(|| format!("Failed to register {}", EVALUATIONS_STARTED_DEF.name))?;
        registry
            .register(Box::new(self.workflow_duration.clone()))
            .with_context(|| format!("Failed to register {}", WORKFLOW_DURATION_DEF.name))?;
        registry
            .register(Box::new(self.step_failures.clone()))
            .with_context(|| format!("Failed to register {}", STEP_FAILURES_DEF.name))?;

        Ok(())
    }
}

fn counter_vec(def: &MetricDefinition) -> Result<IntCounterVec> {
    // ---
    IntCounterVec::new(Opts::new(def.name, def.help), def.label_names)
        .with_context(|| format!("Invalid counter definition {}", def.name))
}

fn histogram_vec(def: &MetricDefinition) -> Result<HistogramVec> {
    // ---
    let mut opts = HistogramOpts::new(def.name, def.help);
    if let Some(buckets) = def.buckets {
        opts = opts.buckets(buckets.to_vec());
    }

    HistogramVec::new(opts, def.label_names)
        .with_context(|| format!("Invalid histogram definition {}", def.name))
}
