use crate::Error;

use prometheus::{histogram_opts, opts, HistogramTimer, HistogramVec, IntCounterVec, Registry};

#[derive(Clone)]
pub struct Metrics {
    pub executions: IntCounterVec,
    pub failures: IntCounterVec,
    pub execute_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, Error> {
        let execute_duration = HistogramVec::new(
            histogram_opts!(
                "restore_item_action_execute_duration_seconds",
                "The duration of restore item action executions in seconds"
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
            &["action"],
        )
        .map_err(Error::Metrics)?;
        let failures = IntCounterVec::new(
            opts!(
                "restore_item_action_failures_total",
                "restore item action execution errors"
            ),
            &["action", "error"],
        )
        .map_err(Error::Metrics)?;
        let executions = IntCounterVec::new(
            opts!("restore_item_action_executions_total", "restore item action executions"),
            &["action"],
        )
        .map_err(Error::Metrics)?;
        Ok(Metrics {
            executions,
            failures,
            execute_duration,
        })
    }

    /// Register API metrics to start tracking them.
    pub fn register(self, registry: &Registry) -> Result<Self, Error> {
        registry
            .register(Box::new(self.execute_duration.clone()))
            .map_err(Error::Metrics)?;
        registry
            .register(Box::new(self.failures.clone()))
            .map_err(Error::Metrics)?;
        registry
            .register(Box::new(self.executions.clone()))
            .map_err(Error::Metrics)?;
        Ok(self)
    }

    pub fn execute_failure(&self, action: &str, e: &Error) {
        self.failures
            .with_label_values(&[action, e.metric_label()])
            .inc()
    }

    /// Counts the execution and observes its duration when the timer drops.
    pub fn count_and_measure(&self, action: &str) -> HistogramTimer {
        self.executions.with_label_values(&[action]).inc();
        self.execute_duration.with_label_values(&[action]).start_timer()
    }
}
