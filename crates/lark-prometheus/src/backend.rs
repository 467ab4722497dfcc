use std::sync::Arc;

use prometheus::{CounterVec, GaugeVec, Opts, Registry, proto::MetricFamily};

use lark_core::{EvalOutcome, MetricsBackend};

/// Prometheus metrics backend for the evaluation engine.
///
/// ## Label cardinality
/// All labels are bounded (low cardinality):
/// - `cluster`: the process's configured cluster scope
/// - `op`: "sync_record_rules"
/// - `outcome`: "success", "query_error", "warnings", "blank_query"
#[derive(Clone)]
pub struct PrometheusMetrics {
    sync_duration: GaugeVec,
    sync_size: GaugeVec,
    rule_evals: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new prometheus metrics backend with custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let sync_duration = GaugeVec::new(
            Opts::new(
                "sync_duration_milliseconds",
                "Cost of the last rule cache sync pass",
            )
            .namespace("lark"),
            &["cluster", "op"],
        )?;
        registry.register(Box::new(sync_duration.clone()))?;

        let sync_size = GaugeVec::new(
            Opts::new("sync_size", "Entries loaded by the last rule cache sync pass")
                .namespace("lark"),
            &["cluster", "op"],
        )?;
        registry.register(Box::new(sync_size.clone()))?;

        let rule_evals = CounterVec::new(
            Opts::new("rule_evals_total", "Total rule evaluation cycles").namespace("lark"),
            &["outcome"],
        )?;
        registry.register(Box::new(rule_evals.clone()))?;

        Ok(Self {
            sync_duration,
            sync_size,
            rule_evals,
            registry,
        })
    }

    /// Create a new prometheus metrics backend with default registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    ///
    /// Use this to implement a `/metrics` HTTP endpoint.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Get reference to underlying prometheus registry.
    ///
    /// Useful for registering custom metrics alongside lark metrics.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_sync(&self, cluster: &str, op: &str, duration_ms: u64, size: u64) {
        self.sync_duration
            .with_label_values(&[cluster, op])
            .set(duration_ms as f64);
        self.sync_size
            .with_label_values(&[cluster, op])
            .set(size as f64);
    }

    fn record_eval(&self, outcome: EvalOutcome) {
        self.rule_evals
            .with_label_values(&[outcome.as_label()])
            .inc();
    }
}
