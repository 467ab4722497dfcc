//! Per-rule evaluation task.
//!
//! One [`RuleEval`] runs per active worker identity: an independent loop
//! that queries the backend, converts the result into output series and
//! pushes them downstream on the rule's own cadence until its cancellation
//! token is signalled.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::metrics::{EvalOutcome, MetricsHandle};
use crate::notify::NotifierHandle;
use crate::reader::ReaderHandle;
use crate::writer::SinkHandle;
use lark_model::{
    InstantSample, Labels, METRIC_NAME_LABEL, RUNTIME_INTERVAL_FLOOR_SECS, RecordRule, RuleId,
    Sample, TimeSeries,
};

/// Static context attached to operator notifications about query failures.
const QUERY_FAILURE_CONTEXT: &str = "error occurs when querying the metrics backend";

/// One recording-rule evaluation task.
///
/// Owns an immutable rule snapshot and its append tags, parsed once at
/// construction rather than per series. A content change in the store never
/// mutates a running task; the supervisor replaces it under a new identity.
pub struct RuleEval {
    rule: Arc<RecordRule>,
    tags: Labels,
    reader: ReaderHandle,
    writer: SinkHandle,
    notifier: NotifierHandle,
    metrics: MetricsHandle,
}

impl RuleEval {
    pub fn new(
        rule: Arc<RecordRule>,
        reader: ReaderHandle,
        writer: SinkHandle,
        notifier: NotifierHandle,
        metrics: MetricsHandle,
    ) -> Self {
        let tags = rule.append_tag_labels();
        Self {
            rule,
            tags,
            reader,
            writer,
            notifier,
            metrics,
        }
    }

    pub fn rule_id(&self) -> RuleId {
        self.rule.id
    }

    /// Sleep between cycles, floored at run time regardless of what the
    /// store holds.
    fn sleep_interval(&self) -> Duration {
        let mut secs = self.rule.eval_interval_secs;
        if secs <= RUNTIME_INTERVAL_FLOOR_SECS {
            secs = RUNTIME_INTERVAL_FLOOR_SECS;
        }
        Duration::from_secs(secs as u64)
    }

    /// Evaluate/sleep loop.
    ///
    /// The stop signal is checked before each evaluation and races the
    /// sleep, so a cancellation observed mid-sleep exits without starting
    /// another cycle. A cycle in flight always finishes first.
    pub async fn run(self, cancel: CancellationToken) {
        info!(rule_id = self.rule.id, "rule eval starting");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.work().await;
            debug!(rule_id = self.rule.id, "rule evaluated");

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.sleep_interval()) => {}
            }
        }

        info!(rule_id = self.rule.id, "rule eval stopped");
    }

    /// One evaluation cycle.
    ///
    /// Query failures and backend warnings abort this cycle only: they are
    /// logged (and failures notified), nothing is pushed, and the task
    /// stays alive for the next cycle. The fixed interval is the only retry
    /// mechanism.
    pub async fn work(&self) {
        let query = self.rule.query.trim();
        if query.is_empty() {
            error!(rule_id = self.rule.id, "query is blank");
            self.metrics.record_eval(EvalOutcome::BlankQuery);
            return;
        }

        let outcome = match self.reader.query(query, unix_now_secs()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(rule_id = self.rule.id, query, error = %e, "query failed");
                self.notifier
                    .notify(&e.to_string(), QUERY_FAILURE_CONTEXT)
                    .await;
                self.metrics.record_eval(EvalOutcome::QueryError);
                return;
            }
        };

        if !outcome.warnings.is_empty() {
            error!(
                rule_id = self.rule.id,
                query,
                warnings = ?outcome.warnings,
                "query returned warnings, dropping result",
            );
            self.metrics.record_eval(EvalOutcome::Warnings);
            return;
        }

        for vector in outcome.value.into_vectors() {
            let series = self.build_series(&vector);
            self.writer.push(&self.rule.metric, series).await;
        }
        self.metrics.record_eval(EvalOutcome::Success);
    }

    /// Build the output series for one result vector.
    ///
    /// The metric-name label is forced to the rule's configured metric.
    /// Raw labels are copied through except the metric name and any key
    /// the append tags also carry; append tags win and are added last.
    /// Timestamps convert from backend-native seconds to milliseconds.
    fn build_series(&self, vector: &InstantSample) -> TimeSeries {
        let mut labels = Labels::new();
        labels.insert(METRIC_NAME_LABEL, self.rule.metric.clone());

        for (key, value) in vector.labels.iter() {
            if key == METRIC_NAME_LABEL {
                continue;
            }
            if self.tags.contains_key(key) {
                continue;
            }
            labels.insert(key, value);
        }

        for (key, value) in self.tags.iter() {
            labels.insert(key, value);
        }

        TimeSeries {
            labels,
            samples: vec![Sample {
                timestamp_ms: vector.timestamp_secs * 1000,
                value: vector.value,
            }],
        }
    }
}

fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
