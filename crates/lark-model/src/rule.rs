use serde::{Deserialize, Serialize};

use crate::{
    Labels, ModelError, ModelResult, RuleId, STORED_INTERVAL_FLOOR_SECS,
};

/// Characters rejected in output metric names.
///
/// The metric name ends up in downstream label values and dashboards, so
/// markup and quote characters are refused at validation time.
const DANGEROUS_METRIC_CHARS: [char; 5] = ['<', '>', '&', '\'', '"'];

/// Read-only snapshot of a persisted recording rule.
///
/// A recording rule periodically evaluates `query` against the metrics
/// backend and republishes the result under `metric`. Instances handed to
/// the evaluation core are immutable; an edit in the store produces a new
/// snapshot with a bumped `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRule {
    /// Unique id, immutable once created.
    pub id: RuleId,
    /// Cluster scope; the rule only applies when it matches the process's
    /// configured cluster.
    pub cluster: String,
    /// Free-form operator comment, not used by evaluation.
    #[serde(default)]
    pub note: String,
    /// Output metric name written downstream.
    pub metric: String,
    /// Query-language expression evaluated each cycle.
    pub query: String,
    /// Requested evaluation cadence in seconds.
    ///
    /// Floored to [`STORED_INTERVAL_FLOOR_SECS`] at validation time and to
    /// [`crate::RUNTIME_INTERVAL_FLOOR_SECS`] again when a task sleeps.
    pub eval_interval_secs: i64,
    /// Space-delimited `key=value` pairs stamped onto every emitted series.
    #[serde(default)]
    pub append_tags: String,
    /// Disabled rules are excluded from the enabled-rule fetch.
    #[serde(default)]
    pub disabled: bool,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds; drives the cache fingerprint.
    pub updated_at: i64,
}

impl RecordRule {
    /// Normalize and validate a rule before it is stored.
    ///
    /// Rules:
    /// - `cluster`, `metric` and `query` are not blank;
    /// - `metric` contains none of [`DANGEROUS_METRIC_CHARS`];
    /// - `eval_interval_secs` is floored to [`STORED_INTERVAL_FLOOR_SECS`];
    /// - `append_tags` is trimmed and every whitespace-delimited entry
    ///   splits into exactly `key=value`.
    pub fn validate(&mut self) -> ModelResult<()> {
        if self.cluster.trim().is_empty() {
            return Err(ModelError::BlankCluster);
        }

        if self.metric.is_empty() {
            return Err(ModelError::BlankMetric);
        }
        if self.metric.contains(&DANGEROUS_METRIC_CHARS[..]) {
            return Err(ModelError::DangerousMetric(self.metric.clone()));
        }

        if self.query.trim().is_empty() {
            return Err(ModelError::BlankQuery);
        }

        if self.eval_interval_secs <= STORED_INTERVAL_FLOOR_SECS {
            self.eval_interval_secs = STORED_INTERVAL_FLOOR_SECS;
        }

        self.append_tags = self.append_tags.trim().to_string();
        for tag in self.append_tags.split_whitespace() {
            match tag.split_once('=') {
                Some((key, _)) if !key.is_empty() => {}
                _ => return Err(ModelError::InvalidAppendTag(tag.to_string())),
            }
        }

        Ok(())
    }

    /// Parse `append_tags` into a label set.
    ///
    /// Entries that do not split into `key=value` are skipped; validation
    /// rejects them before a rule reaches the store. Parsed once per task
    /// lifetime, not per series.
    pub fn append_tag_labels(&self) -> Labels {
        self.append_tags
            .split_whitespace()
            .filter_map(|tag| tag.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Cheap population summary of the enabled rules in a cluster scope.
///
/// `(total, last_updated)` together form the cache fingerprint: if neither
/// changes between two polls, the rule population is assumed unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStatistics {
    /// Count of enabled rules in scope.
    pub total: i64,
    /// Maximum `updated_at` among them.
    pub last_updated: i64,
}
