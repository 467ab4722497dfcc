use std::sync::Arc;

/// Evaluation-cycle outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    /// Cycle pushed its series downstream.
    Success,
    /// Query execution failed; nothing pushed.
    QueryError,
    /// Backend returned warnings; nothing pushed.
    Warnings,
    /// Blank query, configuration no-op.
    BlankQuery,
}

impl EvalOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            EvalOutcome::Success => "success",
            EvalOutcome::QueryError => "query_error",
            EvalOutcome::Warnings => "warnings",
            EvalOutcome::BlankQuery => "blank_query",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected via [`crate::Collaborators`] and shared by
/// the cache syncer and every evaluation task.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record one cache-sync pass.
    ///
    /// A pass whose fingerprint was unchanged records zero duration and
    /// zero size, mirroring the gauges it feeds.
    fn record_sync(&self, cluster: &str, op: &str, duration_ms: u64, size: u64);

    /// Record one evaluation cycle with its outcome.
    fn record_eval(&self, outcome: EvalOutcome);
}

/// Shared handle to a metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
