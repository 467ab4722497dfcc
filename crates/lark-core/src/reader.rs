use std::sync::Arc;

use async_trait::async_trait;

use crate::error::QueryError;
use lark_model::QueryValue;

/// Result of one query execution.
///
/// A backend may return non-fatal `warnings` alongside a usable value; the
/// evaluation core treats a warned cycle as failed and pushes nothing.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub value: QueryValue,
    pub warnings: Vec<String>,
}

/// Metrics query backend evaluating expressions at a point in time.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Execute `expr` at `at_secs` (unix seconds).
    async fn query(&self, expr: &str, at_secs: i64) -> Result<QueryOutcome, QueryError>;
}

/// Shared handle to a query backend.
pub type ReaderHandle = Arc<dyn QueryBackend>;
