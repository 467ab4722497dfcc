use thiserror::Error;

/// Failure reaching or querying the backing rule store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("store query failed: {0}")]
    QueryFailed(String),
}

/// Failure executing an expression on the query backend.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query backend unreachable: {0}")]
    Unreachable(String),

    #[error("query execution failed: {0}")]
    Execution(String),
}

/// Failure of the leadership predicate.
///
/// Never fatal: a reconciliation tick that cannot determine leadership is
/// logged and skipped.
#[derive(Debug, Error)]
#[error("leadership check failed: {0}")]
pub struct LeaderError(pub String);

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),
}
