use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cluster is blank")]
    BlankCluster,

    #[error("metric is blank")]
    BlankMetric,

    #[error("metric has invalid characters: {0}")]
    DangerousMetric(String),

    #[error("query is blank")]
    BlankQuery,

    #[error("append tag is not key=value: {0}")]
    InvalidAppendTag(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
