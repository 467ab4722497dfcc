use std::sync::Arc;

use async_trait::async_trait;

use lark_model::TimeSeries;

/// Remote-write sink for evaluated series.
///
/// Fire-and-forget from the core's perspective: batching, retries and
/// delivery guarantees are the sink's responsibility.
#[async_trait]
pub trait SampleSink: Send + Sync {
    /// Push one series, keyed by its output metric name.
    async fn push(&self, metric: &str, series: TimeSeries);
}

/// Shared handle to a remote-write sink.
pub type SinkHandle = Arc<dyn SampleSink>;
