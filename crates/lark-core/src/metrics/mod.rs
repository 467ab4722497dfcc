//! Metrics collection abstraction for the evaluation core.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are
//! injected through [`crate::Collaborators`].

mod backend;
pub use backend::{EvalOutcome, MetricsBackend, MetricsHandle};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
