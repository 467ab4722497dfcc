//! Prometheus metrics backend for the lark evaluation core.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of
//! [`lark_core::MetricsBackend`] that exposes internal engine metrics in
//! Prometheus format.
//!
//! ## Metrics
//! - `lark_sync_duration_milliseconds{cluster, op}` - Gauge, cost of the
//!   last cache-sync pass (zero when the fingerprint was unchanged)
//! - `lark_sync_size{cluster, op}` - Gauge, entries loaded by the last
//!   cache-sync pass
//! - `lark_rule_evals_total{outcome}` - Counter of evaluation cycles
//!
//! ## HTTP server
//! This crate does NOT serve a `/metrics` endpoint. Call
//! [`PrometheusMetrics::gather`] from your application's HTTP framework and
//! encode the families with [`TextEncoder`].

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
