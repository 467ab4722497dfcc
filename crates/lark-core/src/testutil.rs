//! Recording fakes for the collaborator traits, shared by unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{LeaderError, QueryError, StoreError};
use crate::naming::LeaderElect;
use crate::notify::Notifier;
use crate::reader::{QueryBackend, QueryOutcome};
use crate::store::RuleStore;
use crate::writer::SampleSink;
use lark_model::{InstantSample, Labels, QueryValue, RecordRule, RuleStatistics, TimeSeries};

pub(crate) fn rule(id: i64, metric: &str, query: &str, interval: i64) -> RecordRule {
    RecordRule {
        id,
        cluster: "default".to_string(),
        note: String::new(),
        metric: metric.to_string(),
        query: query.to_string(),
        eval_interval_secs: interval,
        append_tags: String::new(),
        disabled: false,
        created_at: 1,
        updated_at: 1,
    }
}

pub(crate) fn vector(labels: &[(&str, &str)], timestamp_secs: i64, value: f64) -> InstantSample {
    let mut set = Labels::new();
    for (k, v) in labels {
        set.insert(*k, *v);
    }
    InstantSample {
        labels: set,
        timestamp_secs,
        value,
    }
}

/// In-memory rule store with settable statistics and failure injection.
pub(crate) struct FakeStore {
    stats: Mutex<Result<RuleStatistics, String>>,
    rules: Mutex<Result<Vec<RecordRule>, String>>,
    pub stat_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(Ok(RuleStatistics {
                total: 0,
                last_updated: 0,
            })),
            rules: Mutex::new(Ok(Vec::new())),
            stat_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Replace the rule list and derive matching statistics from it.
    pub fn set_rules(&self, rules: Vec<RecordRule>) {
        let stats = RuleStatistics {
            total: rules.len() as i64,
            last_updated: rules.iter().map(|r| r.updated_at).max().unwrap_or(0),
        };
        *self.stats.lock().unwrap() = Ok(stats);
        *self.rules.lock().unwrap() = Ok(rules);
    }

    /// Override the statistics without touching the rule list.
    pub fn set_stats(&self, total: i64, last_updated: i64) {
        *self.stats.lock().unwrap() = Ok(RuleStatistics {
            total,
            last_updated,
        });
    }

    pub fn fail_stats(&self, msg: &str) {
        *self.stats.lock().unwrap() = Err(msg.to_string());
    }
}

#[async_trait]
impl RuleStore for FakeStore {
    async fn statistics(&self, _cluster: &str) -> Result<RuleStatistics, StoreError> {
        self.stat_calls.fetch_add(1, Ordering::SeqCst);
        self.stats
            .lock()
            .unwrap()
            .clone()
            .map_err(StoreError::Unreachable)
    }

    async fn enabled_rules(&self, _cluster: &str) -> Result<Vec<RecordRule>, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.rules
            .lock()
            .unwrap()
            .clone()
            .map_err(StoreError::Unreachable)
    }
}

/// Query backend returning a canned response and recording every call.
pub(crate) struct FakeReader {
    response: Mutex<Result<QueryOutcome, String>>,
    pub queries: Mutex<Vec<(String, i64)>>,
}

impl FakeReader {
    pub fn new(value: QueryValue) -> Self {
        Self {
            response: Mutex::new(Ok(QueryOutcome {
                value,
                warnings: Vec::new(),
            })),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_warnings(value: QueryValue, warnings: Vec<String>) -> Self {
        let reader = Self::new(value);
        reader.response.lock().unwrap().as_mut().unwrap().warnings = warnings;
        reader
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            response: Mutex::new(Err(msg.to_string())),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QueryBackend for FakeReader {
    async fn query(&self, expr: &str, at_secs: i64) -> Result<QueryOutcome, QueryError> {
        self.queries
            .lock()
            .unwrap()
            .push((expr.to_string(), at_secs));
        self.response
            .lock()
            .unwrap()
            .clone()
            .map_err(QueryError::Execution)
    }
}

/// Sink recording every pushed series.
#[derive(Default)]
pub(crate) struct FakeSink {
    pushed: Mutex<Vec<(String, TimeSeries)>>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushed(&self) -> Vec<(String, TimeSeries)> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SampleSink for FakeSink {
    async fn push(&self, metric: &str, series: TimeSeries) {
        self.pushed.lock().unwrap().push((metric.to_string(), series));
    }
}

/// Notifier recording every message.
#[derive(Default)]
pub(crate) struct FakeNotifier {
    notes: Mutex<Vec<(String, String)>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> Vec<(String, String)> {
        self.notes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, error: &str, context: &str) {
        self.notes
            .lock()
            .unwrap()
            .push((error.to_string(), context.to_string()));
    }
}

/// Leadership predicate with settable answer and failure injection.
pub(crate) struct FakeLeader {
    pub leader: AtomicBool,
    pub fail: AtomicBool,
}

impl FakeLeader {
    pub fn new(leader: bool) -> Self {
        Self {
            leader: AtomicBool::new(leader),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl LeaderElect for FakeLeader {
    async fn is_leader(&self) -> Result<bool, LeaderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LeaderError("membership lookup failed".to_string()));
        }
        Ok(self.leader.load(Ordering::SeqCst))
    }
}
