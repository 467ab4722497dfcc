use serde::{Deserialize, Serialize};

use crate::Labels;

/// One scalar sample of an output time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix milliseconds.
    pub timestamp_ms: i64,
    pub value: f64,
}

/// An output time series pushed to the remote-write sink.
///
/// The metric name travels in the [`crate::METRIC_NAME_LABEL`] label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub labels: Labels,
    pub samples: Vec<Sample>,
}

/// One series of an instant-vector query result.
///
/// Timestamps are backend-native unix seconds; the evaluation core converts
/// them to milliseconds when building output series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantSample {
    pub labels: Labels,
    /// Unix seconds.
    pub timestamp_secs: i64,
    pub value: f64,
}

/// Value returned by the query backend.
///
/// Recording rules only consume instant vectors; anything else converts to
/// an empty sample list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryValue {
    Vector(Vec<InstantSample>),
    Empty,
}

impl QueryValue {
    /// Flatten the value into a sequence of scalar sample points, one per
    /// result series.
    pub fn into_vectors(self) -> Vec<InstantSample> {
        match self {
            QueryValue::Vector(samples) => samples,
            QueryValue::Empty => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_value_flattens_to_its_samples() {
        let mut labels = Labels::new();
        labels.insert("instance", "a");

        let value = QueryValue::Vector(vec![InstantSample {
            labels,
            timestamp_secs: 100,
            value: 1.0,
        }]);

        let vectors = value.into_vectors();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].timestamp_secs, 100);
    }

    #[test]
    fn empty_value_flattens_to_nothing() {
        assert!(QueryValue::Empty.into_vectors().is_empty());
    }

    #[test]
    fn series_serde_roundtrip() {
        let mut labels = Labels::new();
        labels.insert("__name__", "cpu_used");
        labels.insert("instance", "a");

        let series = TimeSeries {
            labels,
            samples: vec![Sample {
                timestamp_ms: 100_000,
                value: 0.5,
            }],
        };

        let json = serde_json::to_string(&series).unwrap();
        let back: TimeSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);
    }
}
