//! Remote-write sample derived from a flap record.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::FlapRecord;

/// Timestamp format used by flap events and records.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metric name under which flap counters are exported.
pub const FLAP_COUNTER_METRIC: &str = "link_flapping_counter";

/// A record whose `last_occurred` is not a valid `%Y-%m-%d %H:%M:%S` time.
///
/// The exporter skips the affected sample and logs it; the rest of the
/// batch proceeds.
#[derive(Debug, Error)]
#[error("invalid record timestamp {timestamp:?}: {source}")]
pub struct TimestampError {
    pub timestamp: String,
    #[source]
    pub source: chrono::ParseError,
}

/// One entry of a chunked remote write.
///
/// Label values are always strings, even numeric ones, and the timestamp
/// is epoch milliseconds - the shape the time-series write endpoint takes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteSample {
    /// Metric name.
    pub name: String,
    /// Sample time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Label set identifying the link.
    pub labels: BTreeMap<String, String>,
    /// Counter value at `timestamp_ms`.
    pub value: u64,
}

impl RemoteSample {
    /// Build the exported sample for a record.
    ///
    /// The sample time is the record's `last_occurred` converted to epoch
    /// milliseconds; an unparseable time yields [`TimestampError`] so the
    /// caller can skip just this sample.
    pub fn from_record(record: &FlapRecord) -> Result<Self, TimestampError> {
        let ts = NaiveDateTime::parse_from_str(&record.last_occurred, TIME_FORMAT).map_err(
            |source| TimestampError {
                timestamp: record.last_occurred.clone(),
                source,
            },
        )?;

        let mut labels = BTreeMap::new();
        labels.insert("link_id".to_string(), record.link_id.clone());
        labels.insert(
            "node_description".to_string(),
            record.node_description.clone(),
        );
        labels.insert(
            "partner_node_description".to_string(),
            record.partner_node_description.clone(),
        );

        Ok(Self {
            name: FLAP_COUNTER_METRIC.to_string(),
            timestamp_ms: ts.and_utc().timestamp_millis(),
            labels,
            value: record.flap_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(last_occurred: &str) -> FlapRecord {
        FlapRecord {
            link_id: "L1".to_string(),
            node_description: "switch-a:1".to_string(),
            partner_node_description: "switch-b:7".to_string(),
            first_occurred: "1970-01-01 00:00:00".to_string(),
            last_occurred: last_occurred.to_string(),
            flap_count: 1,
        }
    }

    #[test]
    fn converts_last_occurred_to_epoch_millis() {
        // 7100 seconds after the epoch.
        let sample = RemoteSample::from_record(&record("1970-01-01 01:58:20")).unwrap();

        assert_eq!(sample.name, FLAP_COUNTER_METRIC);
        assert_eq!(sample.timestamp_ms, 7_100_000);
        assert_eq!(sample.value, 1);
        assert_eq!(sample.labels.get("link_id").unwrap(), "L1");
        assert_eq!(sample.labels.get("node_description").unwrap(), "switch-a:1");
        assert_eq!(
            sample.labels.get("partner_node_description").unwrap(),
            "switch-b:7"
        );
    }

    #[test]
    fn malformed_timestamp_is_an_error() {
        let err = RemoteSample::from_record(&record("not a time")).unwrap_err();
        assert_eq!(err.timestamp, "not a time");
    }

    #[test]
    fn labels_are_exactly_the_metadata_keys() {
        let sample = RemoteSample::from_record(&record("2024-05-01 10:00:00")).unwrap();
        let keys: Vec<&str> = sample.labels.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["link_id", "node_description", "partner_node_description"]
        );
    }
}
