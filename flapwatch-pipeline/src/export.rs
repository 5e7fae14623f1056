//! Sample sink seam between the pipeline and the remote writer.

use async_trait::async_trait;
use tracing::warn;

use flapwatch_remote::{PushReport, RemoteWriter};
use flapwatch_types::{FlapRecord, RemoteSample};

/// Destination for derived counter samples.
///
/// [`RemoteWriter`] is the production implementation; tests substitute an
/// in-memory sink.
#[async_trait]
pub trait SampleSink: Send + Sync {
    async fn push(&self, samples: Vec<RemoteSample>) -> PushReport;
}

#[async_trait]
impl SampleSink for RemoteWriter {
    async fn push(&self, samples: Vec<RemoteSample>) -> PushReport {
        RemoteWriter::push(self, samples).await
    }
}

/// Convert changed records to remote samples.
///
/// A record whose `last_occurred` does not parse is skipped with a log
/// entry; the rest of the batch proceeds.
pub fn samples_from_records(records: &[FlapRecord]) -> Vec<RemoteSample> {
    records
        .iter()
        .filter_map(|record| match RemoteSample::from_record(record) {
            Ok(sample) => Some(sample),
            Err(err) => {
                warn!(link_id = %record.link_id, error = %err, "skipping sample with unparseable timestamp");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(link: &str, last_occurred: &str) -> FlapRecord {
        FlapRecord {
            link_id: link.to_string(),
            node_description: format!("{}-near", link),
            partner_node_description: format!("{}-far", link),
            first_occurred: "1970-01-01 00:00:00".to_string(),
            last_occurred: last_occurred.to_string(),
            flap_count: 3,
        }
    }

    #[test]
    fn malformed_timestamp_skips_only_that_record() {
        let records = [
            record("L1", "1970-01-01 01:58:20"),
            record("L2", "yesterday-ish"),
            record("L3", "1970-01-01 02:00:00"),
        ];

        let samples = samples_from_records(&records);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].labels.get("link_id").unwrap(), "L1");
        assert_eq!(samples[0].timestamp_ms, 7_100_000);
        assert_eq!(samples[1].labels.get("link_id").unwrap(), "L3");
    }

    #[test]
    fn all_valid_records_convert() {
        let records = [
            record("L1", "2024-05-01 10:00:00"),
            record("L2", "2024-05-01 11:00:00"),
        ];
        assert_eq!(samples_from_records(&records).len(), 2);
    }
}
