//! Chunked remote-write client.

use flapwatch_types::RemoteSample;
use tracing::debug;

use crate::RemoteWriteError;

/// Failure of a single chunk push.
#[derive(Debug)]
pub struct ChunkFailure {
    /// Zero-based index of the failed chunk within the batch.
    pub index: usize,
    /// Number of samples the chunk carried.
    pub samples: usize,
    /// What went wrong.
    pub error: RemoteWriteError,
}

/// Outcome of one chunked push.
#[derive(Debug, Default)]
pub struct PushReport {
    /// Samples accepted by the endpoint.
    pub delivered: usize,
    /// Chunks the endpoint did not take.
    pub failures: Vec<ChunkFailure>,
}

impl PushReport {
    /// Whether every chunk was delivered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// HTTP client that pushes samples to a time-series write endpoint in
/// bounded-size chunks.
///
/// Each chunk is a separate JSON POST; a rejected chunk is recorded in
/// the [`PushReport`] and the remaining chunks are still attempted.
#[derive(Debug, Clone)]
pub struct RemoteWriter {
    endpoint: String,
    client: reqwest::Client,
    max_chunk_size: usize,
}

impl RemoteWriter {
    /// Create a writer for the endpoint at `host:port`.
    ///
    /// A `max_chunk_size` of zero is clamped to one.
    pub fn new(host: &str, port: u16, max_chunk_size: usize) -> Self {
        Self {
            endpoint: format!("http://{}:{}/api/v1/write", host, port),
            client: reqwest::Client::new(),
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    /// Full URL chunks are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Largest number of samples a single push carries.
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Push all samples in chunks of at most `max_chunk_size`.
    ///
    /// `M` samples produce `ceil(M / max_chunk_size)` requests, each
    /// covering a disjoint slice of the batch.
    pub async fn push(&self, samples: Vec<RemoteSample>) -> PushReport {
        let mut report = PushReport::default();

        for (index, chunk) in samples.chunks(self.max_chunk_size).enumerate() {
            match self.push_chunk(chunk).await {
                Ok(()) => report.delivered += chunk.len(),
                Err(error) => report.failures.push(ChunkFailure {
                    index,
                    samples: chunk.len(),
                    error,
                }),
            }
        }

        report
    }

    async fn push_chunk(&self, chunk: &[RemoteSample]) -> Result<(), RemoteWriteError> {
        debug!(samples = chunk.len(), endpoint = %self.endpoint, "pushing sample chunk");

        let response = self.client.post(&self.endpoint).json(chunk).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteWriteError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn sample(n: usize) -> RemoteSample {
        let mut labels = BTreeMap::new();
        labels.insert("link_id".to_string(), format!("L{}", n));
        RemoteSample {
            name: "link_flapping_counter".to_string(),
            timestamp_ms: 7_100_000,
            labels,
            value: n as u64,
        }
    }

    fn find_headers_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }

    /// Minimal HTTP/1.1 server answering one request per entry in
    /// `statuses`, counting requests as it goes.
    async fn serve(listener: TcpListener, statuses: Vec<u16>, hits: Arc<AtomicUsize>) {
        for status in statuses {
            let (mut sock, _) = listener.accept().await.unwrap();

            let mut buf = Vec::new();
            let mut tmp = [0u8; 4096];
            loop {
                let n = sock.read(&mut tmp).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&tmp[..n]);
                if let Some(pos) = find_headers_end(&buf) {
                    let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
                    let body_len = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= pos + 4 + body_len {
                        break;
                    }
                }
            }

            hits.fetch_add(1, Ordering::SeqCst);
            let resp = format!(
                "HTTP/1.1 {} X\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            let _ = sock.shutdown().await;
        }
    }

    async fn bound_writer(max_chunk_size: usize) -> (RemoteWriter, TcpListener) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (RemoteWriter::new("127.0.0.1", port, max_chunk_size), listener)
    }

    #[tokio::test]
    async fn pushes_ceil_m_over_k_chunks() {
        let (writer, listener) = bound_writer(4).await;
        let hits = Arc::new(AtomicUsize::new(0));
        let server = tokio::spawn(serve(listener, vec![200, 200, 200], hits.clone()));

        // 10 samples, chunk size 4 -> 3 requests covering all samples.
        let report = writer.push((0..10).map(sample).collect()).await;

        assert!(report.is_complete());
        assert_eq!(report.delivered, 10);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn failed_chunk_does_not_block_subsequent_chunks() {
        let (writer, listener) = bound_writer(4).await;
        let hits = Arc::new(AtomicUsize::new(0));
        let server = tokio::spawn(serve(listener, vec![500, 200, 200], hits.clone()));

        let report = writer.push((0..10).map(sample).collect()).await;

        // First chunk of 4 rejected; the trailing 4 + 2 still land.
        assert_eq!(report.delivered, 6);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 0);
        assert_eq!(report.failures[0].samples, 4);
        assert!(matches!(
            report.failures[0].error,
            RemoteWriteError::Rejected(500)
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_every_chunk_failed() {
        let (writer, listener) = bound_writer(2).await;
        drop(listener);

        let report = writer.push((0..4).map(sample).collect()).await;

        assert_eq!(report.delivered, 0);
        assert_eq!(report.failures.len(), 2);
    }

    #[tokio::test]
    async fn empty_batch_pushes_nothing() {
        let (writer, _listener) = bound_writer(4).await;
        let report = writer.push(Vec::new()).await;
        assert!(report.is_complete());
        assert_eq!(report.delivered, 0);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let writer = RemoteWriter::new("127.0.0.1", 9292, 0);
        assert_eq!(writer.max_chunk_size(), 1);
    }

    #[test]
    fn endpoint_is_built_from_host_and_port() {
        let writer = RemoteWriter::new("10.0.0.5", 9292, 100);
        assert_eq!(writer.endpoint(), "http://10.0.0.5:9292/api/v1/write");
    }
}
