//! Bulk ingestion of probe records from newline-delimited JSON.
//!
//! Each line holds one record tagged with its monitor:
//! `{"monitorId":"m1","region":"us","responseTime":120,"timestamp":1760000000000,"statusCode":200}`
//!
//! Malformed lines are logged and skipped. A store outage aborts the run,
//! since every following line would fail the same way.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use uptime::{MonitorRecord, ProbeStore, StoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestLine {
    monitor_id: String,
    #[serde(flatten)]
    record: MonitorRecord,
}

/// Outcome of an ingestion run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub accepted: u64,
    pub rejected: u64,
}

/// Ingest from a file, `-` reads standard input
pub async fn ingest_path(store: &dyn ProbeStore, path: &Path) -> Result<IngestSummary> {
    if path == Path::new("-") {
        return ingest_reader(store, BufReader::new(tokio::io::stdin())).await;
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    ingest_reader(store, BufReader::new(file)).await
}

pub async fn ingest_reader<R>(store: &dyn ProbeStore, mut reader: R) -> Result<IngestSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = IngestSummary::default();
    let mut buf = Vec::new();
    let mut line_no = 0u64;

    // Raw bytes, a line that is not UTF-8 is rejected like any other bad line
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let parsed: IngestLine = match serde_json::from_slice(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(line = line_no, "Rejected probe record: {}", e);
                summary.rejected += 1;
                continue;
            }
        };

        match store.append(&parsed.monitor_id, parsed.record).await {
            Ok(()) => summary.accepted += 1,
            Err(StoreError::InvalidRecord(e)) => {
                warn!(line = line_no, "Rejected probe record: {}", e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("storing line {}", line_no)),
        }
    }

    info!(accepted = summary.accepted, rejected = summary.rejected, "Ingestion finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uptime::{MemoryProbeStore, Region};

    #[tokio::test]
    async fn test_ingest_counts_valid_and_invalid_lines() -> Result<()> {
        let input = br#"{"monitorId":"m1","region":"us","responseTime":120,"timestamp":1000,"statusCode":200}

{"monitorId":"m1","region":"us","responseTime":-4,"timestamp":1001,"statusCode":200}
not json at all
{"monitorId":"m1","region":"mars","responseTime":1,"timestamp":1002,"statusCode":200}
{"monitorId":"","region":"us","responseTime":1,"timestamp":1003,"statusCode":200}
{"monitorId":"m2","region":"asia","responseTime":0,"timestamp":1004,"statusCode":null}
"#;
        let store = MemoryProbeStore::new();
        let summary = ingest_reader(&store, &input[..]).await?;

        assert_eq!(summary, IngestSummary { accepted: 2, rejected: 4 });
        assert_eq!(store.query("m1", Region::Us, 0, 2000).await?.len(), 1);

        let asia = store.query("m2", Region::Asia, 0, 2000).await?;
        assert_eq!(asia.len(), 1);
        assert_eq!(asia[0].status_code, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_ingest_skips_non_utf8_line() -> Result<()> {
        let mut input = Vec::new();
        input.extend_from_slice(
            br#"{"monitorId":"m1","region":"us","responseTime":10,"timestamp":1000,"statusCode":200}"#,
        );
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(
            br#"{"monitorId":"m1","region":"us","responseTime":20,"timestamp":2000,"statusCode":200}"#,
        );

        let store = MemoryProbeStore::new();
        let summary = ingest_reader(&store, &input[..]).await?;

        assert_eq!(summary, IngestSummary { accepted: 2, rejected: 1 });
        assert_eq!(store.query("m1", Region::Us, 0, 3000).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_ingest_missing_file() {
        let store = MemoryProbeStore::new();
        let result = ingest_path(&store, Path::new("/definitely/not/here.ndjson")).await;
        assert!(result.is_err());
    }
}
