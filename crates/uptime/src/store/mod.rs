//! Probe record storage abstraction.
//!
//! A store is an append-only log of probe records, partitioned per monitor
//! and region and ordered by timestamp. Every read is range-scoped so the
//! cost of aggregation is bounded by the lookback window, not by how much
//! history the store holds.

pub mod memory;

pub use memory::MemoryProbeStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{InvalidRecord, MonitorRecord, Region};

/// Longest accepted monitor identifier
pub const MAX_MONITOR_ID_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed probe data, never retried
    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecord),

    /// The backing storage could not serve the request
    #[error("probe store unavailable: {0:#}")]
    Unavailable(anyhow::Error),
}

impl StoreError {
    pub fn unavailable(error: impl Into<anyhow::Error>) -> Self {
        StoreError::Unavailable(error.into())
    }
}

/// Trait for probe record storage backends
///
/// Implementations must make an `append` visible to every `query` issued
/// after it returns.
#[async_trait]
pub trait ProbeStore: Send + Sync {
    /// Durably store a record. Duplicate timestamps are kept.
    async fn append(&self, monitor_id: &str, record: MonitorRecord) -> Result<(), StoreError>;

    /// Records of one series with `from <= timestamp < to`, oldest first.
    /// Records sharing a timestamp keep their ingestion order.
    async fn query(
        &self,
        monitor_id: &str,
        region: Region,
        from: i64,
        to: i64,
    ) -> Result<Vec<MonitorRecord>, StoreError>;

    /// Newest record of one series with `timestamp <= at`
    async fn latest(
        &self,
        monitor_id: &str,
        region: Region,
        at: i64,
    ) -> Result<Option<MonitorRecord>, StoreError>;

    /// Delete every record older than `cutoff`, returning how many were removed
    async fn purge_before(&self, cutoff: i64) -> Result<u64, StoreError>;
}

/// Validate a monitor identifier before it is used as a storage key
pub fn validate_monitor_id(monitor_id: &str) -> Result<(), InvalidRecord> {
    if monitor_id.trim().is_empty() {
        return Err(InvalidRecord::new("monitor id must not be empty"));
    }
    if monitor_id.len() > MAX_MONITOR_ID_LEN {
        return Err(InvalidRecord::new(format!(
            "monitor id longer than {} bytes",
            MAX_MONITOR_ID_LEN
        )));
    }
    if monitor_id.chars().any(char::is_control) {
        return Err(InvalidRecord::new("monitor id contains control characters"));
    }
    Ok(())
}
