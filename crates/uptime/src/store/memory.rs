use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{validate_monitor_id, ProbeStore, StoreError};
use crate::model::{MonitorRecord, Region};

type SeriesKey = (String, Region);

/// In-memory store, each series kept sorted by timestamp
///
/// Range reads binary-search the series, so they never scan records outside
/// the requested window. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryProbeStore {
    series: RwLock<HashMap<SeriesKey, Vec<MonitorRecord>>>,
}

impl MemoryProbeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records across all series
    pub async fn len(&self) -> usize {
        self.series.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProbeStore for MemoryProbeStore {
    async fn append(&self, monitor_id: &str, record: MonitorRecord) -> Result<(), StoreError> {
        validate_monitor_id(monitor_id)?;
        record.validate()?;

        let mut series = self.series.write().await;
        let records = series.entry((monitor_id.to_string(), record.region)).or_default();

        // Insert after any record with an equal timestamp to keep ingestion order
        let idx = records.partition_point(|r| r.timestamp <= record.timestamp);
        records.insert(idx, record);
        Ok(())
    }

    async fn query(
        &self,
        monitor_id: &str,
        region: Region,
        from: i64,
        to: i64,
    ) -> Result<Vec<MonitorRecord>, StoreError> {
        if from >= to {
            return Ok(Vec::new());
        }

        let series = self.series.read().await;
        let Some(records) = series.get(&(monitor_id.to_string(), region)) else {
            return Ok(Vec::new());
        };

        let start = records.partition_point(|r| r.timestamp < from);
        let end = records.partition_point(|r| r.timestamp < to);
        Ok(records[start..end].to_vec())
    }

    async fn latest(
        &self,
        monitor_id: &str,
        region: Region,
        at: i64,
    ) -> Result<Option<MonitorRecord>, StoreError> {
        let series = self.series.read().await;
        let Some(records) = series.get(&(monitor_id.to_string(), region)) else {
            return Ok(None);
        };

        let end = records.partition_point(|r| r.timestamp <= at);
        Ok(end.checked_sub(1).map(|idx| records[idx].clone()))
    }

    async fn purge_before(&self, cutoff: i64) -> Result<u64, StoreError> {
        let mut series = self.series.write().await;
        let mut removed = 0u64;

        for records in series.values_mut() {
            let split = records.partition_point(|r| r.timestamp < cutoff);
            records.drain(..split);
            removed += split as u64;
        }
        series.retain(|_, records| !records.is_empty());

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: Region, timestamp: i64, response_time: f64) -> MonitorRecord {
        MonitorRecord::new(region, response_time, timestamp, Some(200)).unwrap()
    }

    #[tokio::test]
    async fn test_out_of_order_appends_are_sorted() {
        let store = MemoryProbeStore::new();
        for ts in [30, 10, 20] {
            store.append("m1", record(Region::Us, ts, ts as f64)).await.unwrap();
        }

        let records = store.query("m1", Region::Us, 0, 100).await.unwrap();
        let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_ingestion_order() {
        let store = MemoryProbeStore::new();
        store.append("m1", record(Region::Us, 10, 1.0)).await.unwrap();
        store.append("m1", record(Region::Us, 10, 2.0)).await.unwrap();

        let records = store.query("m1", Region::Us, 10, 11).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].response_time, 1.0);
        assert_eq!(records[1].response_time, 2.0);
    }

    #[tokio::test]
    async fn test_empty_range() {
        let store = MemoryProbeStore::new();
        store.append("m1", record(Region::Us, 10, 1.0)).await.unwrap();

        assert!(store.query("m1", Region::Us, 20, 10).await.unwrap().is_empty());
        assert!(store.query("m1", Region::Us, 10, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_drops_empty_series() {
        let store = MemoryProbeStore::new();
        store.append("m1", record(Region::Us, 10, 1.0)).await.unwrap();
        store.append("m1", record(Region::Asia, 50, 1.0)).await.unwrap();

        assert_eq!(store.purge_before(20).await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.series.read().await.len(), 1);
    }
}
