use async_trait::async_trait;
use libsql::{Row, params};
use uptime::{MonitorRecord, ProbeStore, Region, StoreError, validate_monitor_id};

use crate::pool::{LibsqlManager, LibsqlPool};

const SELECT_COLUMNS: &str = "region, response_time, timestamp, status_code";

/// Probe store backed by the `probe_records` table
pub struct LibsqlProbeStore {
    pool: LibsqlPool,
}

impl LibsqlProbeStore {
    /// Create a new store from a pool with migrations applied
    pub fn new_from_pool(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool
    async fn get_conn(&self) -> Result<deadpool::managed::Object<LibsqlManager>, StoreError> {
        self.pool.get().await.map_err(|e| StoreError::unavailable(anyhow::anyhow!("{}", e)))
    }
}

fn record_from_row(row: &Row) -> Result<MonitorRecord, StoreError> {
    let region: String = row.get(0).map_err(StoreError::unavailable)?;
    let region: Region = region.parse().map_err(StoreError::unavailable)?;

    Ok(MonitorRecord {
        region,
        response_time: row.get::<f64>(1).map_err(StoreError::unavailable)?,
        timestamp: row.get::<i64>(2).map_err(StoreError::unavailable)?,
        status_code: row
            .get::<Option<i64>>(3)
            .map_err(StoreError::unavailable)?
            .map(u16::try_from)
            .transpose()
            .map_err(StoreError::unavailable)?,
    })
}

#[async_trait]
impl ProbeStore for LibsqlProbeStore {
    async fn append(&self, monitor_id: &str, record: MonitorRecord) -> Result<(), StoreError> {
        validate_monitor_id(monitor_id)?;
        record.validate()?;

        let conn = self.get_conn().await?;
        let created_at = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO probe_records (monitor_id, region, timestamp, response_time, status_code, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                monitor_id.to_string(),
                record.region.to_string(),
                record.timestamp,
                record.response_time,
                record.status_code.map(i64::from),
                created_at
            ],
        )
        .await
        .map_err(StoreError::unavailable)?;

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

        let conn = self.get_conn().await?;
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM probe_records WHERE monitor_id = ? AND region = ? AND timestamp >= ? AND timestamp < ? ORDER BY timestamp ASC, id ASC"
        );
        let mut rows = conn
            .query(&sql, params![monitor_id.to_string(), region.to_string(), from, to])
            .await
            .map_err(StoreError::unavailable)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await.map_err(StoreError::unavailable)? {
            records.push(record_from_row(&row)?);
        }

        Ok(records)
    }

    async fn latest(
        &self,
        monitor_id: &str,
        region: Region,
        at: i64,
    ) -> Result<Option<MonitorRecord>, StoreError> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM probe_records WHERE monitor_id = ? AND region = ? AND timestamp <= ? ORDER BY timestamp DESC, id DESC LIMIT 1"
        );
        let mut rows = conn
            .query(&sql, params![monitor_id.to_string(), region.to_string(), at])
            .await
            .map_err(StoreError::unavailable)?;

        match rows.next().await.map_err(StoreError::unavailable)? {
            Some(row) => Ok(Some(record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn purge_before(&self, cutoff: i64) -> Result<u64, StoreError> {
        let conn = self.get_conn().await?;

        // Indexed on timestamp, the delete never scans retained rows
        conn.execute("DELETE FROM probe_records WHERE timestamp < ?", params![cutoff])
            .await
            .map_err(StoreError::unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::open_pool;
    use anyhow::Result;
    use std::sync::Arc;
    use tempfile::TempDir;
    use uptime::{AggregationConfig, DAY_MS, HOUR_MS, MonitorAggregator};

    const NOW: i64 = 1_760_000_000_000;

    /// Helper to create a store on a fresh on-disk database
    ///
    /// The returned directory must outlive the store.
    async fn create_test_store() -> Result<(LibsqlProbeStore, TempDir)> {
        let temp_dir = tempfile::tempdir()?;
        let config = DatabaseConfig {
            path: temp_dir.path().join("test.db").to_string_lossy().to_string(),
            max_connections: 4,
        };
        let pool = open_pool(&config).await?;
        Ok((LibsqlProbeStore::new_from_pool(pool), temp_dir))
    }

    fn probe(
        region: Region,
        timestamp: i64,
        response_time: f64,
        status: Option<u16>,
    ) -> MonitorRecord {
        MonitorRecord::new(region, response_time, timestamp, status).unwrap()
    }

    #[tokio::test]
    async fn test_append_and_query_roundtrip() -> Result<()> {
        let (store, _dir) = create_test_store().await?;
        store.append("m1", probe(Region::Us, 200, 12.5, Some(200))).await?;
        store.append("m1", probe(Region::Us, 100, 0.0, None)).await?;
        store.append("m1", probe(Region::Asia, 150, 1.0, Some(200))).await?;

        let records = store.query("m1", Region::Us, 0, 1000).await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, 100);
        assert_eq!(records[0].status_code, None);
        assert_eq!(records[1].response_time, 12.5);
        assert_eq!(records[1].status_code, Some(200));
        Ok(())
    }

    #[tokio::test]
    async fn test_query_bounds_and_duplicates() -> Result<()> {
        let (store, _dir) = create_test_store().await?;
        store.append("m1", probe(Region::Europe, 100, 1.0, Some(500))).await?;
        store.append("m1", probe(Region::Europe, 100, 2.0, Some(200))).await?;
        store.append("m1", probe(Region::Europe, 200, 3.0, Some(200))).await?;

        let records = store.query("m1", Region::Europe, 100, 200).await?;
        let times: Vec<f64> = records.iter().map(|r| r.response_time).collect();
        assert_eq!(times, vec![1.0, 2.0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_and_purge() -> Result<()> {
        let (store, _dir) = create_test_store().await?;
        for ts in [100, 200, 300] {
            store.append("m1", probe(Region::Auto, ts, 5.0, Some(200))).await?;
        }

        assert_eq!(store.latest("m1", Region::Auto, 250).await?.map(|r| r.timestamp), Some(200));
        assert_eq!(store.latest("m1", Region::Auto, 50).await?, None);

        assert_eq!(store.purge_before(250).await?, 2);
        assert_eq!(store.query("m1", Region::Auto, 0, 1000).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_record_not_stored() -> Result<()> {
        let (store, _dir) = create_test_store().await?;
        let bad = MonitorRecord {
            region: Region::Us,
            response_time: -1.0,
            timestamp: 1,
            status_code: Some(200),
        };

        let result = store.append("m1", bad).await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
        assert!(store.query("m1", Region::Us, 0, 10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_status_code_is_an_error() -> Result<()> {
        let (store, _dir) = create_test_store().await?;
        let conn = store.get_conn().await?;
        conn.execute(
            "INSERT INTO probe_records (monitor_id, region, timestamp, response_time, status_code, created_at) VALUES ('m1', 'us', 10, 1.0, 70000, 0)",
            (),
        )
        .await?;
        drop(conn);

        let result = store.query("m1", Region::Us, 0, 100).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_aggregation_over_libsql() -> Result<()> {
        let (store, _dir) = create_test_store().await?;
        for i in 0..10 {
            let status = if i < 8 { 200 } else { 500 };
            let timestamp = NOW - (i + 1) * HOUR_MS;
            store.append("m1", probe(Region::Us, timestamp, 100.0, Some(status))).await?;
        }
        store.append("m1", probe(Region::Us, NOW - 10 * DAY_MS, 100.0, Some(500))).await?;

        let aggregator = MonitorAggregator::new(Arc::new(store), AggregationConfig::default());
        let data = aggregator.compute("m1", &[Region::Us, Region::Asia], NOW).await?;

        let us = data[&Region::Us];
        assert!((us.uptime_24h - 0.8).abs() < 1e-9);
        assert!((us.uptime_30_days - 8.0 / 11.0).abs() < 1e-9);
        assert_eq!(us.current_response_time, Some(100.0));
        assert_eq!(data[&Region::Asia].uptime_30_days, 1.0);
        Ok(())
    }
}
