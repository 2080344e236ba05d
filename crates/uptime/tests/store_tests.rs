//! Probe store contract tests against the in-memory store

use uptime::{MemoryProbeStore, MonitorRecord, ProbeStore, Region, StoreError};

fn probe(timestamp: i64) -> MonitorRecord {
    MonitorRecord::new(Region::Europe, 25.0, timestamp, Some(200)).unwrap()
}

#[tokio::test]
async fn test_query_is_half_open() {
    let store = MemoryProbeStore::new();
    for ts in [100, 200, 300] {
        store.append("m1", probe(ts)).await.unwrap();
    }

    let records = store.query("m1", Region::Europe, 100, 300).await.unwrap();
    let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
    assert_eq!(timestamps, vec![100, 200]);
}

#[tokio::test]
async fn test_query_other_region_is_empty() {
    let store = MemoryProbeStore::new();
    store.append("m1", probe(100)).await.unwrap();

    assert!(store.query("m1", Region::Us, 0, 1000).await.unwrap().is_empty());
    assert!(store.query("m2", Region::Europe, 0, 1000).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_your_writes() {
    let store = MemoryProbeStore::new();
    assert!(store.is_empty().await);

    store.append("m1", probe(100)).await.unwrap();
    assert_eq!(store.query("m1", Region::Europe, 100, 101).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_latest_respects_bound() {
    let store = MemoryProbeStore::new();
    for ts in [100, 200, 300] {
        store.append("m1", probe(ts)).await.unwrap();
    }

    let latest = store.latest("m1", Region::Europe, 250).await.unwrap();
    assert_eq!(latest.map(|r| r.timestamp), Some(200));
    let latest = store.latest("m1", Region::Europe, 300).await.unwrap();
    assert_eq!(latest.map(|r| r.timestamp), Some(300));
    assert_eq!(store.latest("m1", Region::Europe, 99).await.unwrap(), None);
}

#[tokio::test]
async fn test_invalid_records_rejected() {
    let store = MemoryProbeStore::new();

    let negative = MonitorRecord {
        region: Region::Us,
        response_time: -3.0,
        timestamp: 1,
        status_code: Some(200),
    };
    assert!(matches!(store.append("m1", negative).await, Err(StoreError::InvalidRecord(_))));

    assert!(matches!(store.append("", probe(1)).await, Err(StoreError::InvalidRecord(_))));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_purge_before_cutoff() {
    let store = MemoryProbeStore::new();
    for ts in [100, 200, 300] {
        store.append("m1", probe(ts)).await.unwrap();
    }
    store.append("m2", probe(150)).await.unwrap();

    let removed = store.purge_before(200).await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.len().await, 2);

    let remaining = store.query("m1", Region::Europe, 0, 1000).await.unwrap();
    assert_eq!(remaining.first().map(|r| r.timestamp), Some(200));
}
