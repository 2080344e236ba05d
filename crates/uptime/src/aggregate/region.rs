use std::sync::Arc;
use tracing::debug;

use super::config::{AcceptedStatusCodes, AggregationConfig};
use crate::model::{MonitorRecord, ProbeStatus, Region, RegionMetrics};
use crate::store::{ProbeStore, StoreError};
use crate::{WINDOW_24H_MS, WINDOW_30D_MS};

/// Metrics of one series plus how many probes the long window held
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RegionSummary {
    pub metrics: RegionMetrics,
    pub probes_30d: usize,
}

/// Computes rolling metrics for one monitor in one region
#[derive(Clone)]
pub struct RegionAggregator {
    store: Arc<dyn ProbeStore>,
    config: Arc<AggregationConfig>,
}

impl RegionAggregator {
    pub fn new(store: Arc<dyn ProbeStore>, config: AggregationConfig) -> Self {
        Self { store, config: Arc::new(config) }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ProbeStore> {
        &self.store
    }

    /// Metrics of `monitor_id` in `region` as of `now` (epoch ms)
    pub async fn compute(
        &self,
        monitor_id: &str,
        region: Region,
        now: i64,
    ) -> Result<RegionMetrics, StoreError> {
        Ok(self.summarize(monitor_id, region, now).await?.metrics)
    }

    pub(crate) async fn summarize(
        &self,
        monitor_id: &str,
        region: Region,
        now: i64,
    ) -> Result<RegionSummary, StoreError> {
        // One read of the long window; `now` itself is part of every window
        let records = self
            .store
            .query(monitor_id, region, now.saturating_sub(WINDOW_30D_MS), now.saturating_add(1))
            .await?;

        let summary = summarize(&records, now, &self.config);
        debug!(
            monitor_id,
            %region,
            probes_30d = summary.probes_30d,
            uptime_24h = summary.metrics.uptime_24h,
            "Computed region metrics"
        );
        Ok(summary)
    }
}

/// Reduce the records of `[now - 30d, now]`, oldest first, into metrics
pub(crate) fn summarize(
    records: &[MonitorRecord],
    now: i64,
    config: &AggregationConfig,
) -> RegionSummary {
    let accepted = &config.accepted_status_codes;

    let day_start = records.partition_point(|r| r.timestamp < now.saturating_sub(WINDOW_24H_MS));
    let last_day = &records[day_start..];

    let fresh_since = now.saturating_sub(config.freshness_window_ms());
    let fresh_start = records.partition_point(|r| r.timestamp < fresh_since);
    let current_response_time = records[fresh_start..]
        .iter()
        .rev()
        .find(|r| accepted.classify(r.status_code) == ProbeStatus::Up)
        .map(|r| r.response_time);

    let metrics = RegionMetrics {
        current_response_time,
        avg_response_time_24h: mean_up_response_time(last_day, accepted),
        uptime_24h: uptime_ratio(last_day, accepted),
        uptime_30_days: uptime_ratio(records, accepted),
    };

    RegionSummary { metrics, probes_30d: records.len() }
}

/// `1.0` for an empty window: no probes means no evidence of downtime
fn uptime_ratio(records: &[MonitorRecord], accepted: &AcceptedStatusCodes) -> f64 {
    if records.is_empty() {
        return 1.0;
    }
    let up = records.iter().filter(|r| accepted.classify(r.status_code) == ProbeStatus::Up).count();
    up as f64 / records.len() as f64
}

/// `0.0` when no probe in the window was up
fn mean_up_response_time(records: &[MonitorRecord], accepted: &AcceptedStatusCodes) -> f64 {
    let (sum, count) = records
        .iter()
        .filter(|r| accepted.classify(r.status_code) == ProbeStatus::Up)
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.response_time, count + 1));

    if count == 0 { 0.0 } else { sum / count as f64 }
}
