use futures::future::try_join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use super::config::{AggregationConfig, EmptyRegionPolicy};
use super::region::RegionAggregator;
use crate::model::{MonitorData, Region, RegionMetrics};
use crate::store::{ProbeStore, StoreError};

/// Merges per-region metrics of a monitor into `MonitorData`
///
/// Stateless: every call recomputes from the store, so concurrent calls
/// need no coordination.
#[derive(Clone)]
pub struct MonitorAggregator {
    regions: RegionAggregator,
}

impl MonitorAggregator {
    pub fn new(store: Arc<dyn ProbeStore>, config: AggregationConfig) -> Self {
        Self { regions: RegionAggregator::new(store, config) }
    }

    pub fn from_region_aggregator(regions: RegionAggregator) -> Self {
        Self { regions }
    }

    pub fn region_aggregator(&self) -> &RegionAggregator {
        &self.regions
    }

    pub fn config(&self) -> &AggregationConfig {
        self.regions.config()
    }

    /// Metrics for every region in `regions`, computed concurrently
    ///
    /// Fails as a whole if any region cannot be computed.
    pub async fn compute(
        &self,
        monitor_id: &str,
        regions: &[Region],
        now: i64,
    ) -> Result<MonitorData, StoreError> {
        let unique: BTreeSet<Region> = regions.iter().copied().collect();
        let computed = try_join_all(
            unique.into_iter().map(|region| self.compute_region(monitor_id, region, now)),
        )
        .await?;

        let data: MonitorData = computed.into_iter().flatten().collect();
        debug!(monitor_id, regions = data.len(), "Computed monitor data");
        Ok(data)
    }

    /// Metrics for the configured default regions
    pub async fn compute_configured(
        &self,
        monitor_id: &str,
        now: i64,
    ) -> Result<MonitorData, StoreError> {
        self.compute(monitor_id, &self.config().regions, now).await
    }

    async fn compute_region(
        &self,
        monitor_id: &str,
        region: Region,
        now: i64,
    ) -> Result<Option<(Region, RegionMetrics)>, StoreError> {
        let summary = self.regions.summarize(monitor_id, region, now).await?;

        if summary.probes_30d == 0 && self.config().empty_region_policy == EmptyRegionPolicy::Omit {
            // Older probes may still count as history
            let history = self.regions.store().latest(monitor_id, region, now).await?;
            if history.is_none() {
                return Ok(None);
            }
        }

        Ok(Some((region, summary.metrics)))
    }
}
