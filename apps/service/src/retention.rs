//! Automatic retention and cleanup of probe records.
//!
//! Records older than the retention window are deleted periodically by a
//! background task. The window never drops below 30 days, otherwise the
//! 30 day uptime ratio would silently shrink.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uptime::{DAY_MS, ProbeStore};

/// Retention policy for probe records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    /// Days to keep probe records
    pub days: u32,
    /// Seconds between two cleanup passes
    pub cleanup_interval_seconds: u64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { days: 30, cleanup_interval_seconds: 3600 }
    }
}

impl RetentionPolicy {
    /// Get retention duration in milliseconds
    fn retention_ms(&self) -> i64 {
        i64::from(self.days) * DAY_MS
    }

    /// Oldest timestamp still kept at `now`
    pub fn cutoff(&self, now: i64) -> i64 {
        now.saturating_sub(self.retention_ms())
    }
}

/// Cleanup manager for expired probe records
pub struct RetentionCleanup {
    store: Arc<dyn ProbeStore>,
    policy: RetentionPolicy,
}

impl RetentionCleanup {
    /// Create a new retention cleanup manager
    pub fn new(store: Arc<dyn ProbeStore>, policy: RetentionPolicy) -> Self {
        Self { store, policy }
    }

    /// Delete every record that fell out of the retention window at `now`
    pub async fn cleanup_expired_records(&self, now: i64) -> Result<u64> {
        let cutoff = self.policy.cutoff(now);
        debug!(cutoff, days = self.policy.days, "Starting retention cleanup");

        let removed = self.store.purge_before(cutoff).await?;

        info!(removed, "Retention cleanup completed");
        Ok(removed)
    }

    /// Start background cleanup task
    pub fn start_periodic_cleanup(self) -> tokio::task::JoinHandle<()> {
        let period = std::time::Duration::from_secs(self.policy.cleanup_interval_seconds);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            loop {
                interval.tick().await;

                if let Err(e) = self.cleanup_expired_records(uptime::now_millis()).await {
                    warn!("Periodic retention cleanup failed: {:#}", e);
                }
            }
        })
    }
}
