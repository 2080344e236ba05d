//! Uptime - rolling reliability metrics for monitored targets
//!
//! This library turns a stream of per-region probe records into the
//! metrics a dashboard shows for a monitor: current and average response
//! time, plus 24 hour and 30 day uptime ratios for every probing region.

pub mod aggregate;
pub mod model;
pub mod store;

// Re-export main types
pub use aggregate::{
    AcceptedStatusCodes, AggregationConfig, ConfigError, EmptyRegionPolicy, MonitorAggregator,
    RegionAggregator, StatusCodeRange,
};
pub use model::{
    InvalidRecord, MonitorData, MonitorRecord, ParseRegionError, ProbeStatus, Region,
    RegionMetrics,
};
pub use store::{validate_monitor_id, MemoryProbeStore, ProbeStore, StoreError};

/// One hour in milliseconds
pub const HOUR_MS: i64 = 3_600_000;

/// One day in milliseconds
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Lookback of the short uptime window and of the average response time
pub const WINDOW_24H_MS: i64 = DAY_MS;

/// Lookback of the long uptime window
pub const WINDOW_30D_MS: i64 = 30 * DAY_MS;

/// Records must be kept at least this long for the 30 day ratio to be meaningful
pub const MIN_RETENTION_DAYS: u32 = 30;

/// Current wall-clock time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
