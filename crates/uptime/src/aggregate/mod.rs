//! Aggregation of probe records into rolling metrics.
//!
//! - `RegionAggregator` reduces one series (monitor, region) to `RegionMetrics`
//! - `MonitorAggregator` fans out over regions and merges into `MonitorData`
//! - `AggregationConfig` carries the accepted status codes, region list,
//!   freshness window and empty-region policy

pub mod config;
pub mod monitor;
pub mod region;

pub use config::{
    AcceptedStatusCodes, AggregationConfig, ConfigError, EmptyRegionPolicy, StatusCodeRange,
};
pub use monitor::MonitorAggregator;
pub use region::RegionAggregator;
