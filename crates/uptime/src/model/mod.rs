//! Data model shared by the store and the aggregators.

pub mod metrics;
pub mod record;
pub mod region;

pub use metrics::{MonitorData, RegionMetrics};
pub use record::{InvalidRecord, MonitorRecord, ProbeStatus};
pub use region::{ParseRegionError, Region};
