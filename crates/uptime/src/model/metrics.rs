use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::region::Region;

/// Rolling reliability metrics of one monitor in one region
///
/// Field names on the wire match the dashboard's `RegionMetrics` shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    /// Response time of the latest up probe inside the freshness window,
    /// `None` when the window holds no up probe
    #[serde(rename = "currentResponseTime")]
    pub current_response_time: Option<f64>,

    /// Mean response time of up probes over the trailing 24 hours, `0` when there are none
    #[serde(rename = "avgResponseTime24H")]
    pub avg_response_time_24h: f64,

    /// Fraction of up probes over the trailing 24 hours, `1.0` without probes
    #[serde(rename = "uptime24H")]
    pub uptime_24h: f64,

    /// Fraction of up probes over the trailing 30 days, `1.0` without probes
    #[serde(rename = "uptime30Days")]
    pub uptime_30_days: f64,
}

impl RegionMetrics {
    /// Metrics reported when a window holds no probes at all
    pub const fn no_data() -> Self {
        Self {
            current_response_time: None,
            avg_response_time_24h: 0.0,
            uptime_24h: 1.0,
            uptime_30_days: 1.0,
        }
    }
}

impl Default for RegionMetrics {
    fn default() -> Self {
        Self::no_data()
    }
}

/// Per-region metrics of a monitor
pub type MonitorData = BTreeMap<Region, RegionMetrics>;
