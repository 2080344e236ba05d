use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{ProbeStatus, Region};

/// Longest freshness window accepted for the current response time
const MAX_FRESHNESS_SECONDS: u64 = 24 * 3600;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid status code range '{0}' (expected e.g. \"200-299\" or \"204\")")]
    InvalidStatusRange(String),

    #[error("at least one accepted status code range is required")]
    NoAcceptedStatusCodes,

    #[error("at least one region is required")]
    NoRegions,

    #[error("freshness window must be between 1 and {max} seconds (got {got})")]
    FreshnessOutOfRange { got: u64, max: u64 },
}

/// Inclusive range of HTTP status codes, written `"200-299"` or `"204"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusCodeRange {
    start: u16,
    end: u16,
}

impl StatusCodeRange {
    pub fn new(start: u16, end: u16) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidStatusRange(format!("{}-{}", start, end)));
        }
        Ok(Self { start, end })
    }

    pub fn single(code: u16) -> Self {
        Self { start: code, end: code }
    }

    pub fn contains(&self, code: u16) -> bool {
        (self.start..=self.end).contains(&code)
    }
}

impl fmt::Display for StatusCodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for StatusCodeRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidStatusRange(s.to_string());
        let parse = |part: &str| part.trim().parse::<u16>().map_err(|_| invalid());

        match s.split_once('-') {
            Some((start, end)) => StatusCodeRange::new(parse(start)?, parse(end)?),
            None => Ok(StatusCodeRange::single(parse(s)?)),
        }
    }
}

impl TryFrom<String> for StatusCodeRange {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusCodeRange> for String {
    fn from(range: StatusCodeRange) -> Self {
        range.to_string()
    }
}

/// Status codes that classify a probe as up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcceptedStatusCodes(Vec<StatusCodeRange>);

impl AcceptedStatusCodes {
    pub fn new(ranges: Vec<StatusCodeRange>) -> Result<Self, ConfigError> {
        if ranges.is_empty() {
            return Err(ConfigError::NoAcceptedStatusCodes);
        }
        Ok(Self(ranges))
    }

    pub fn ranges(&self) -> &[StatusCodeRange] {
        &self.0
    }

    pub fn contains(&self, code: u16) -> bool {
        self.0.iter().any(|range| range.contains(code))
    }

    /// Transport failures carry no status code and are always down
    pub fn classify(&self, status_code: Option<u16>) -> ProbeStatus {
        match status_code {
            Some(code) if self.contains(code) => ProbeStatus::Up,
            _ => ProbeStatus::Down,
        }
    }
}

impl Default for AcceptedStatusCodes {
    /// 2xx and 3xx
    fn default() -> Self {
        Self(vec![StatusCodeRange { start: 200, end: 399 }])
    }
}

impl fmt::Display for AcceptedStatusCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&ranges.join(", "))
    }
}

/// Whether regions without any stored probe appear in `MonitorData`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyRegionPolicy {
    /// Report them with the no-data defaults
    #[default]
    Report,
    /// Leave them out of the map
    Omit,
}

impl fmt::Display for EmptyRegionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyRegionPolicy::Report => write!(f, "report"),
            EmptyRegionPolicy::Omit => write!(f, "omit"),
        }
    }
}

/// Aggregation settings, always handed to the aggregators explicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Regions computed when a caller does not name any
    pub regions: Vec<Region>,

    pub accepted_status_codes: AcceptedStatusCodes,

    /// How far back the current response time may look
    pub freshness_seconds: u64,

    pub empty_region_policy: EmptyRegionPolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            regions: Region::ALL.to_vec(),
            accepted_status_codes: AcceptedStatusCodes::default(),
            freshness_seconds: 3600,
            empty_region_policy: EmptyRegionPolicy::Report,
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        if self.accepted_status_codes.ranges().is_empty() {
            return Err(ConfigError::NoAcceptedStatusCodes);
        }
        if self.freshness_seconds == 0 || self.freshness_seconds > MAX_FRESHNESS_SECONDS {
            return Err(ConfigError::FreshnessOutOfRange {
                got: self.freshness_seconds,
                max: MAX_FRESHNESS_SECONDS,
            });
        }
        Ok(())
    }

    /// Saturates instead of overflowing for configs that skipped `validate`
    pub fn freshness_window_ms(&self) -> i64 {
        i64::try_from(self.freshness_seconds)
            .ok()
            .and_then(|seconds| seconds.checked_mul(1000))
            .unwrap_or(i64::MAX)
    }
}
