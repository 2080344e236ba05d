use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::region::Region;

/// Classification of a probe against the accepted status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "up"),
            ProbeStatus::Down => write!(f, "down"),
        }
    }
}

/// Probe data rejected at ingestion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid record: {reason}")]
pub struct InvalidRecord {
    pub reason: String,
}

impl InvalidRecord {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Result of a single probe of a monitored endpoint
///
/// Records are immutable once stored. Deserialization goes through the same
/// validation as [`MonitorRecord::new`], so a record obtained from JSON is
/// always well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMonitorRecord")]
pub struct MonitorRecord {
    /// Region the probe was sent from
    pub region: Region,

    /// Response time in milliseconds
    pub response_time: f64,

    /// When the probe ran, epoch milliseconds
    pub timestamp: i64,

    /// HTTP status code, `None` when the probe failed at the transport level
    pub status_code: Option<u16>,
}

impl MonitorRecord {
    /// Create a validated record
    pub fn new(
        region: Region,
        response_time: f64,
        timestamp: i64,
        status_code: Option<u16>,
    ) -> Result<Self, InvalidRecord> {
        let record = Self { region, response_time, timestamp, status_code };
        record.validate()?;
        Ok(record)
    }

    /// Check the invariants a stored record must hold
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if !self.response_time.is_finite() {
            return Err(InvalidRecord::new("responseTime must be a finite number"));
        }
        if self.response_time < 0.0 {
            return Err(InvalidRecord::new(format!(
                "responseTime must not be negative (got {})",
                self.response_time
            )));
        }
        Ok(())
    }
}

/// Wire form of a record, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMonitorRecord {
    region: Region,
    response_time: f64,
    timestamp: f64,
    #[serde(default)]
    status_code: Option<u16>,
}

impl TryFrom<RawMonitorRecord> for MonitorRecord {
    type Error = InvalidRecord;

    fn try_from(raw: RawMonitorRecord) -> Result<Self, Self::Error> {
        let timestamp = timestamp_from_f64(raw.timestamp)?;
        MonitorRecord::new(raw.region, raw.response_time, timestamp, raw.status_code)
    }
}

fn timestamp_from_f64(value: f64) -> Result<i64, InvalidRecord> {
    if !value.is_finite() {
        return Err(InvalidRecord::new("timestamp must be a finite number"));
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(InvalidRecord::new(format!(
            "timestamp {} is not representable as epoch milliseconds",
            value
        )));
    }
    Ok(value.floor() as i64)
}
