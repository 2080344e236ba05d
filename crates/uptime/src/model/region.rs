use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Geographic origin of a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Asia,
    Europe,
    Us,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown region '{0}' (expected one of: asia, europe, us, auto)")]
pub struct ParseRegionError(pub String);

impl Region {
    /// Every region, in declaration order
    pub const ALL: [Region; 4] = [Region::Asia, Region::Europe, Region::Us, Region::Auto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Asia => "asia",
            Region::Europe => "europe",
            Region::Us => "us",
            Region::Auto => "auto",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asia" => Ok(Region::Asia),
            "europe" => Ok(Region::Europe),
            "us" => Ok(Region::Us),
            "auto" => Ok(Region::Auto),
            _ => Err(ParseRegionError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("US".parse::<Region>().unwrap(), Region::Us);
        assert_eq!(" europe ".parse::<Region>().unwrap(), Region::Europe);
        assert!("mars".parse::<Region>().is_err());
    }

    #[test]
    fn test_display_matches_serde_name() {
        for region in Region::ALL {
            let json = serde_json::to_string(&region).unwrap();
            assert_eq!(json, format!("\"{}\"", region));
        }
    }
}
