//! Aggregation granularity definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time unit of an aggregation granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GranularityUnit {
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Days.
    Day,
}

impl GranularityUnit {
    /// Returns the unit duration in milliseconds.
    #[must_use]
    pub const fn millis(&self) -> i64 {
        match self {
            Self::Second => 1_000,
            Self::Minute => 60_000,
            Self::Hour => 3_600_000,
            Self::Day => 86_400_000,
        }
    }

    /// Returns the single-letter wire suffix.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "m",
            Self::Hour => "h",
            Self::Day => "d",
        }
    }
}

/// Aggregation period controlling how raw samples are bucketed into
/// aggregate datapoints, e.g. `"1s"`, `"10m"`, `"1d"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Granularity {
    count: u32,
    unit: GranularityUnit,
}

impl Granularity {
    /// Creates a granularity of `count` units.
    #[must_use]
    pub const fn new(count: u32, unit: GranularityUnit) -> Self {
        Self { count, unit }
    }

    /// Returns the aggregation period in milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> i64 {
        self.unit.millis() * self.count as i64
    }

    /// Returns the unit count.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Returns the time unit.
    #[must_use]
    pub const fn unit(&self) -> GranularityUnit {
        self.unit
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.unit.as_str())
    }
}

impl FromStr for Granularity {
    type Err = GranularityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s.len() - s.chars().last().map_or(0, char::len_utf8);
        let (count_part, unit_part) = s.split_at(split);
        let unit = match unit_part {
            "s" => GranularityUnit::Second,
            "m" => GranularityUnit::Minute,
            "h" => GranularityUnit::Hour,
            "d" => GranularityUnit::Day,
            _ => return Err(GranularityParseError(s.to_string())),
        };
        // A bare unit letter means a count of one, e.g. "s" == "1s".
        let count = if count_part.is_empty() {
            1
        } else {
            count_part
                .parse::<u32>()
                .map_err(|_| GranularityParseError(s.to_string()))?
        };
        if count == 0 {
            return Err(GranularityParseError(s.to_string()));
        }
        Ok(Self { count, unit })
    }
}

impl TryFrom<String> for Granularity {
    type Error = GranularityParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Granularity> for String {
    fn from(g: Granularity) -> Self {
        g.to_string()
    }
}

/// Error returned when parsing an invalid granularity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranularityParseError(String);

impl std::fmt::Display for GranularityParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid granularity '{}', expected '<count><unit>' with unit one of: s, m, h, d",
            self.0
        )
    }
}

impl std::error::Error for GranularityParseError {}
