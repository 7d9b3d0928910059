//! Time units for cache TTLs and parsing of human-written entry ages.
//!
//! All ages and TTLs are compared in whole milliseconds. Converting a finer
//! unit truncates, so `500 microseconds` is a zero-millisecond TTL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CachetError;

/// Granularity of a cache duration, named like `java.util.concurrent.TimeUnit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }

    /// Convert `value` of this unit to milliseconds, truncating sub-millisecond
    /// remainders and saturating on overflow.
    pub fn to_millis(&self, value: u64) -> u64 {
        match self {
            TimeUnit::Nanoseconds => value / 1_000_000,
            TimeUnit::Microseconds => value / 1_000,
            TimeUnit::Milliseconds => value,
            TimeUnit::Seconds => value.saturating_mul(1_000),
            TimeUnit::Minutes => value.saturating_mul(60_000),
            TimeUnit::Hours => value.saturating_mul(3_600_000),
            TimeUnit::Days => value.saturating_mul(86_400_000),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = CachetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TimeUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == lower)
            .ok_or_else(|| CachetError::UnknownTimeUnit {
                unit: s.to_string(),
            })
    }
}

impl Serialize for TimeUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TimeUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse an age such as `"5000"`, `"250ms"`, `"30s"`, `"10m"`, `"4h"` or `"2d"`
/// into milliseconds. A bare number is already in milliseconds.
pub fn parse_age_millis(s: &str) -> Result<u64, CachetError> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);
    let value: u64 = digits.parse().map_err(|_| CachetError::Generic {
        message: format!("Invalid age '{s}': expected a number with optional ms/s/m/h/d suffix"),
    })?;
    let unit = match suffix.trim() {
        "" | "ms" => TimeUnit::Milliseconds,
        "s" => TimeUnit::Seconds,
        "m" => TimeUnit::Minutes,
        "h" => TimeUnit::Hours,
        "d" => TimeUnit::Days,
        other => {
            return Err(CachetError::UnknownTimeUnit {
                unit: other.to_string(),
            })
        }
    };
    Ok(unit.to_millis(value))
}
