//! Direction — directional bias carrying the sign convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trade direction.
///
/// The sign convention lives here and is dispatched once per computation:
/// a positive delta is always directionally favorable movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Signed price delta relative to the entry price: `close - entry` for
    /// Long, `entry - close` for Short.
    pub fn delta(self, entry_price: f64, close: f64) -> f64 {
        match self {
            Direction::Long => close - entry_price,
            Direction::Short => entry_price - close,
        }
    }

    /// Lowercase label used in persisted columns, filenames, and directories.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }

    /// Both directions, in persisted order (long first).
    pub fn both() -> [Direction; 2] {
        [Direction::Long, Direction::Short]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown direction '{0}' (expected 'long' or 'short')")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_delta_is_close_minus_entry() {
        assert_eq!(Direction::Long.delta(101.0, 103.0), 2.0);
        assert_eq!(Direction::Long.delta(101.0, 99.0), -2.0);
    }

    #[test]
    fn short_delta_is_entry_minus_close() {
        assert_eq!(Direction::Short.delta(101.0, 103.0), -2.0);
        assert_eq!(Direction::Short.delta(101.0, 99.0), 2.0);
    }

    #[test]
    fn round_trips_through_str() {
        for dir in Direction::both() {
            assert_eq!(dir.as_str().parse::<Direction>().unwrap(), dir);
        }
        assert!("buy".parse::<Direction>().is_err());
    }
}
