//! OHLCV price point representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar interval of a stored price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1w")]
    Weekly,
}

impl Interval {
    pub const ALL: [Interval; 2] = [Interval::Daily, Interval::Weekly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1w",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Interval::Daily),
            "1w" => Ok(Interval::Weekly),
            other => Err(format!("unknown interval '{other}'")),
        }
    }
}

/// One stored bar, unique on (symbol, interval, timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPricePoint {
    pub symbol: String,
    pub interval: Interval,
    /// Bar open time in epoch milliseconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
