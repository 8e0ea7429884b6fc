//! Technical indicator implementations.
//!
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values, aligned 1:1 with the input points

pub mod ema;
pub mod rsi;
pub mod sma;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: i64,
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn invalid(timestamp: i64) -> Self {
        Self {
            timestamp,
            valid: false,
            value: 0.0,
        }
    }

    pub fn valid(timestamp: i64, value: f64) -> Self {
        Self {
            timestamp,
            valid: true,
            value,
        }
    }

    /// The value if it is defined at this point.
    pub fn get(&self) -> Option<f64> {
        self.valid.then_some(self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Values as a column with `None` where the indicator is undefined.
    pub fn column(&self) -> Vec<Option<f64>> {
        self.values.iter().map(IndicatorPoint::get).collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA_{}", period),
            IndicatorType::Ema(period) => write!(f, "EMA_{}", period),
            IndicatorType::Rsi(_) => write!(f, "RSI"),
        }
    }
}
