//! Price forecasting and the buy/sell/hold decision.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::arima::{ArimaModel, LONG_HORIZON_ORDER};
use crate::domain::error::PredictionError;
use crate::domain::features::FeatureMatrix;
use crate::domain::ohlcv::Interval;
use crate::domain::regression::LinearRegression;

/// Relative change beyond which the decision leaves "hold". Exclusive.
pub const ACTION_THRESHOLD: f64 = 0.05;
pub const LONG_HORIZON_STEPS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Short,
    Long,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Short => "short",
            Timeframe::Long => "long",
        }
    }

    /// Stored series the timeframe is trained on.
    pub fn interval(&self) -> Interval {
        match self {
            Timeframe::Short => Interval::Daily,
            Timeframe::Long => Interval::Weekly,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Timeframe::Short),
            "long" => Ok(Timeframe::Long),
            other => Err(PredictionError::InvalidTimeframe {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    #[serde(rename = "comprar")]
    Buy,
    #[serde(rename = "vender")]
    Sell,
    #[serde(rename = "aguantar")]
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub prediction: f64,
    pub action: Action,
}

pub fn decide_action(current_price: f64, predicted_price: f64) -> Action {
    let change = (predicted_price - current_price) / current_price;
    if change > ACTION_THRESHOLD {
        Action::Buy
    } else if change < -ACTION_THRESHOLD {
        Action::Sell
    } else {
        Action::Hold
    }
}

/// Index of the first test row of an 80/20 chronological split.
pub fn chronological_split(rows: usize) -> usize {
    rows * 4 / 5
}

/// Fit on the first 80% of rows and predict from the last test row.
pub fn forecast_short(matrix: &FeatureMatrix) -> Result<f64, PredictionError> {
    let rows = matrix.len();
    let split_index = chronological_split(rows);
    if split_index >= rows {
        return Err(PredictionError::NoTestData { rows, split_index });
    }

    let train_len = split_index.min(matrix.targets.len());
    let x_train: Vec<[f64; 6]> = matrix.rows[..train_len]
        .iter()
        .map(|r| r.to_array())
        .collect();
    let model = LinearRegression::fit(&x_train, &matrix.targets[..train_len])?;

    let last = matrix.rows[rows - 1].to_array();
    Ok(model.predict(&last))
}

/// Mean of a 30-step ARIMA(5,1,0) forecast over the close series.
pub fn forecast_long(closes: &[f64]) -> Result<f64, PredictionError> {
    let model = ArimaModel::fit(closes, LONG_HORIZON_ORDER)?;
    let path = model.forecast(LONG_HORIZON_STEPS);
    Ok(path.iter().sum::<f64>() / path.len() as f64)
}

pub fn forecast(
    symbol: &str,
    matrix: &FeatureMatrix,
    timeframe: Timeframe,
) -> Result<ForecastResult, PredictionError> {
    let current_price = match matrix.current_price() {
        Some(p) if p > 0.0 && p.is_finite() => p,
        Some(p) => {
            return Err(PredictionError::ModelFit {
                reason: format!("current price {p} is not a positive number"),
            });
        }
        None => {
            return Err(PredictionError::InsufficientData {
                rows: 0,
                minimum: crate::domain::features::MIN_FEATURE_ROWS,
            });
        }
    };

    let prediction = match timeframe {
        Timeframe::Short => forecast_short(matrix)?,
        Timeframe::Long => forecast_long(&matrix.closes())?,
    };
    if !prediction.is_finite() {
        return Err(PredictionError::ModelFit {
            reason: "model produced a non-finite prediction".into(),
        });
    }

    Ok(ForecastResult {
        symbol: symbol.to_string(),
        timeframe,
        prediction,
        action: decide_action(current_price, prediction),
    })
}
