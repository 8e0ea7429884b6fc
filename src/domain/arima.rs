//! ARIMA(p, d, 0) fitted by conditional least squares.
//!
//! The series is differenced d times, an AR(p) model without constant is
//! fitted on the differences, forecasts are produced recursively and then
//! integrated back onto the last observed level.

use nalgebra::{DMatrix, DVector};

use crate::domain::error::PredictionError;
use crate::domain::regression::solve_least_squares;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
}

/// Order used for the long horizon forecast.
pub const LONG_HORIZON_ORDER: ArimaOrder = ArimaOrder { p: 5, d: 1 };

#[derive(Debug, Clone)]
pub struct ArimaModel {
    pub order: ArimaOrder,
    pub ar_coeffs: Vec<f64>,
    history: Vec<f64>,
}

impl ArimaModel {
    pub fn fit(series: &[f64], order: ArimaOrder) -> Result<Self, PredictionError> {
        if series.iter().any(|v| !v.is_finite()) {
            return Err(PredictionError::ModelFit {
                reason: "series contains non-finite values".into(),
            });
        }

        let diffed = difference(series, order.d);
        if diffed.len() <= order.p {
            return Err(PredictionError::ModelFit {
                reason: format!(
                    "ARIMA({},{},0) needs more than {} observations, got {}",
                    order.p,
                    order.d,
                    order.p + order.d,
                    series.len()
                ),
            });
        }

        let ar_coeffs = if order.p == 0 {
            Vec::new()
        } else {
            let n_obs = diffed.len() - order.p;
            let lags = DMatrix::from_fn(n_obs, order.p, |r, c| diffed[order.p + r - 1 - c]);
            let y = DVector::from_column_slice(&diffed[order.p..]);
            solve_least_squares(lags, &y)?
        };

        Ok(Self {
            order,
            ar_coeffs,
            history: series.to_vec(),
        })
    }

    /// Forecast `steps` values past the end of the fitted series.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let mut diffed = difference(&self.history, self.order.d);
        let mut forecasts = Vec::with_capacity(steps);

        for _ in 0..steps {
            let next: f64 = self
                .ar_coeffs
                .iter()
                .enumerate()
                .map(|(lag, phi)| phi * diffed[diffed.len() - 1 - lag])
                .sum();
            diffed.push(next);
            forecasts.push(next);
        }

        let mut levels = forecasts;
        for depth in (0..self.order.d).rev() {
            let anchor = difference(&self.history, depth).last().copied().unwrap_or(0.0);
            levels = integrate(&levels, anchor);
        }
        levels
    }
}

/// Difference the series d times.
pub fn difference(data: &[f64], d: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..d {
        if result.len() < 2 {
            return vec![];
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

fn integrate(diff: &[f64], start: f64) -> Vec<f64> {
    diff.iter()
        .scan(start, |level, d| {
            *level += d;
            Some(*level)
        })
        .collect()
}
