//! Ordinary least squares with an intercept.
//!
//! Columns are centred before solving and the system is solved through the
//! SVD, so collinear or constant columns (the broadcast sentiment column is
//! always constant) get the minimum-norm solution instead of failing.

use nalgebra::{DMatrix, DVector};

use crate::domain::error::PredictionError;

#[derive(Debug, Clone)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn fit<R: AsRef<[f64]>>(x: &[R], y: &[f64]) -> Result<Self, PredictionError> {
        if x.is_empty() {
            return Err(PredictionError::ModelFit {
                reason: "no training rows".into(),
            });
        }
        if x.len() != y.len() {
            return Err(PredictionError::ModelFit {
                reason: format!("{} feature rows but {} targets", x.len(), y.len()),
            });
        }

        let n_rows = x.len();
        let n_cols = x[0].as_ref().len();
        if x.iter().any(|row| row.as_ref().len() != n_cols) {
            return Err(PredictionError::ModelFit {
                reason: "ragged feature rows".into(),
            });
        }
        if x
            .iter()
            .flat_map(|row| row.as_ref().iter())
            .chain(y.iter())
            .any(|v| !v.is_finite())
        {
            return Err(PredictionError::ModelFit {
                reason: "input contains non-finite values".into(),
            });
        }

        let matrix = DMatrix::from_fn(n_rows, n_cols, |r, c| x[r].as_ref()[c]);
        let targets = DVector::from_column_slice(y);

        let x_means: Vec<f64> = (0..n_cols).map(|c| matrix.column(c).mean()).collect();
        let y_mean = targets.mean();

        let centred = DMatrix::from_fn(n_rows, n_cols, |r, c| matrix[(r, c)] - x_means[c]);
        let centred_y = targets.map(|v| v - y_mean);

        let coefficients = solve_least_squares(centred, &centred_y)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_means)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(b, v)| b * v)
                .sum::<f64>()
    }
}

/// Minimum-norm least squares solution of `x * beta = y`.
///
/// Singular values below `max_sv * max(m, n) * eps` are treated as zero.
pub fn solve_least_squares(x: DMatrix<f64>, y: &DVector<f64>) -> Result<Vec<f64>, PredictionError> {
    let (m, n) = x.shape();
    let svd = x.svd(true, true);
    let max_sv = svd.singular_values.iter().cloned().fold(0.0, f64::max);
    if max_sv == 0.0 {
        return Ok(vec![0.0; n]);
    }
    let eps = max_sv * m.max(n) as f64 * f64::EPSILON;
    let beta = svd
        .solve(y, eps)
        .map_err(|e| PredictionError::ModelFit {
            reason: e.to_string(),
        })?;
    Ok(beta.iter().cloned().collect())
}
