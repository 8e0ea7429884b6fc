//! Feature matrix construction for the short/long horizon forecasters.
//!
//! Columns: close, volume, SMA_10, EMA_10, RSI(14), news_sentiment.
//! The sentiment scalar is broadcast to every row of one request.

use crate::domain::error::PredictionError;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::ohlcv::HistoricalPricePoint;

pub const SMA_WINDOW: usize = 10;
pub const EMA_SPAN: usize = 10;
pub const RSI_WINDOW: usize = 14;
pub const MIN_FEATURE_ROWS: usize = 10;

pub const FEATURE_COLUMNS: [&str; 6] = ["close", "volume", "SMA_10", "EMA_10", "RSI", "news_sentiment"];

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub timestamp: i64,
    pub close: f64,
    pub volume: f64,
    pub sma_10: f64,
    pub ema_10: f64,
    pub rsi: f64,
    pub news_sentiment: f64,
}

impl FeatureRow {
    /// Row values in `FEATURE_COLUMNS` order.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.close,
            self.volume,
            self.sma_10,
            self.ema_10,
            self.rsi,
            self.news_sentiment,
        ]
    }
}

/// X and y for one (symbol, interval) series.
///
/// `targets[t] = rows[t + 1].close`, so `targets.len() == rows.len() - 1`.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub rows: Vec<FeatureRow>,
    pub targets: Vec<f64>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    /// Most recent close in the series.
    pub fn current_price(&self) -> Option<f64> {
        self.rows.last().map(|r| r.close)
    }
}

/// Backfill (next valid value) then forward-fill (last valid value).
///
/// A column with no valid value at all stays empty.
pub fn fill_gaps(column: &mut [Option<f64>]) {
    let mut next = None;
    for slot in column.iter_mut().rev() {
        match slot {
            Some(v) => next = Some(*v),
            None => *slot = next,
        }
    }
    let mut last = None;
    for slot in column.iter_mut() {
        match slot {
            Some(v) => last = Some(*v),
            None => *slot = last,
        }
    }
}

/// Build the feature matrix from points ordered by timestamp.
pub fn build_features(
    points: &[HistoricalPricePoint],
    news_sentiment: f64,
) -> Result<FeatureMatrix, PredictionError> {
    let mut sma = calculate_sma(points, SMA_WINDOW).column();
    let mut ema = calculate_ema(points, EMA_SPAN).column();
    let mut rsi = calculate_rsi(points, RSI_WINDOW).column();
    fill_gaps(&mut sma);
    fill_gaps(&mut ema);
    fill_gaps(&mut rsi);

    // Long enough for every window to fill, yet a column has no value at all.
    if points.len() >= RSI_WINDOW {
        for (column, values) in [("SMA_10", &sma), ("EMA_10", &ema), ("RSI", &rsi)] {
            if values.iter().all(Option::is_none) {
                return Err(PredictionError::UndefinedFeature {
                    column,
                    rows: points.len(),
                });
            }
        }
    }

    let rows: Vec<FeatureRow> = points
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            Some(FeatureRow {
                timestamp: point.timestamp,
                close: point.close,
                volume: point.volume,
                sma_10: sma[i]?,
                ema_10: ema[i]?,
                rsi: rsi[i]?,
                news_sentiment,
            })
        })
        .collect();

    if rows.len() < MIN_FEATURE_ROWS {
        return Err(PredictionError::InsufficientData {
            rows: rows.len(),
            minimum: MIN_FEATURE_ROWS,
        });
    }

    let targets = rows.iter().skip(1).map(|r| r.close).collect();
    Ok(FeatureMatrix { rows, targets })
}
