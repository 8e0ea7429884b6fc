//! RSI (Relative Strength Index) indicator.
//!
//! Plain rolling means over the trailing window of close-to-close deltas:
//! - gain = mean of positive deltas, loss = mean of |negative deltas|
//! - RSI = 100 - (100 / (1 + gain / loss))
//!
//! The first point has no delta and contributes zero to both sums, so the
//! first defined value sits at index (n-1). RS is undefined when loss == 0;
//! those points are left invalid for the caller's fill step.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::HistoricalPricePoint;

pub fn calculate_rsi(points: &[HistoricalPricePoint], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: points
                .iter()
                .map(|p| IndicatorPoint::invalid(p.timestamp))
                .collect(),
        };
    }

    let mut gains = Vec::with_capacity(points.len());
    let mut losses = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let change = if i == 0 {
            0.0
        } else {
            points[i].close - points[i - 1].close
        };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let values = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if i + 1 < period {
                return IndicatorPoint::invalid(point.timestamp);
            }
            let start = i + 1 - period;
            let avg_gain = gains[start..=i].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[start..=i].iter().sum::<f64>() / period as f64;
            if avg_loss == 0.0 {
                IndicatorPoint::invalid(point.timestamp)
            } else {
                let rs = avg_gain / avg_loss;
                IndicatorPoint::valid(point.timestamp, 100.0 - (100.0 / (1.0 + rs)))
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
