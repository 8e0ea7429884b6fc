//! Simple Moving Average indicator.
//!
//! Trailing mean of the last n closes. Warmup: first (n-1) points are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::HistoricalPricePoint;

pub fn calculate_sma(points: &[HistoricalPricePoint], period: usize) -> IndicatorSeries {
    let values = if period == 0 {
        points
            .iter()
            .map(|p| IndicatorPoint::invalid(p.timestamp))
            .collect()
    } else {
        points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                if i + 1 < period {
                    IndicatorPoint::invalid(point.timestamp)
                } else {
                    let window = &points[i + 1 - period..=i];
                    let mean = window.iter().map(|p| p.close).sum::<f64>() / period as f64;
                    IndicatorPoint::valid(point.timestamp, mean)
                }
            })
            .collect()
    };

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
