//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close (no warmup averaging), then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Every point is valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::HistoricalPricePoint;

pub fn calculate_ema(points: &[HistoricalPricePoint], period: usize) -> IndicatorSeries {
    if period == 0 || points.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(points.len());
    let mut ema = points[0].close;

    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            ema = point.close * k + ema * (1.0 - k);
        }
        values.push(IndicatorPoint::valid(point.timestamp, ema));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
