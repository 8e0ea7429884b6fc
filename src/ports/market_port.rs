//! Upstream data gateway ports: exchange prices and sentiment sources.

use async_trait::async_trait;

use crate::domain::crypto::{Mention, NewsItem, SpotPrice, TickerInfo, TrendPoint};
use crate::domain::error::TrackerError;
use crate::domain::ohlcv::{HistoricalPricePoint, Interval};

#[async_trait]
pub trait ExchangePort: Send + Sync {
    /// Spot price. A non-success upstream status yields `Ok(None)`.
    async fn spot_price(&self, symbol: &str) -> Result<Option<SpotPrice>, TrackerError>;

    /// 24h ticker. A non-success upstream status yields `Ok(None)`.
    async fn ticker_24h(&self, symbol: &str) -> Result<Option<TickerInfo>, TrackerError>;

    /// OHLCV bars, oldest first. A non-success upstream status is an error.
    async fn klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<HistoricalPricePoint>, TrackerError>;
}

#[async_trait]
pub trait NewsPort: Send + Sync {
    async fn news(&self, symbol: &str, max_results: usize) -> Result<Vec<NewsItem>, TrackerError>;
}

#[async_trait]
pub trait MentionsPort: Send + Sync {
    async fn mentions(&self, symbol: &str, max_results: usize)
    -> Result<Vec<Mention>, TrackerError>;
}

#[async_trait]
pub trait TrendsPort: Send + Sync {
    async fn interest_over_time(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> Result<Vec<TrendPoint>, TrackerError>;
}
