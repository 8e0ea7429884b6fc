#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use cryptotrack::adapters::sqlite_adapter::SqliteAdapter;
use cryptotrack::domain::crypto::{
    CryptoRecord, Mention, NewsItem, SpotPrice, TickerInfo, TrendPoint,
};
use cryptotrack::domain::error::TrackerError;
pub use cryptotrack::domain::ohlcv::{HistoricalPricePoint, Interval};
use cryptotrack::domain::sentiment::SentimentLabel;
use cryptotrack::ports::market_port::{ExchangePort, MentionsPort, NewsPort, TrendsPort};
pub use cryptotrack::ports::store_port::StorePort;
use cryptotrack::service::{Gateways, TrackerService};
use std::collections::HashMap;
use std::sync::Arc;

const DAY_MS: i64 = 86_400_000;
const START_MS: i64 = 1_600_000_000_000;

#[derive(Default)]
pub struct MockExchange {
    pub spot: HashMap<String, f64>,
    pub tickers: HashMap<String, f64>,
    pub klines: HashMap<(String, Interval), Vec<HistoricalPricePoint>>,
    pub klines_status: Option<u16>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spot(mut self, symbol: &str, price: f64) -> Self {
        self.spot.insert(symbol.to_string(), price);
        self
    }

    pub fn with_ticker(mut self, symbol: &str, price: f64) -> Self {
        self.tickers.insert(symbol.to_string(), price);
        self
    }

    pub fn with_klines(mut self, points: Vec<HistoricalPricePoint>) -> Self {
        if let Some(first) = points.first() {
            self.klines
                .insert((first.symbol.clone(), first.interval), points);
        }
        self
    }

    pub fn failing_klines(mut self, status: u16) -> Self {
        self.klines_status = Some(status);
        self
    }
}

#[async_trait]
impl ExchangePort for MockExchange {
    async fn spot_price(&self, symbol: &str) -> Result<Option<SpotPrice>, TrackerError> {
        Ok(self.spot.get(symbol).map(|&price| SpotPrice {
            symbol: symbol.to_string(),
            price,
        }))
    }

    async fn ticker_24h(&self, symbol: &str) -> Result<Option<TickerInfo>, TrackerError> {
        Ok(self.tickers.get(symbol).map(|&price| TickerInfo {
            name: symbol.to_string(),
            price,
            last_updated: Utc::now(),
        }))
    }

    async fn klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<HistoricalPricePoint>, TrackerError> {
        if let Some(status) = self.klines_status {
            return Err(TrackerError::upstream("exchange", Some(status), "Invalid symbol."));
        }
        let mut points = self
            .klines
            .get(&(symbol.to_string(), interval))
            .cloned()
            .unwrap_or_default();
        if points.len() > limit {
            points.drain(..points.len() - limit);
        }
        Ok(points)
    }
}

#[derive(Default)]
pub struct MockNews {
    pub items: Vec<NewsItem>,
    pub fail: bool,
}

impl MockNews {
    pub fn with_labels(labels: &[SentimentLabel]) -> Self {
        Self {
            items: labels
                .iter()
                .enumerate()
                .map(|(i, &sentiment)| NewsItem {
                    title: format!("headline {i}"),
                    published_at: "Mon, 01 Jan 2024 10:00:00 GMT".into(),
                    url: format!("https://example.com/{i}"),
                    sentiment,
                })
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            items: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl NewsPort for MockNews {
    async fn news(&self, _symbol: &str, max_results: usize) -> Result<Vec<NewsItem>, TrackerError> {
        if self.fail {
            return Err(TrackerError::upstream("news", Some(503), "unavailable"));
        }
        Ok(self.items.iter().take(max_results).cloned().collect())
    }
}

#[derive(Default)]
pub struct MockMentions {
    pub items: Vec<Mention>,
}

#[async_trait]
impl MentionsPort for MockMentions {
    async fn mentions(
        &self,
        _symbol: &str,
        max_results: usize,
    ) -> Result<Vec<Mention>, TrackerError> {
        Ok(self.items.iter().take(max_results).cloned().collect())
    }
}

#[derive(Default)]
pub struct MockTrends {
    pub points: Vec<TrendPoint>,
}

#[async_trait]
impl TrendsPort for MockTrends {
    async fn interest_over_time(
        &self,
        _symbol: &str,
        _timeframe: &str,
    ) -> Result<Vec<TrendPoint>, TrackerError> {
        Ok(self.points.clone())
    }
}

pub struct TestGateways {
    pub exchange: MockExchange,
    pub news: MockNews,
    pub mentions: MockMentions,
    pub trends: MockTrends,
}

impl Default for TestGateways {
    fn default() -> Self {
        Self {
            exchange: MockExchange::new(),
            news: MockNews::default(),
            mentions: MockMentions::default(),
            trends: MockTrends::default(),
        }
    }
}

pub fn memory_store() -> Arc<dyn StorePort> {
    let store = SqliteAdapter::in_memory().unwrap();
    store.initialize_schema().unwrap();
    Arc::new(store)
}

pub fn make_service(store: Arc<dyn StorePort>, gateways: TestGateways) -> TrackerService {
    TrackerService::new(
        store,
        Gateways {
            exchange: Arc::new(gateways.exchange),
            news: Arc::new(gateways.news),
            mentions: Arc::new(gateways.mentions),
            trends: Arc::new(gateways.trends),
        },
        1000,
    )
}

/// Upward drift with an oscillation so the series has both gains and losses.
pub fn wavy_closes(count: usize, start: f64) -> Vec<f64> {
    (0..count)
        .map(|i| start + i as f64 * 0.5 + 3.0 * (i as f64 * 0.7).sin())
        .collect()
}

pub fn make_points(symbol: &str, interval: Interval, closes: &[f64]) -> Vec<HistoricalPricePoint> {
    let step = match interval {
        Interval::Daily => DAY_MS,
        Interval::Weekly => 7 * DAY_MS,
    };
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| HistoricalPricePoint {
            symbol: symbol.to_string(),
            interval,
            timestamp: START_MS + i as i64 * step,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000.0 + i as f64 * 10.0,
        })
        .collect()
}

pub fn tracked(symbol: &str, price: f64) -> CryptoRecord {
    CryptoRecord {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        price,
        last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}
