//! Application service: orchestrates the store, the gateways and the
//! prediction pipeline for the CLI and HTTP front ends.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::binance_adapter::{BinanceAdapter, DEFAULT_KLINE_LIMIT};
use crate::adapters::google_news_adapter::GoogleNewsAdapter;
use crate::adapters::google_trends_adapter::GoogleTrendsAdapter;
use crate::adapters::http_client::build_client;
use crate::adapters::open_store;
use crate::adapters::reddit_adapter::RedditAdapter;
use crate::adapters::vader_adapter::VaderScorer;
use crate::domain::crypto::{CryptoRecord, Mention, NewsItem, PriceTick, SpotPrice, TrendPoint};
use crate::domain::error::{PredictionError, TrackerError};
use crate::domain::features::build_features;
use crate::domain::forecast::{ForecastResult, Timeframe, forecast};
use crate::domain::ohlcv::Interval;
use crate::domain::sentiment::average_sentiment;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_port::{ExchangePort, MentionsPort, NewsPort, TrendsPort};
use crate::ports::sentiment_port::SentimentScorer;
use crate::ports::store_port::StorePort;

/// Headlines averaged into the sentiment feature.
pub const PREDICTION_NEWS_COUNT: usize = 10;

/// Upstream data sources used by the service.
#[derive(Clone)]
pub struct Gateways {
    pub exchange: Arc<dyn ExchangePort>,
    pub news: Arc<dyn NewsPort>,
    pub mentions: Arc<dyn MentionsPort>,
    pub trends: Arc<dyn TrendsPort>,
}

impl Gateways {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TrackerError> {
        let client = build_client(config)?;
        let scorer: Arc<dyn SentimentScorer> = Arc::new(VaderScorer::new());
        Ok(Self {
            exchange: Arc::new(BinanceAdapter::from_config(client.clone(), config)),
            news: Arc::new(GoogleNewsAdapter::from_config(
                client.clone(),
                config,
                scorer.clone(),
            )),
            mentions: Arc::new(RedditAdapter::from_config(client.clone(), config, scorer)),
            trends: Arc::new(GoogleTrendsAdapter::from_config(client, config)),
        })
    }
}

/// Rows inserted per interval by a historical ingest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestCounts {
    #[serde(rename = "1d")]
    pub daily: usize,
    #[serde(rename = "1w")]
    pub weekly: usize,
}

#[derive(Clone)]
pub struct TrackerService {
    store: Arc<dyn StorePort>,
    gateways: Gateways,
    kline_limit: usize,
}

impl TrackerService {
    pub fn new(store: Arc<dyn StorePort>, gateways: Gateways, kline_limit: usize) -> Self {
        Self {
            store,
            gateways,
            kline_limit,
        }
    }

    /// Open the configured store, create the schema, and wire the HTTP gateways.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TrackerError> {
        let store = open_store(config)?;
        store.initialize_schema()?;
        let gateways = Gateways::from_config(config)?;

        let kline_limit =
            config.get_positive_int("exchange", "kline_limit", DEFAULT_KLINE_LIMIT as u32)?;
        Ok(Self::new(store, gateways, kline_limit as usize))
    }

    pub fn store(&self) -> &Arc<dyn StorePort> {
        &self.store
    }

    pub fn delete_crypto(&self, symbol: &str) -> Result<(), TrackerError> {
        self.store.delete_symbol(symbol)?;
        info!(symbol, "deleted crypto and its history");
        Ok(())
    }

    /// Current exchange price of a tracked symbol. Records the tick and
    /// refreshes the tracked record.
    pub async fn realtime_price(&self, symbol: &str) -> Result<SpotPrice, TrackerError> {
        let Some(mut record) = self.store.crypto(symbol)? else {
            return Err(TrackerError::not_found("tracked crypto", symbol));
        };
        let Some(spot) = self.gateways.exchange.spot_price(symbol).await? else {
            return Err(TrackerError::not_found("price data", symbol));
        };

        let now = Utc::now();
        self.store.record_price(&PriceTick {
            symbol: symbol.to_string(),
            timestamp: now,
            price: spot.price,
        })?;
        record.price = spot.price;
        record.last_updated = now;
        self.store.upsert_crypto(&record)?;
        Ok(spot)
    }

    /// Fetch daily then weekly bars and store the ones not already present.
    pub async fn ingest_historical(&self, symbol: &str) -> Result<IngestCounts, TrackerError> {
        match self.gateways.exchange.ticker_24h(symbol).await? {
            Some(ticker) => self.store.upsert_crypto(&CryptoRecord {
                symbol: symbol.to_string(),
                name: ticker.name,
                price: ticker.price,
                last_updated: ticker.last_updated,
            })?,
            None => warn!(symbol, "no 24h ticker, symbol record not refreshed"),
        }

        let mut counts = IngestCounts::default();
        for interval in Interval::ALL {
            let points = self
                .gateways
                .exchange
                .klines(symbol, interval, self.kline_limit)
                .await?;
            let inserted = self.store.insert_missing_points(&points)?;
            info!(symbol, %interval, fetched = points.len(), inserted, "ingested historical data");
            match interval {
                Interval::Daily => counts.daily = inserted,
                Interval::Weekly => counts.weekly = inserted,
            }
        }
        Ok(counts)
    }

    pub async fn predict(&self, symbol: &str, timeframe: &str) -> Result<ForecastResult, TrackerError> {
        let wrap = |cause: PredictionError| TrackerError::Prediction {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            cause,
        };

        let parsed: Timeframe = timeframe.parse().map_err(wrap)?;
        let points = self.store.historical_points(symbol, parsed.interval())?;
        if points.is_empty() {
            return Err(TrackerError::not_found(
                &format!("{} historical data", parsed.interval()),
                symbol,
            ));
        }

        let news = self
            .gateways
            .news
            .news(symbol, PREDICTION_NEWS_COUNT)
            .await?;
        let sentiment = average_sentiment(news.iter().map(|n| n.sentiment));

        let matrix = build_features(&points, sentiment).map_err(wrap)?;
        let result = forecast(symbol, &matrix, parsed).map_err(wrap)?;
        info!(
            symbol,
            timeframe = %parsed,
            rows = matrix.len(),
            sentiment,
            prediction = result.prediction,
            action = ?result.action,
            "forecast computed"
        );
        Ok(result)
    }

    pub async fn trends(&self, symbol: &str, timeframe: &str) -> Result<Vec<TrendPoint>, TrackerError> {
        let trends = self
            .gateways
            .trends
            .interest_over_time(symbol, timeframe)
            .await?;
        non_empty(trends, "trend data", symbol)
    }

    pub async fn mentions(&self, symbol: &str, max_results: usize) -> Result<Vec<Mention>, TrackerError> {
        let mentions = self.gateways.mentions.mentions(symbol, max_results).await?;
        non_empty(mentions, "mentions", symbol)
    }

    pub async fn news(&self, symbol: &str, max_results: usize) -> Result<Vec<NewsItem>, TrackerError> {
        let news = self.gateways.news.news(symbol, max_results).await?;
        non_empty(news, "news", symbol)
    }
}

fn non_empty<T>(items: Vec<T>, what: &str, symbol: &str) -> Result<Vec<T>, TrackerError> {
    if items.is_empty() {
        Err(TrackerError::not_found(what, symbol))
    } else {
        Ok(items)
    }
}
