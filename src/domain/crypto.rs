//! Tracked symbols and the market/sentiment records returned by gateways.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::sentiment::SentimentLabel;

/// A row of the `cryptos` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoRecord {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub last_updated: DateTime<Utc>,
}

/// A row of the `crypto_prices` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTick {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotPrice {
    pub symbol: String,
    pub price: f64,
}

/// Subset of the exchange 24h ticker used to refresh a tracked symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerInfo {
    pub name: String,
    pub price: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub published_at: String,
    pub url: String,
    pub sentiment: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mention {
    pub comment: String,
    pub created_at: i64,
    pub sentiment: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub popularity: i64,
}
