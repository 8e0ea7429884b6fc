//! Exchange REST gateway (Binance spot API v3).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::http_client::{ensure_success, normalize_base_url, transport_err};
use crate::domain::crypto::{SpotPrice, TickerInfo};
use crate::domain::error::TrackerError;
use crate::domain::ohlcv::{HistoricalPricePoint, Interval};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_port::ExchangePort;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com/api/v3";
pub const DEFAULT_QUOTE_ASSET: &str = "USDT";
pub const DEFAULT_KLINE_LIMIT: usize = 1000;

const SOURCE: &str = "exchange";

pub struct BinanceAdapter {
    client: Client,
    base_url: String,
    quote_asset: String,
}

#[derive(Deserialize)]
struct PriceResponse {
    price: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24hResponse {
    last_price: String,
}

impl BinanceAdapter {
    pub fn new(client: Client, base_url: &str, quote_asset: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            quote_asset: quote_asset.to_string(),
        }
    }

    pub fn from_config(client: Client, config: &dyn ConfigPort) -> Self {
        Self::new(
            client,
            &config.get_string_or("exchange", "base_url", DEFAULT_BASE_URL),
            &config.get_string_or("exchange", "quote_asset", DEFAULT_QUOTE_ASSET),
        )
    }

    /// Exchange pair for a base symbol, e.g. `BTC` -> `BTCUSDT`.
    pub fn pair(&self, symbol: &str) -> String {
        format!("{}{}", symbol.to_uppercase(), self.quote_asset)
    }

    /// GET returning `None` on a non-success status.
    async fn get_optional<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        symbol: &str,
    ) -> Result<Option<T>, TrackerError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, symbol, "exchange request");
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", self.pair(symbol))])
            .send()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;

        if !response.status().is_success() {
            warn!(path, symbol, status = response.status().as_u16(), "exchange returned no data");
            return Ok(None);
        }
        let body = response
            .json::<T>()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;
        Ok(Some(body))
    }
}

fn parse_price(field: &str, raw: &str) -> Result<f64, TrackerError> {
    raw.parse::<f64>()
        .map_err(|e| TrackerError::upstream(SOURCE, None, format!("malformed {field} '{raw}': {e}")))
}

fn kline_number(entry: &[Value], idx: usize) -> Result<f64, TrackerError> {
    match entry.get(idx) {
        Some(Value::String(s)) => parse_price("kline field", s),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| TrackerError::upstream(SOURCE, None, "kline number out of range")),
        _ => Err(TrackerError::upstream(
            SOURCE,
            None,
            format!("kline entry missing field {idx}"),
        )),
    }
}

/// Parse the klines array-of-arrays payload.
pub fn parse_klines(
    symbol: &str,
    interval: Interval,
    entries: &[Vec<Value>],
) -> Result<Vec<HistoricalPricePoint>, TrackerError> {
    entries
        .iter()
        .map(|entry| {
            let timestamp = entry
                .first()
                .and_then(Value::as_i64)
                .ok_or_else(|| TrackerError::upstream(SOURCE, None, "kline entry missing open time"))?;
            Ok(HistoricalPricePoint {
                symbol: symbol.to_string(),
                interval,
                timestamp,
                open: kline_number(entry, 1)?,
                high: kline_number(entry, 2)?,
                low: kline_number(entry, 3)?,
                close: kline_number(entry, 4)?,
                volume: kline_number(entry, 5)?,
            })
        })
        .collect()
}

#[async_trait]
impl ExchangePort for BinanceAdapter {
    async fn spot_price(&self, symbol: &str) -> Result<Option<SpotPrice>, TrackerError> {
        let Some(body) = self.get_optional::<PriceResponse>("ticker/price", symbol).await? else {
            return Ok(None);
        };
        Ok(Some(SpotPrice {
            symbol: symbol.to_string(),
            price: parse_price("price", &body.price)?,
        }))
    }

    async fn ticker_24h(&self, symbol: &str) -> Result<Option<TickerInfo>, TrackerError> {
        let Some(body) = self
            .get_optional::<Ticker24hResponse>("ticker/24hr", symbol)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(TickerInfo {
            name: symbol.to_string(),
            price: parse_price("lastPrice", &body.last_price)?,
            last_updated: Utc::now(),
        }))
    }

    async fn klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<HistoricalPricePoint>, TrackerError> {
        let url = format!("{}/klines", self.base_url);
        debug!(url = %url, symbol, %interval, limit, "exchange klines request");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", self.pair(symbol)),
                ("interval", interval.as_str().to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;

        let entries: Vec<Vec<Value>> = ensure_success(SOURCE, response)
            .await?
            .json()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;
        parse_klines(symbol, interval, &entries)
    }
}
