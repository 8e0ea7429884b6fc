//! Google Trends interest-over-time gateway.
//!
//! Two calls: `explore` yields the TIMESERIES widget token and request, then
//! `widgetdata/multiline` returns the timeline. Both responses carry an
//! anti-JSON-hijacking guard prefix that must be stripped before parsing.

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::adapters::http_client::{ensure_success, normalize_base_url, transport_err};
use crate::domain::crypto::TrendPoint;
use crate::domain::error::TrackerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_port::TrendsPort;

pub const DEFAULT_BASE_URL: &str = "https://trends.google.com/trends/api";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TZ_OFFSET: i64 = 360;
pub const DEFAULT_TIMEFRAME: &str = "today 3-m";

const SOURCE: &str = "trends";
const TIMESERIES_WIDGET: &str = "TIMESERIES";

pub struct GoogleTrendsAdapter {
    client: Client,
    base_url: String,
    language: String,
    tz_offset: i64,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: Value,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Timeline {
    #[serde(default)]
    timeline_data: Vec<TimelineEntry>,
}

#[derive(Debug, Deserialize)]
struct TimelineEntry {
    time: String,
    #[serde(default)]
    value: Vec<i64>,
}

impl GoogleTrendsAdapter {
    pub fn new(client: Client, base_url: &str, language: &str, tz_offset: i64) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            language: language.to_string(),
            tz_offset,
        }
    }

    pub fn from_config(client: Client, config: &dyn ConfigPort) -> Self {
        Self::new(
            client,
            &config.get_string_or("trends", "base_url", DEFAULT_BASE_URL),
            &config.get_string_or("trends", "language", DEFAULT_LANGUAGE),
            config.get_int("trends", "tz_offset", DEFAULT_TZ_OFFSET),
        )
    }

    async fn get_guarded(&self, path: &str, query: &[(&str, String)]) -> Result<String, TrackerError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("hl", self.language.clone()), ("tz", self.tz_offset.to_string())])
            .query(query)
            .send()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;

        let body = ensure_success(SOURCE, response)
            .await?
            .text()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;
        Ok(strip_guard(&body).to_string())
    }

    async fn timeseries_widget(&self, keyword: &str, timeframe: &str) -> Result<Widget, TrackerError> {
        let req = json!({
            "comparisonItem": [{"keyword": keyword, "geo": "", "time": timeframe}],
            "category": 0,
            "property": "",
        });
        let body = self.get_guarded("explore", &[("req", req.to_string())]).await?;
        let explore: ExploreResponse = serde_json::from_str(&body).map_err(|e| {
            TrackerError::upstream(SOURCE, None, format!("malformed explore response: {e}"))
        })?;

        explore
            .widgets
            .into_iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or_else(|| TrackerError::upstream(SOURCE, None, "explore response has no TIMESERIES widget"))
    }
}

fn strip_guard(body: &str) -> &str {
    body.trim_start()
        .trim_start_matches(")]}'")
        .trim_start_matches(',')
        .trim_start()
}

fn parse_timeline(body: &str) -> Result<Vec<TrendPoint>, TrackerError> {
    let multiline: MultilineResponse = serde_json::from_str(body).map_err(|e| {
        TrackerError::upstream(SOURCE, None, format!("malformed timeline response: {e}"))
    })?;

    multiline
        .default
        .timeline_data
        .into_iter()
        .map(|entry| {
            let seconds: i64 = entry.time.parse().map_err(|_| {
                TrackerError::upstream(SOURCE, None, format!("bad timeline time '{}'", entry.time))
            })?;
            let date = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
                TrackerError::upstream(SOURCE, None, format!("timeline time {seconds} out of range"))
            })?;
            Ok(TrendPoint {
                date: date.format("%Y-%m-%d").to_string(),
                popularity: entry.value.first().copied().unwrap_or(0),
            })
        })
        .collect()
}

#[async_trait]
impl TrendsPort for GoogleTrendsAdapter {
    async fn interest_over_time(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> Result<Vec<TrendPoint>, TrackerError> {
        let keyword = format!("{symbol} cryptocurrency");
        let timeframe = if timeframe.trim().is_empty() {
            DEFAULT_TIMEFRAME
        } else {
            timeframe
        };
        debug!(symbol, timeframe, "trends request");

        let widget = self.timeseries_widget(&keyword, timeframe).await?;
        let body = self
            .get_guarded(
                "widgetdata/multiline",
                &[("req", widget.request.to_string()), ("token", widget.token)],
            )
            .await?;
        parse_timeline(&body)
    }
}
