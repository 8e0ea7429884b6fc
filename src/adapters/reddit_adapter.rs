//! Reddit comment search gateway (pushshift).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::http_client::{ensure_success, transport_err};
use crate::domain::crypto::Mention;
use crate::domain::error::TrackerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_port::MentionsPort;
use crate::ports::sentiment_port::SentimentScorer;

pub const DEFAULT_BASE_URL: &str = "https://api.pushshift.io/reddit/search/comment/";

const SOURCE: &str = "reddit";

pub struct RedditAdapter {
    client: Client,
    base_url: String,
    scorer: Arc<dyn SentimentScorer>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
struct Comment {
    #[serde(default)]
    body: String,
    created_utc: f64,
}

impl RedditAdapter {
    pub fn new(client: Client, base_url: &str, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            scorer,
        }
    }

    pub fn from_config(
        client: Client,
        config: &dyn ConfigPort,
        scorer: Arc<dyn SentimentScorer>,
    ) -> Self {
        Self::new(
            client,
            &config.get_string_or("reddit", "base_url", DEFAULT_BASE_URL),
            scorer,
        )
    }
}

#[async_trait]
impl MentionsPort for RedditAdapter {
    async fn mentions(
        &self,
        symbol: &str,
        max_results: usize,
    ) -> Result<Vec<Mention>, TrackerError> {
        debug!(symbol, max_results, "reddit request");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", symbol.to_string()),
                ("size", max_results.to_string()),
                ("sort", "desc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;

        let search: SearchResponse = ensure_success(SOURCE, response)
            .await?
            .json()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;

        Ok(search
            .data
            .into_iter()
            .map(|c| Mention {
                sentiment: self.scorer.label(&c.body),
                created_at: c.created_utc as i64,
                comment: c.body,
            })
            .collect())
    }
}
