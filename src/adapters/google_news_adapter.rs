//! Google News RSS gateway with per-headline sentiment.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::http_client::{ensure_success, normalize_base_url, transport_err};
use crate::domain::crypto::NewsItem;
use crate::domain::error::TrackerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_port::NewsPort;
use crate::ports::sentiment_port::SentimentScorer;

pub const DEFAULT_BASE_URL: &str = "https://news.google.com/rss/search";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_REGION: &str = "US";

const SOURCE: &str = "news";

pub struct GoogleNewsAdapter {
    client: Client,
    base_url: String,
    language: String,
    region: String,
    scorer: Arc<dyn SentimentScorer>,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
    #[serde(default)]
    link: String,
}

impl GoogleNewsAdapter {
    pub fn new(
        client: Client,
        base_url: &str,
        language: &str,
        region: &str,
        scorer: Arc<dyn SentimentScorer>,
    ) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            language: language.to_string(),
            region: region.to_string(),
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
            &config.get_string_or("news", "base_url", DEFAULT_BASE_URL),
            &config.get_string_or("news", "language", DEFAULT_LANGUAGE),
            &config.get_string_or("news", "region", DEFAULT_REGION),
            scorer,
        )
    }

    /// Edition id, e.g. `US:en` for language `en-US` in region `US`.
    fn edition(&self) -> String {
        let lang = self.language.split('-').next().unwrap_or(&self.language);
        format!("{}:{}", self.region, lang)
    }
}

/// Parse an RSS document into at most `max_results` headlines.
fn parse_feed(xml: &str, max_results: usize) -> Result<Vec<(String, String, String)>, TrackerError> {
    let rss: Rss = quick_xml::de::from_str(xml)
        .map_err(|e| TrackerError::upstream(SOURCE, None, format!("malformed RSS: {e}")))?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .take(max_results)
        .map(|item| (item.title, item.pub_date, item.link))
        .collect())
}

#[async_trait]
impl NewsPort for GoogleNewsAdapter {
    async fn news(&self, symbol: &str, max_results: usize) -> Result<Vec<NewsItem>, TrackerError> {
        let query = format!("{symbol} cryptocurrency");
        debug!(symbol, max_results, "news request");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("hl", self.language.as_str()),
                ("gl", self.region.as_str()),
                ("ceid", self.edition().as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;

        let body = ensure_success(SOURCE, response)
            .await?
            .text()
            .await
            .map_err(|e| transport_err(SOURCE, e))?;

        Ok(parse_feed(&body, max_results)?
            .into_iter()
            .map(|(title, published_at, url)| {
                let sentiment = self.scorer.label(&title);
                NewsItem {
                    title,
                    published_at,
                    url,
                    sentiment,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentiment::SentimentLabel;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Scores by keyword so tests do not depend on the lexicon.
    struct KeywordScorer;

    impl SentimentScorer for KeywordScorer {
        fn compound(&self, text: &str) -> f64 {
            if text.contains("surges") {
                0.6
            } else if text.contains("plunges") {
                -0.6
            } else {
                0.0
            }
        }
    }

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>"BTC cryptocurrency" - Google News</title>
    <link>https://news.google.com/</link>
    <item>
      <title>BTC surges past resistance</title>
      <link>https://example.com/a</link>
      <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
      <source url="https://example.com">Example</source>
    </item>
    <item>
      <title>BTC plunges on exchange outage</title>
      <link>https://example.com/b</link>
      <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>BTC network update scheduled</title>
      <link>https://example.com/c</link>
      <pubDate>Wed, 03 Jan 2024 10:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    fn adapter(server: &MockServer) -> GoogleNewsAdapter {
        GoogleNewsAdapter::new(
            Client::new(),
            &format!("{}/rss/search", server.uri()),
            "en-US",
            "US",
            Arc::new(KeywordScorer),
        )
    }

    #[test]
    fn edition_uses_language_prefix() {
        let adapter = GoogleNewsAdapter::new(
            Client::new(),
            DEFAULT_BASE_URL,
            "es-419",
            "MX",
            Arc::new(KeywordScorer),
        );
        assert_eq!(adapter.edition(), "MX:es");
    }

    #[test]
    fn parse_feed_without_items_is_empty() {
        let xml = "<rss><channel><title>none</title></channel></rss>";
        assert!(parse_feed(xml, 10).unwrap().is_empty());
    }

    #[test]
    fn parse_feed_rejects_garbage() {
        assert!(parse_feed("not xml at all <", 10).is_err());
    }

    #[tokio::test]
    async fn news_scores_and_truncates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "BTC cryptocurrency"))
            .and(query_param("hl", "en-US"))
            .and(query_param("gl", "US"))
            .and(query_param("ceid", "US:en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let news = adapter(&server).news("BTC", 2).await.unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].title, "BTC surges past resistance");
        assert_eq!(news[0].url, "https://example.com/a");
        assert_eq!(news[0].published_at, "Mon, 01 Jan 2024 10:00:00 GMT");
        assert_eq!(news[0].sentiment, SentimentLabel::Positive);
        assert_eq!(news[1].sentiment, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn news_max_zero_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        assert!(adapter(&server).news("BTC", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn news_non_success_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        match adapter(&server).news("BTC", 10).await {
            Err(TrackerError::Upstream {
                source_name,
                status,
                ..
            }) => {
                assert_eq!(source_name, "news");
                assert_eq!(status, Some(503));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
