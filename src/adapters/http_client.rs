//! Shared HTTP client construction for the gateway adapters.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::domain::error::TrackerError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
const USER_AGENT: &str = concat!("cryptotrack/", env!("CARGO_PKG_VERSION"));

pub fn build_client(config: &dyn ConfigPort) -> Result<Client, TrackerError> {
    let timeout = config.get_double("http", "timeout_secs", DEFAULT_TIMEOUT_SECS);
    if !(timeout.is_finite() && timeout > 0.0) {
        return Err(TrackerError::ConfigInvalid {
            section: "http".into(),
            key: "timeout_secs".into(),
            reason: format!("{timeout} is not a positive number of seconds"),
        });
    }

    Client::builder()
        .timeout(Duration::from_secs_f64(timeout))
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .build()
        .map_err(|e| TrackerError::ConfigInvalid {
            section: "http".into(),
            key: "client".into(),
            reason: e.to_string(),
        })
}

/// Transport-level failure (connect, timeout, body read).
pub fn transport_err(source_name: &str, e: reqwest::Error) -> TrackerError {
    TrackerError::upstream(source_name, e.status().map(|s| s.as_u16()), e.to_string())
}

/// Turn a non-success response into an `Upstream` error carrying the body text.
pub async fn ensure_success(source_name: &str, response: Response) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(source = source_name, status = status.as_u16(), "upstream returned error status");
    Err(TrackerError::upstream(source_name, Some(status.as_u16()), body))
}

/// Trim a trailing slash so paths can be appended with `format!("{base}/...")`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
