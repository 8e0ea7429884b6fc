//! Tracing subscriber setup.
//!
//! `[logging] filter` sets the default directive (`info` when absent) and
//! `RUST_LOG` overrides it. `[logging] format` selects `pretty` or `json`.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::domain::error::TrackerError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
    pub format: LogFormat,
}

impl LogSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TrackerError> {
        let format = config
            .get_string_or("logging", "format", "pretty")
            .parse::<LogFormat>()
            .map_err(|reason| TrackerError::ConfigInvalid {
                section: "logging".into(),
                key: "format".into(),
                reason,
            })?;
        Ok(Self {
            filter: config.get_string_or("logging", "filter", DEFAULT_FILTER),
            format,
        })
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(settings: &LogSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match settings.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
