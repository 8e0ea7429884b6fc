//! Concrete adapter implementations for ports.

#[cfg(feature = "postgres")]
pub mod postgres_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;

pub mod binance_adapter;
pub mod file_config_adapter;
pub mod google_news_adapter;
pub mod google_trends_adapter;
pub mod http_client;
pub mod reddit_adapter;
pub mod vader_adapter;
pub mod web;

use std::sync::Arc;

use crate::domain::error::TrackerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;

/// Open the store selected by `[database] backend`.
pub fn open_store(config: &dyn ConfigPort) -> Result<Arc<dyn StorePort>, TrackerError> {
    let backend = config.get_string_or("database", "backend", "sqlite");
    match backend.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(sqlite_adapter::SqliteAdapter::from_config(config)?)),
        #[cfg(feature = "postgres")]
        "postgres" => Ok(Arc::new(postgres_adapter::PostgresAdapter::from_config(
            config,
        )?)),
        other => Err(TrackerError::ConfigInvalid {
            section: "database".into(),
            key: "backend".into(),
            reason: format!("backend '{other}' is unknown or not compiled in"),
        }),
    }
}
