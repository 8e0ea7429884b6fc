//! Persistence port for tracked symbols, price ticks and historical bars.

use crate::domain::crypto::{CryptoRecord, PriceTick};
use crate::domain::error::TrackerError;
use crate::domain::ohlcv::{HistoricalPricePoint, Interval};

pub trait StorePort: Send + Sync {
    fn initialize_schema(&self) -> Result<(), TrackerError>;

    /// Insert every point with no existing row on (symbol, interval, timestamp).
    /// Existing rows are left untouched. Returns the number inserted.
    fn insert_missing_points(&self, points: &[HistoricalPricePoint]) -> Result<usize, TrackerError>;

    /// Stored bars for one series, ascending by timestamp.
    fn historical_points(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Vec<HistoricalPricePoint>, TrackerError>;

    fn upsert_crypto(&self, record: &CryptoRecord) -> Result<(), TrackerError>;

    fn crypto(&self, symbol: &str) -> Result<Option<CryptoRecord>, TrackerError>;

    fn record_price(&self, tick: &PriceTick) -> Result<(), TrackerError>;

    /// Remove historical rows, price ticks and the symbol record in one transaction.
    fn delete_symbol(&self, symbol: &str) -> Result<(), TrackerError>;
}
