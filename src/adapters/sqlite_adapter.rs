//! SQLite store adapter.

use crate::domain::crypto::{CryptoRecord, PriceTick};
use crate::domain::error::TrackerError;
use crate::domain::ohlcv::{HistoricalPricePoint, Interval};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> TrackerError {
    TrackerError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> TrackerError {
    TrackerError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_utc(idx: usize, text: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_interval(idx: usize, text: String) -> rusqlite::Result<Interval> {
    text.parse::<Interval>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::other(e)),
        )
    })
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TrackerError> {
        let db_path = config.require_string("sqlite", "path")?;
        let pool_size = config.get_positive_int("sqlite", "pool_size", 4)?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, TrackerError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, TrackerError> {
        self.pool.get().map_err(pool_err)
    }
}

impl StorePort for SqliteAdapter {
    fn initialize_schema(&self) -> Result<(), TrackerError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS cryptos (
                    symbol TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    price REAL NOT NULL,
                    last_updated TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS crypto_historical_prices (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    crypto_symbol TEXT NOT NULL,
                    timestamp INTEGER NOT NULL,
                    open REAL NOT NULL,
                    high REAL NOT NULL,
                    low REAL NOT NULL,
                    close REAL NOT NULL,
                    volume REAL NOT NULL,
                    interval TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_hist_symbol_interval_ts
                    ON crypto_historical_prices(crypto_symbol, interval, timestamp);
                CREATE TABLE IF NOT EXISTS crypto_prices (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    symbol TEXT NOT NULL,
                    timestamp TEXT NOT NULL,
                    price REAL NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_prices_symbol ON crypto_prices(symbol);",
            )
            .map_err(query_err)
    }

    fn insert_missing_points(&self, points: &[HistoricalPricePoint]) -> Result<usize, TrackerError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        let mut inserted = 0;
        for point in points {
            let exists: Option<i64> = tx
                .query_row(
                    "SELECT id FROM crypto_historical_prices
                     WHERE crypto_symbol = ?1 AND timestamp = ?2 AND interval = ?3
                     LIMIT 1",
                    params![point.symbol, point.timestamp, point.interval.as_str()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(query_err)?;
            if exists.is_some() {
                continue;
            }

            tx.execute(
                "INSERT INTO crypto_historical_prices
                    (crypto_symbol, timestamp, open, high, low, close, volume, interval)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    point.symbol,
                    point.timestamp,
                    point.open,
                    point.high,
                    point.low,
                    point.close,
                    point.volume,
                    point.interval.as_str()
                ],
            )
            .map_err(query_err)?;
            inserted += 1;
        }

        tx.commit().map_err(query_err)?;
        debug!(total = points.len(), inserted, "stored historical points");
        Ok(inserted)
    }

    fn historical_points(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Vec<HistoricalPricePoint>, TrackerError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT crypto_symbol, interval, timestamp, open, high, low, close, volume
                 FROM crypto_historical_prices
                 WHERE crypto_symbol = ?1 AND interval = ?2
                 ORDER BY timestamp ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![symbol, interval.as_str()], |row| {
                Ok(HistoricalPricePoint {
                    symbol: row.get(0)?,
                    interval: parse_interval(1, row.get(1)?)?,
                    timestamp: row.get(2)?,
                    open: row.get(3)?,
                    high: row.get(4)?,
                    low: row.get(5)?,
                    close: row.get(6)?,
                    volume: row.get(7)?,
                })
            })
            .map_err(query_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_err)
    }

    fn upsert_crypto(&self, record: &CryptoRecord) -> Result<(), TrackerError> {
        self.conn()?
            .execute(
                "INSERT INTO cryptos (symbol, name, price, last_updated)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(symbol) DO UPDATE SET
                    name = excluded.name,
                    price = excluded.price,
                    last_updated = excluded.last_updated",
                params![
                    record.symbol,
                    record.name,
                    record.price,
                    record.last_updated.to_rfc3339()
                ],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn crypto(&self, symbol: &str) -> Result<Option<CryptoRecord>, TrackerError> {
        self.conn()?
            .query_row(
                "SELECT symbol, name, price, last_updated FROM cryptos WHERE symbol = ?1",
                params![symbol],
                |row| {
                    Ok(CryptoRecord {
                        symbol: row.get(0)?,
                        name: row.get(1)?,
                        price: row.get(2)?,
                        last_updated: parse_utc(3, row.get(3)?)?,
                    })
                },
            )
            .optional()
            .map_err(query_err)
    }

    fn record_price(&self, tick: &PriceTick) -> Result<(), TrackerError> {
        self.conn()?
            .execute(
                "INSERT INTO crypto_prices (symbol, timestamp, price) VALUES (?1, ?2, ?3)",
                params![tick.symbol, tick.timestamp.to_rfc3339(), tick.price],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn delete_symbol(&self, symbol: &str) -> Result<(), TrackerError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        let historical = tx
            .execute(
                "DELETE FROM crypto_historical_prices WHERE crypto_symbol = ?1",
                params![symbol],
            )
            .map_err(query_err)?;
        tx.execute("DELETE FROM crypto_prices WHERE symbol = ?1", params![symbol])
            .map_err(query_err)?;
        tx.execute("DELETE FROM cryptos WHERE symbol = ?1", params![symbol])
            .map_err(query_err)?;

        tx.commit().map_err(query_err)?;
        debug!(symbol, historical, "deleted symbol");
        Ok(())
    }
}
