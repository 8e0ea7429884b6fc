//! PostgreSQL store adapter.

use crate::domain::crypto::{CryptoRecord, PriceTick};
use crate::domain::error::TrackerError;
use crate::domain::ohlcv::{HistoricalPricePoint, Interval};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use chrono::{DateTime, Utc};
use postgres::NoTls;
use r2d2::{Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;
use tracing::debug;

type Manager = PostgresConnectionManager<NoTls>;

pub struct PostgresAdapter {
    pool: Pool<Manager>,
}

fn pool_err(e: r2d2::Error) -> TrackerError {
    TrackerError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: postgres::Error) -> TrackerError {
    TrackerError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl PostgresAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TrackerError> {
        let conninfo = config.require_string("postgres", "conninfo")?;
        let pool_size = config.get_positive_int("postgres", "pool_size", 4)?;

        let pg_config = conninfo
            .parse::<postgres::Config>()
            .map_err(|e| TrackerError::ConfigInvalid {
                section: "postgres".into(),
                key: "conninfo".into(),
                reason: e.to_string(),
            })?;

        let manager = PostgresConnectionManager::new(pg_config, NoTls);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<Manager>, TrackerError> {
        self.pool.get().map_err(pool_err)
    }
}

impl StorePort for PostgresAdapter {
    fn initialize_schema(&self) -> Result<(), TrackerError> {
        self.conn()?
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS cryptos (
                    symbol VARCHAR PRIMARY KEY,
                    name VARCHAR NOT NULL,
                    price DOUBLE PRECISION NOT NULL,
                    last_updated TIMESTAMPTZ NOT NULL
                );
                CREATE TABLE IF NOT EXISTS crypto_historical_prices (
                    id SERIAL PRIMARY KEY,
                    crypto_symbol VARCHAR(10) NOT NULL,
                    timestamp BIGINT NOT NULL,
                    open DOUBLE PRECISION NOT NULL,
                    high DOUBLE PRECISION NOT NULL,
                    low DOUBLE PRECISION NOT NULL,
                    close DOUBLE PRECISION NOT NULL,
                    volume DOUBLE PRECISION NOT NULL,
                    "interval" VARCHAR(5) NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_hist_symbol_interval_ts
                    ON crypto_historical_prices(crypto_symbol, "interval", timestamp);
                CREATE TABLE IF NOT EXISTS crypto_prices (
                    id SERIAL PRIMARY KEY,
                    symbol VARCHAR NOT NULL,
                    timestamp TIMESTAMPTZ NOT NULL,
                    price DOUBLE PRECISION NOT NULL
                );",
            )
            .map_err(query_err)
    }

    fn insert_missing_points(&self, points: &[HistoricalPricePoint]) -> Result<usize, TrackerError> {
        let mut conn = self.conn()?;
        let mut tx = conn.transaction().map_err(query_err)?;

        let mut inserted = 0;
        for point in points {
            let exists = tx
                .query_opt(
                    "SELECT id FROM crypto_historical_prices
                     WHERE crypto_symbol = $1 AND timestamp = $2 AND "interval" = $3
                     LIMIT 1",
                    &[&point.symbol, &point.timestamp, &point.interval.as_str()],
                )
                .map_err(query_err)?;
            if exists.is_some() {
                continue;
            }

            tx.execute(
                "INSERT INTO crypto_historical_prices
                    (crypto_symbol, timestamp, open, high, low, close, volume, "interval")
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &point.symbol,
                    &point.timestamp,
                    &point.open,
                    &point.high,
                    &point.low,
                    &point.close,
                    &point.volume,
                    &point.interval.as_str(),
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
        let rows = self
            .conn()?
            .query(
                "SELECT crypto_symbol, timestamp, open, high, low, close, volume
                 FROM crypto_historical_prices
                 WHERE crypto_symbol = $1 AND "interval" = $2
                 ORDER BY timestamp ASC",
                &[&symbol, &interval.as_str()],
            )
            .map_err(query_err)?;

        Ok(rows
            .into_iter()
            .map(|row| HistoricalPricePoint {
                symbol: row.get(0),
                interval,
                timestamp: row.get(1),
                open: row.get(2),
                high: row.get(3),
                low: row.get(4),
                close: row.get(5),
                volume: row.get(6),
            })
            .collect())
    }

    fn upsert_crypto(&self, record: &CryptoRecord) -> Result<(), TrackerError> {
        self.conn()?
            .execute(
                "INSERT INTO cryptos (symbol, name, price, last_updated)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (symbol) DO UPDATE SET
                    name = EXCLUDED.name,
                    price = EXCLUDED.price,
                    last_updated = EXCLUDED.last_updated",
                &[
                    &record.symbol,
                    &record.name,
                    &record.price,
                    &record.last_updated,
                ],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn crypto(&self, symbol: &str) -> Result<Option<CryptoRecord>, TrackerError> {
        let row = self
            .conn()?
            .query_opt(
                "SELECT symbol, name, price, last_updated FROM cryptos WHERE symbol = $1",
                &[&symbol],
            )
            .map_err(query_err)?;

        Ok(row.map(|row| {
            let last_updated: DateTime<Utc> = row.get(3);
            CryptoRecord {
                symbol: row.get(0),
                name: row.get(1),
                price: row.get(2),
                last_updated,
            }
        }))
    }

    fn record_price(&self, tick: &PriceTick) -> Result<(), TrackerError> {
        self.conn()?
            .execute(
                "INSERT INTO crypto_prices (symbol, timestamp, price) VALUES ($1, $2, $3)",
                &[&tick.symbol, &tick.timestamp, &tick.price],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn delete_symbol(&self, symbol: &str) -> Result<(), TrackerError> {
        let mut conn = self.conn()?;
        let mut tx = conn.transaction().map_err(query_err)?;

        let historical = tx
            .execute(
                "DELETE FROM crypto_historical_prices WHERE crypto_symbol = $1",
                &[&symbol],
            )
            .map_err(query_err)?;
        tx.execute("DELETE FROM crypto_prices WHERE symbol = $1", &[&symbol])
            .map_err(query_err)?;
        tx.execute("DELETE FROM cryptos WHERE symbol = $1", &[&symbol])
            .map_err(query_err)?;

        tx.commit().map_err(query_err)?;
        debug!(symbol, historical, "deleted symbol");
        Ok(())
    }
}
