//! Core domain types and logic.

pub mod arima;
pub mod crypto;
pub mod error;
pub mod features;
pub mod forecast;
pub mod indicator;
pub mod ohlcv;
pub mod regression;
pub mod sentiment;
