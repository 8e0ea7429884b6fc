//! cryptotrack: crypto price tracking, ingestion and forecasting service.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`service`] wires them together
//! for the [`cli`] and the HTTP API.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod service;
