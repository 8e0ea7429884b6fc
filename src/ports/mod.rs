//! Port traits at the seams between domain logic and I/O.

pub mod config_port;
pub mod market_port;
pub mod sentiment_port;
pub mod store_port;
