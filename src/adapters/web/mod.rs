//! JSON HTTP API adapter.

mod error;
mod handlers;

pub use error::{ErrorBody, WebError};
pub use handlers::*;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::service::TrackerService;

pub struct AppState {
    pub service: TrackerService,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/cryptos/{symbol}", delete(handlers::delete_crypto))
        .route("/cryptos/{symbol}/realtime", get(handlers::realtime_price))
        .route("/cryptos/{symbol}/predict", get(handlers::predict))
        .route("/cryptos/{symbol}/historical", post(handlers::store_historical))
        .route("/cryptos/{symbol}/trends", get(handlers::trends))
        .route("/cryptos/{symbol}/mentions", get(handlers::mentions))
        .route("/cryptos/{symbol}/news", get(handlers::news))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(Arc::new(state))
}
