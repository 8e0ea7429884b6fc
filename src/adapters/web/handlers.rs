//! HTTP request handlers for the web adapter.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::domain::crypto::{Mention, NewsItem, SpotPrice, TrendPoint};
use crate::domain::forecast::ForecastResult;
use crate::service::IngestCounts;

use super::{AppState, WebError};

pub const DEFAULT_TRENDS_TIMEFRAME: &str = "today 12-m";
pub const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub timeframe: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub timeframe: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MaxResultsQuery {
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoricalResponse {
    pub detail: String,
    pub inserted: IngestCounts,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub symbol: String,
    pub trends: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct MentionsResponse {
    pub symbol: String,
    pub mentions: Vec<Mention>,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub symbol: String,
    pub news: Vec<NewsItem>,
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "API is running" }))
}

pub async fn delete_crypto(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, WebError> {
    state.service.delete_crypto(&symbol)?;
    Ok(Json(json!({
        "detail": format!("Crypto {symbol} deleted successfully")
    })))
}

pub async fn realtime_price(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<SpotPrice>, WebError> {
    Ok(Json(state.service.realtime_price(&symbol).await?))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> Result<Json<ForecastResult>, WebError> {
    let Query(query) = query?;
    let Some(timeframe) = query.timeframe else {
        return Err(WebError::bad_request(
            "missing query parameter 'timeframe' (short or long)",
        ));
    };
    Ok(Json(state.service.predict(&symbol, &timeframe).await?))
}

pub async fn store_historical(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<HistoricalResponse>, WebError> {
    let inserted = state.service.ingest_historical(&symbol).await?;
    Ok(Json(HistoricalResponse {
        detail: format!("Historical data for {symbol} saved successfully"),
        inserted,
    }))
}

pub async fn trends(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    query: Result<Query<TrendsQuery>, QueryRejection>,
) -> Result<Json<TrendsResponse>, WebError> {
    let Query(query) = query?;
    let timeframe = query
        .timeframe
        .unwrap_or_else(|| DEFAULT_TRENDS_TIMEFRAME.to_string());
    let trends = state.service.trends(&symbol, &timeframe).await?;
    Ok(Json(TrendsResponse { symbol, trends }))
}

pub async fn mentions(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    query: Result<Query<MaxResultsQuery>, QueryRejection>,
) -> Result<Json<MentionsResponse>, WebError> {
    let Query(query) = query?;
    let max_results = query.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    let mentions = state.service.mentions(&symbol, max_results).await?;
    Ok(Json(MentionsResponse { symbol, mentions }))
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    query: Result<Query<MaxResultsQuery>, QueryRejection>,
) -> Result<Json<NewsResponse>, WebError> {
    let Query(query) = query?;
    let max_results = query.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    let news = state.service.news(&symbol, max_results).await?;
    Ok(Json(NewsResponse { symbol, news }))
}

pub async fn not_found() -> WebError {
    WebError::not_found("no such route")
}

pub async fn method_not_allowed() -> WebError {
    WebError::method_not_allowed("method not allowed for this route")
}
