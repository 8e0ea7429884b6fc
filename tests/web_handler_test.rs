#![cfg(feature = "sqlite")]
//! HTTP API tests driving the router with `tower::ServiceExt::oneshot`.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::*;
use cryptotrack::adapters::web::{AppState, build_router};
use cryptotrack::domain::crypto::{Mention, TrendPoint};
use cryptotrack::domain::sentiment::SentimentLabel;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(store: Arc<dyn StorePort>, gateways: TestGateways) -> Router {
    build_router(AppState {
        service: make_service(store, gateways),
    })
}

fn full_gateways(symbol: &str) -> TestGateways {
    TestGateways {
        exchange: MockExchange::new()
            .with_ticker(symbol, 200.0)
            .with_spot(symbol, 201.0)
            .with_klines(make_points(symbol, Interval::Daily, &wavy_closes(60, 100.0)))
            .with_klines(make_points(symbol, Interval::Weekly, &wavy_closes(40, 90.0))),
        news: MockNews::with_labels(&[SentimentLabel::Positive, SentimentLabel::Negative]),
        mentions: MockMentions {
            items: vec![
                Mention {
                    comment: "buy the dip".into(),
                    created_at: 1_700_000_000,
                    sentiment: SentimentLabel::Positive,
                },
                Mention {
                    comment: "meh".into(),
                    created_at: 1_700_000_050,
                    sentiment: SentimentLabel::Neutral,
                },
            ],
        },
        trends: MockTrends {
            points: vec![TrendPoint {
                date: "2024-03-01".into(),
                popularity: 77,
            }],
        },
    }
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

mod ping {
    use super::*;

    #[tokio::test]
    async fn ping_reports_running() {
        let app = app_with(memory_store(), TestGateways::default());
        let (status, body) = send(app, Method::GET, "/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is running");
    }

    #[tokio::test]
    async fn wrong_method_is_json_405() {
        let app = app_with(memory_store(), TestGateways::default());
        let (status, body) = send(app, Method::POST, "/ping").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["kind"], "method_not_allowed");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = app_with(memory_store(), TestGateways::default());
        let (status, body) = send(app, Method::GET, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }
}

mod historical_and_realtime {
    use super::*;

    #[tokio::test]
    async fn historical_reports_inserted_counts() {
        let store = memory_store();
        let app = app_with(store.clone(), full_gateways("BTC"));

        let (status, body) = send(app.clone(), Method::POST, "/cryptos/BTC/historical").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detail"], "Historical data for BTC saved successfully");
        assert_eq!(body["inserted"]["1d"], 60);
        assert_eq!(body["inserted"]["1w"], 40);

        let (_, again) = send(app, Method::POST, "/cryptos/BTC/historical").await;
        assert_eq!(again["inserted"]["1d"], 0);
        assert_eq!(again["inserted"]["1w"], 0);
    }

    #[tokio::test]
    async fn historical_upstream_failure_is_bad_gateway() {
        let gateways = TestGateways {
            exchange: MockExchange::new().failing_klines(400),
            ..TestGateways::default()
        };
        let app = app_with(memory_store(), gateways);

        let (status, body) = send(app, Method::POST, "/cryptos/NOPE/historical").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "upstream");
        assert!(body["message"].as_str().unwrap().contains("400"));
    }

    #[tokio::test]
    async fn realtime_for_tracked_symbol() {
        let store = memory_store();
        store.upsert_crypto(&tracked("BTC", 1.0)).unwrap();
        let app = app_with(store, full_gateways("BTC"));

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/realtime").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "BTC");
        assert_eq!(body["price"], 201.0);
    }

    #[tokio::test]
    async fn realtime_for_untracked_symbol_is_404() {
        let app = app_with(memory_store(), full_gateways("BTC"));

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/realtime").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }
}

mod predict {
    use super::*;

    async fn ingested_app() -> Router {
        let app = app_with(memory_store(), full_gateways("BTC"));
        let (status, _) = send(app.clone(), Method::POST, "/cryptos/BTC/historical").await;
        assert_eq!(status, StatusCode::OK);
        app
    }

    #[tokio::test]
    async fn predict_short_returns_forecast() {
        let app = ingested_app().await;

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/predict?timeframe=short").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "BTC");
        assert_eq!(body["timeframe"], "short");
        assert!(body["prediction"].as_f64().unwrap().is_finite());
        let action = body["action"].as_str().unwrap();
        assert!(["comprar", "vender", "aguantar"].contains(&action));
    }

    #[tokio::test]
    async fn predict_long_returns_forecast() {
        let app = ingested_app().await;

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/predict?timeframe=long").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timeframe"], "long");
    }

    #[tokio::test]
    async fn predict_invalid_timeframe_is_400() {
        let app = ingested_app().await;

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/predict?timeframe=weekly").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_timeframe");
    }

    #[tokio::test]
    async fn predict_missing_timeframe_is_400() {
        let app = ingested_app().await;

        let (status, _) = send(app, Method::GET, "/cryptos/BTC/predict").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn predict_insufficient_data_is_422() {
        let store = memory_store();
        store
            .insert_missing_points(&make_points("BTC", Interval::Daily, &wavy_closes(8, 100.0)))
            .unwrap();
        let app = app_with(store, full_gateways("BTC"));

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/predict?timeframe=short").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "insufficient_data");
    }

    #[tokio::test]
    async fn predict_rising_series_names_undefined_rsi() {
        let store = memory_store();
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        store
            .insert_missing_points(&make_points("BTC", Interval::Daily, &closes))
            .unwrap();
        let app = app_with(store, full_gateways("BTC"));

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/predict?timeframe=short").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "undefined_feature");
        assert!(body["message"].as_str().unwrap().contains("RSI is undefined for every one of 60 rows"));
    }

    #[tokio::test]
    async fn predict_bad_query_is_json_400() {
        let app = app_with(memory_store(), TestGateways::default());

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/predict?timeframe=short&timeframe=long").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "bad_request");
    }

    #[tokio::test]
    async fn predict_after_delete_is_404() {
        let app = ingested_app().await;

        let (status, body) = send(app.clone(), Method::DELETE, "/cryptos/BTC").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detail"], "Crypto BTC deleted successfully");

        let (status, _) = send(app.clone(), Method::GET, "/cryptos/BTC/predict?timeframe=short").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(app, Method::GET, "/cryptos/BTC/realtime").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod sentiment_endpoints {
    use super::*;

    #[tokio::test]
    async fn news_lists_headlines() {
        let app = app_with(memory_store(), full_gateways("BTC"));

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/news?max_results=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "BTC");
        let news = body["news"].as_array().unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0]["sentiment"], "positive");
        assert!(news[0]["published_at"].is_string());
    }

    #[tokio::test]
    async fn mentions_default_limit() {
        let app = app_with(memory_store(), full_gateways("BTC"));

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/mentions").await;
        assert_eq!(status, StatusCode::OK);
        let mentions = body["mentions"].as_array().unwrap();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0]["comment"], "buy the dip");
        assert_eq!(mentions[0]["created_at"], 1_700_000_000);
    }

    #[tokio::test]
    async fn trends_returns_points() {
        let app = app_with(memory_store(), full_gateways("BTC"));

        let (status, body) = send(app, Method::GET, "/cryptos/BTC/trends?timeframe=today%203-m").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trends"][0]["date"], "2024-03-01");
        assert_eq!(body["trends"][0]["popularity"], 77);
    }

    #[tokio::test]
    async fn empty_sources_are_404() {
        let app = app_with(memory_store(), TestGateways::default());

        for uri in ["/cryptos/BTC/news", "/cryptos/BTC/mentions", "/cryptos/BTC/trends"] {
            let (status, body) = send(app.clone(), Method::GET, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["kind"], "not_found");
        }
    }

    #[tokio::test]
    async fn bad_max_results_is_rejected() {
        let app = app_with(memory_store(), full_gateways("BTC"));

        for uri in [
            "/cryptos/BTC/news?max_results=lots",
            "/cryptos/BTC/mentions?max_results=-1",
        ] {
            let (status, body) = send(app.clone(), Method::GET, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["kind"], "bad_request", "{uri}");
            assert!(body["message"].as_str().unwrap().contains("max_results"), "{uri}");
        }
    }
}
