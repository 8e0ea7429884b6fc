//! HTTP error responses for the web adapter.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::error::{PredictionError, TrackerError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub kind: String,
}

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
    pub kind: String,
}

impl WebError {
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind: kind.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", message)
    }
}

pub fn status_from_error(err: &TrackerError) -> StatusCode {
    match err {
        TrackerError::NotFound { .. } => StatusCode::NOT_FOUND,
        TrackerError::Prediction { cause, .. } => match cause {
            PredictionError::InvalidTimeframe { .. } => StatusCode::BAD_REQUEST,
            PredictionError::InsufficientData { .. }
            | PredictionError::UndefinedFeature { .. }
            | PredictionError::NoTestData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PredictionError::ModelFit { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        },
        TrackerError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        TrackerError::Database { .. }
        | TrackerError::DatabaseQuery { .. }
        | TrackerError::ConfigParse { .. }
        | TrackerError::ConfigMissing { .. }
        | TrackerError::ConfigInvalid { .. }
        | TrackerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TrackerError> for WebError {
    fn from(err: TrackerError) -> Self {
        let status = status_from_error(&err);
        if status.is_server_error() {
            tracing::error!(error = %err, kind = err.kind(), "request failed");
        }
        Self::new(status, err.kind(), err.to_string())
    }
}

impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            kind: self.kind,
        };
        (self.status, Json(body)).into_response()
    }
}
