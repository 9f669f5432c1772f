// =============================================================================
// API Errors — request-level failures as JSON responses
// =============================================================================
//
// Every failure leaves the server as `{"error": <code>, "message": <text>}`
// with a matching status.  No partial record list is ever sent alongside.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use crate::pipeline::PipelineError;
use crate::types::QueryError;

#[derive(Debug)]
pub enum ApiError {
    /// Path parameters could not form an upstream query.
    BadRequest(String),
    /// Upstream had nothing for the symbol / interval.
    NoData(String),
    /// Upstream rows could not be parsed.
    MalformedUpstream(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoData(_) => StatusCode::NOT_FOUND,
            Self::MalformedUpstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NoData(_) => "no_data",
            Self::MalformedUpstream(_) => "malformed_upstream_data",
            Self::Internal(_) => "internal_error",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::NoData(msg)
            | Self::MalformedUpstream(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Attach the requested symbol to a pipeline failure.
    pub fn from_pipeline(err: PipelineError, symbol: &str, interval: &str) -> Self {
        match err {
            PipelineError::NoData => {
                Self::NoData(format!("no data for {symbol} at interval {interval}"))
            }
            PipelineError::MalformedRow(e) => Self::MalformedUpstream(format!("{symbol}: {e}")),
            PipelineError::Aborted(msg) => Self::Internal(msg),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        let body = json!({ "error": self.code(), "message": self.message() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::LoadError;

    #[test]
    fn pipeline_errors_map_to_statuses() {
        let no_data = ApiError::from_pipeline(PipelineError::NoData, "UNKNOWNUSDT", "1h");
        assert_eq!(no_data.status(), StatusCode::NOT_FOUND);
        assert!(no_data.message().contains("UNKNOWNUSDT"));

        let malformed = ApiError::from_pipeline(
            PipelineError::MalformedRow(LoadError::MalformedRow {
                index: 2,
                reason: "close: 'x' is not a number".into(),
            }),
            "BTCUSDT",
            "1h",
        );
        assert_eq!(malformed.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(malformed.code(), "malformed_upstream_data");
    }

    #[test]
    fn query_errors_are_bad_requests() {
        let err: ApiError = QueryError::UnsupportedInterval("9x".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "bad_request: unsupported timeframe '9x'");
    }
}
