// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET /                           landing text
//   GET /api/v1/health              liveness
//   GET /assets                     configured assets + quote asset
//   GET /assets/:asset              indicators on the default 1h timeframe
//   GET /assets/:asset/:timeframe   indicators on the given timeframe
//   *                               landing text for any other path
//
// CORS allows the configured chart front-end origin (`*` for any).
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::app_state::AppState;
use crate::pipeline::{gather_for_client, OutputRecord};
use crate::types::{AssetQuery, DEFAULT_TIMEFRAME};

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origin);

    Router::new()
        .route("/", get(home))
        .route("/api/v1/health", get(health))
        .route("/assets", get(assets))
        .route("/assets/:asset", get(asset_default_timeframe))
        .route("/assets/:asset/:timeframe", get(asset))
        .fallback(home)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            warn!(origin, error = %e, "invalid CORS origin, cross-origin requests disabled");
            layer
        }
    }
}

// =============================================================================
// Landing & health (public)
// =============================================================================

async fn home() -> &'static str {
    "home"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Assets
// =============================================================================

#[derive(Serialize)]
struct AssetsResponse<'a> {
    quote: &'a str,
    assets: &'a [String],
}

async fn assets(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(AssetsResponse {
        quote: &state.config.quote_asset,
        assets: &state.config.assets,
    })
    .into_response()
}

async fn asset_default_timeframe(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
) -> Result<Json<Vec<OutputRecord>>, ApiError> {
    indicators_for(state, asset, DEFAULT_TIMEFRAME.to_string()).await
}

async fn asset(
    State(state): State<Arc<AppState>>,
    Path((asset, timeframe)): Path<(String, String)>,
) -> Result<Json<Vec<OutputRecord>>, ApiError> {
    indicators_for(state, asset, timeframe).await
}

async fn indicators_for(
    state: Arc<AppState>,
    asset: String,
    timeframe: String,
) -> Result<Json<Vec<OutputRecord>>, ApiError> {
    let query = AssetQuery::from_path(&asset, &timeframe, &state.config.quote_asset)?;
    let span = info_span!("indicators", request_id = %Uuid::new_v4(), query = %query);

    async {
        let records = gather_for_client(
            state.source.as_ref(),
            &query,
            state.config.request_limit,
            &state.config.indicators,
        )
        .await
        .map_err(|e| ApiError::from_pipeline(e, &query.symbol, &query.interval))?;

        info!(count = records.len(), "indicator records served");
        Ok::<_, ApiError>(Json(records))
    }
    .instrument(span)
    .await
}
