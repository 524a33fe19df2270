// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The agent is read-only apart from the
// cache reset, so no endpoint requires authentication.
//
// CORS is configured permissively so the dashboard can be served from any
// origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::market_data::HistoryPeriod;
use crate::runtime_config::RuntimeConfig;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analysis/:symbol", get(analysis))
        .route("/api/v1/scan", get(scan))
        .route("/api/v1/config", get(config))
        .route("/api/v1/cache/clear", post(cache_clear))
        .layer(cors)
        .with_state(state)
}

/// Parse an optional `period` query value, defaulting to the configured one.
fn resolve_period(raw: Option<&str>, state: &AppState) -> Result<HistoryPeriod, ApiError> {
    match raw {
        Some(p) => p
            .parse::<HistoryPeriod>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string())),
        None => Ok(state.runtime_config.read().period),
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    uptime_secs: u64,
    cached_reports: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        cached_reports: state.cache.len(),
    };
    Json(resp)
}

// =============================================================================
// Single-symbol analysis
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnalysisQuery {
    period: Option<String>,
    fallback: Option<bool>,
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if symbol.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "symbol must not be empty"));
    }

    let period = resolve_period(query.period.as_deref(), &state)?;
    let allow_fallback = query
        .fallback
        .unwrap_or_else(|| state.runtime_config.read().demo_fallback);

    match state.analyze(&symbol, period, allow_fallback).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "analysis request failed");
            Err(api_error(StatusCode::BAD_GATEWAY, format!("{e:#}")))
        }
    }
}

// =============================================================================
// Scan over configured symbols
// =============================================================================

#[derive(Debug, Deserialize)]
struct ScanQuery {
    limit: Option<usize>,
    period: Option<String>,
}

async fn scan(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScanQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = resolve_period(query.period.as_deref(), &state)?;
    let (symbols, default_limit, allow_fallback) = {
        let config = state.runtime_config.read();
        (config.symbols.clone(), config.scan_limit, config.demo_fallback)
    };
    let limit = RuntimeConfig::clamp_scan_limit(query.limit.unwrap_or(default_limit));

    let rows = state.scan(&symbols, limit, period, allow_fallback).await;
    Ok(Json(rows))
}

// =============================================================================
// Configuration (read-only)
// =============================================================================

async fn config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.runtime_config.read().clone();
    Json(config)
}

// =============================================================================
// Cache control
// =============================================================================

async fn cache_clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cleared = state.cache.clear();
    info!(cleared, "analysis cache cleared via API");
    Json(serde_json::json!({ "cleared": cleared }))
}
