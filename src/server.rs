//! HTTP surface for the web client.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/scrape?query=<q>` | Scrape, score and rank comments for `q` |
//! | `GET`  | `/health` | Liveness check with a timestamp |
//!
//! Failures are always JSON: `400 { error }` for a missing query and
//! `500 { success: false, error, details }` when the scrape itself fails.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query as Params, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::models::{Query, QueryError, ScoredRecord};
use crate::scraper::Scraper;

const SCRAPE_FAILED: &str = "Failed to scrape TikTok comments";

#[derive(Clone)]
struct AppState {
    scraper: Arc<Scraper>,
}

pub async fn run_server(scraper: Arc<Scraper>, config: &ServerConfig) -> anyhow::Result<()> {
    let app = router(scraper, &config.cors_origins);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    info!("Reno Radar backend running on port {}", config.port);
    info!("Health check: http://localhost:{}/health", config.port);
    info!(
        "Scrape endpoint: http://localhost:{}/api/scrape?query=renovation",
        config.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(scraper: Arc<Scraper>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/scrape", get(handle_scrape))
        .route("/health", get(handle_health))
        .layer(cors_layer(cors_origins))
        .with_state(AppState { scraper })
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o.trim()) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

// ── GET /api/scrape ──

#[derive(Deserialize)]
struct ScrapeParams {
    query: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeResponse {
    success: bool,
    query: String,
    total_results: usize,
    comments: Vec<ScoredRecord>,
}

#[derive(Serialize)]
struct BadRequest {
    error: String,
}

#[derive(Serialize)]
struct ScrapeFailure {
    success: bool,
    error: &'static str,
    details: String,
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(BadRequest { error })).into_response()
}

async fn handle_scrape(
    State(state): State<AppState>,
    params: Result<Params<ScrapeParams>, QueryRejection>,
) -> Response {
    // An unreadable query string is reported like a missing query.
    let raw = match params {
        Ok(Params(p)) => p.query,
        Err(rejection) => {
            warn!("Rejected scrape query string: {}", rejection.body_text());
            None
        }
    };
    let query = match Query::parse(raw.as_deref().unwrap_or_default()) {
        Ok(q) => q,
        Err(e @ QueryError::Empty) => return bad_request(e.to_string()),
    };

    match state.scraper.run(&query).await {
        Ok(results) => Json(ScrapeResponse {
            success: true,
            total_results: results.total(),
            query: results.query,
            comments: results.records,
        })
        .into_response(),
        Err(e) => {
            error!("Scrape error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScrapeFailure {
                    success: false,
                    error: SCRAPE_FAILED,
                    details: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

// ── GET /health ──

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

// ── Tests ──
