//! HTTP surface.  Handlers stay thin: parse, call an engine, shape the JSON.

pub mod health;
pub mod portfolio;
pub mod snapshot;
pub mod trades;

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::SharedState;

use health::health_check;
use portfolio::{buy_position, list_positions, sell_position};
use snapshot::compare_snapshots;
use trades::list_trades;

/// Build the full router with CORS and request tracing.
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Ledger ────────────────────────────────────────────────────────────
        .route("/api/portfolio",          get(list_positions).post(buy_position))
        .route("/api/portfolio/:symbol",  delete(sell_position))
        .route("/api/trades",             get(list_trades))
        // ── Snapshots ─────────────────────────────────────────────────────────
        .route("/api/snapshot",           get(compare_snapshots))
        // ── Ops ───────────────────────────────────────────────────────────────
        .route("/api/health",             get(health_check))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
