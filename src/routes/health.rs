//! # routes::health
//!
//! `GET /api/health`: liveness plus a one-line view of the ledger.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::SharedState;

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let (positions, trades, cost_basis) = state.ledger.summary().await;

    Json(json!({
        "ok":         true,
        "positions":  positions,
        "trades":     trades,
        "costBasis":  cost_basis,
    }))
}
