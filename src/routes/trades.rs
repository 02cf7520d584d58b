//! # routes::trades
//!
//! `GET /api/trades?symbol=&type=&from=&to=`: the trade log, filtered.
//! Every parameter is optional; bad values narrow the result instead of
//! failing the request.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{models::TradeQuery, state::SharedState};

pub async fn list_trades(
    State(state): State<SharedState>,
    Query(query): Query<TradeQuery>,
) -> impl IntoResponse {
    let trades = state.ledger.query_trades(&query).await;
    Json(json!({ "ok": true, "trades": trades }))
}
