//! # routes::portfolio
//!
//! | Method | Path                     | Description                              |
//! |--------|--------------------------|------------------------------------------|
//! | GET    | `/api/portfolio`         | Current positions                        |
//! | POST   | `/api/portfolio`         | Buy: open or average into a position     |
//! | DELETE | `/api/portfolio/:symbol` | Sell: full holding, or `qty` shares      |

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, state::SharedState};

// ─── GET /api/portfolio ───────────────────────────────────────────────────────

pub async fn list_positions(State(state): State<SharedState>) -> impl IntoResponse {
    let portfolio = state.ledger.positions().await;
    Json(json!({ "ok": true, "portfolio": portfolio }))
}

// ─── POST /api/portfolio ──────────────────────────────────────────────────────

/// ### Request body (JSON)
/// ```json
/// { "symbol": "HUBC", "qty": 100, "price": 95.5 }
/// ```
#[derive(Debug, Deserialize)]
pub struct BuyBody {
    pub symbol: Option<String>,
    #[serde(alias = "quantity")]
    pub qty: Option<f64>,
    pub price: Option<f64>,
}

pub async fn buy_position(
    State(state): State<SharedState>,
    body: Result<Json<BuyBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let (Some(symbol), Some(qty), Some(price)) = (body.symbol, body.qty, body.price) else {
        return Err(AppError::InvalidInput("Missing symbol, qty, or price".into()));
    };

    let portfolio = state.ledger.apply_buy(&symbol, qty, price).await?;

    Ok(Json(json!({
        "ok":        true,
        "success":   true,
        "portfolio": portfolio,
    })))
}

// ─── DELETE /api/portfolio/:symbol ────────────────────────────────────────────

/// ### Request body (JSON)
/// ```json
/// { "sellPrice": 101.25 }
/// { "sellPrice": 101.25, "qty": 40 }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellBody {
    pub sell_price: Option<f64>,
    #[serde(alias = "quantity")]
    pub qty: Option<f64>,
}

pub async fn sell_position(
    State(state): State<SharedState>,
    Path(symbol): Path<String>,
    body: Option<Json<SellBody>>,
) -> Result<impl IntoResponse, AppError> {
    let body = body.map(|Json(b)| b);
    let sell_price = body
        .as_ref()
        .and_then(|b| b.sell_price)
        .ok_or_else(|| AppError::InvalidInput("Missing sellPrice".into()))?;
    let qty = body.and_then(|b| b.qty);

    let receipt = state.ledger.apply_sell(&symbol, sell_price, qty).await?;

    Ok(Json(json!({
        "ok":         true,
        "success":    true,
        "message":    format!("Sold {}", receipt.symbol),
        "symbol":     receipt.symbol,
        "qty":        receipt.quantity,
        "newBalance": receipt.proceeds,
    })))
}
