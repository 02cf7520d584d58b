//! # routes::snapshot
//!
//! `GET /api/snapshot`: today's volume leaders and the symbols that were not
//! among yesterday's.
//!
//! ### Response
//! ```json
//! {
//!   "ok": true,
//!   "date": "2024-01-02",
//!   "volumeLeaders": [ { "symbol": "A", "volume": "3" }, { "symbol": "C", "volume": "4" } ],
//!   "newEntries":    [ { "symbol": "C", "volume": "4" } ]
//! }
//! ```

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::AppError, state::SharedState};

pub async fn compare_snapshots(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let comparison = state.snapshots.compare_latest_two().await?;

    Ok(Json(json!({
        "ok":            true,
        "date":          comparison.date,
        "volumeLeaders": comparison.volume_leaders,
        "newEntries":    comparison.new_entries,
    })))
}
