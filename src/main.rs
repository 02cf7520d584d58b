//! # psx-spotter — Portfolio Ledger & Volume-Leaders Diff
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐  GET/POST/DELETE /api/portfolio   ┌─────────────────────────┐
//!  │  Browser UI  │ ─────────────────────────────────▶│ AppState                │
//!  │              │  GET /api/trades                  │ ├─ ledger    ──▶ portfolio.json
//!  └──────────────┘  GET /api/snapshot                │ │               trades.json
//!                                                     │ └─ snapshots ◀── data/*.json
//!  ┌──────────────┐  writes data/<YYYY-MM-DD>.json    └─────────────────────────┘
//!  │  Scraper     │ ───────────────────────────────────────────────────▲
//!  └──────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable         | Default          | Description                          |
//! |------------------|------------------|--------------------------------------|
//! | `BIND_ADDR`      | `0.0.0.0:3000`   | Address Axum listens on              |
//! | `PORTFOLIO_PATH` | `portfolio.json` | Current positions                    |
//! | `TRADES_PATH`    | `trades.json`    | Trade log                            |
//! | `DATA_DIR`       | `data`           | Daily volume-leader snapshots        |
//! | `RUST_LOG`       | `psx_spotter=debug` | Tracing filter                    |

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod engine;
mod error;
mod models;
mod routes;
mod state;
mod store;

use config::Config;
use state::build_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("psx_spotter=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    // ── 3. Config & shared state ──────────────────────────────────────────────
    let config = Config::from_env()?;
    info!(?config, "⚙️ Configuration loaded");

    let state = build_state(&config).await?;

    // ── 4. Router ─────────────────────────────────────────────────────────────
    let app = routes::router(state);

    // ── 5. Bind & Serve ───────────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "📊 psx-spotter server starting");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
