//! # config — settings read from environment variables
//!
//! `.env` is loaded first by `main`; real environment variables win.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address Axum listens on.
    pub bind_addr: SocketAddr,
    /// Current positions.
    pub portfolio_path: PathBuf,
    /// Append-only trade log.
    pub trades_path: PathBuf,
    /// Directory the scraper writes `<YYYY-MM-DD>.json` snapshots into.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:3000")
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address, e.g. 0.0.0.0:3000")?;

        Ok(Self {
            bind_addr,
            portfolio_path: env_or("PORTFOLIO_PATH", "portfolio.json").into(),
            trades_path:    env_or("TRADES_PATH", "trades.json").into(),
            data_dir:       env_or("DATA_DIR", "data").into(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
