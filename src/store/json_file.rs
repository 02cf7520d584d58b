//! # store::json_file
//!
//! [`LedgerStore`] backed by two pretty-printed JSON files, `portfolio.json`
//! and `trades.json`.
//!
//! Reads accept a bare array or an object wrapping it
//! (`{"portfolio": [...]}`, `{"trades": [...]}`).  A missing file is an empty
//! list; a file that exists but does not parse is an error, never a reset.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use super::LedgerStore;
use crate::engine::ledger::{normalize_symbol, replay, Ledger};
use crate::error::AppError;
use crate::models::{Portfolio, Position, Trade, TradeLog};

pub struct JsonFileLedgerStore {
    portfolio_path: PathBuf,
    trades_path: PathBuf,
}

impl JsonFileLedgerStore {
    pub fn new(portfolio_path: impl Into<PathBuf>, trades_path: impl Into<PathBuf>) -> Self {
        Self {
            portfolio_path: portfolio_path.into(),
            trades_path: trades_path.into(),
        }
    }
}

#[async_trait]
impl LedgerStore for JsonFileLedgerStore {
    async fn load(&self) -> Result<Ledger, AppError> {
        let mut trades: Vec<Trade> = read_records(&self.trades_path, "trades")
            .await?
            .unwrap_or_default();
        for trade in &mut trades {
            if let Ok(symbol) = normalize_symbol(&trade.symbol) {
                trade.symbol = symbol;
            }
        }
        let positions: Option<Vec<Position>> =
            read_records(&self.portfolio_path, "portfolio").await?;

        let portfolio = match positions {
            Some(positions) => Portfolio::from(positions),
            None if !trades.is_empty() => {
                warn!(
                    path = %self.portfolio_path.display(),
                    trades = trades.len(),
                    "⚠️ Portfolio file missing, rebuilding positions from trade log"
                );
                replay(&trades)?
            }
            None => Portfolio::default(),
        };

        info!(
            positions = portfolio.len(),
            trades = trades.len(),
            "📒 Ledger loaded"
        );

        Ok(Ledger {
            portfolio,
            trades: TradeLog::from(trades),
        })
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), AppError> {
        let portfolio = serde_json::to_string_pretty(&ledger.portfolio)
            .context("Failed to serialize portfolio")?;
        let trades =
            serde_json::to_string_pretty(&ledger.trades).context("Failed to serialize trades")?;

        // Stage both files before swapping either one in.
        let portfolio_tmp = staging_path(&self.portfolio_path);
        let trades_tmp = staging_path(&self.trades_path);
        write_file(&portfolio_tmp, &portfolio).await?;
        write_file(&trades_tmp, &trades).await?;

        fs::rename(&trades_tmp, &self.trades_path)
            .await
            .with_context(|| format!("Failed to replace {}", self.trades_path.display()))?;
        fs::rename(&portfolio_tmp, &self.portfolio_path)
            .await
            .with_context(|| format!("Failed to replace {}", self.portfolio_path.display()))?;

        Ok(())
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// `portfolio.json` → `portfolio.json.tmp`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

async fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// `Ok(None)` when the file does not exist.
async fn read_records<T: DeserializeOwned>(
    path: &Path,
    wrapper_key: &str,
) -> anyhow::Result<Option<Vec<T>>> {
    let exists = fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check {}", path.display()))?;
    if !exists {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let records = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove(wrapper_key) {
            Some(inner @ Value::Array(_)) => inner,
            _ => bail!("{}: expected an array or {{\"{wrapper_key}\": [...]}}", path.display()),
        },
        _ => bail!("{}: expected an array or {{\"{wrapper_key}\": [...]}}", path.display()),
    };

    let parsed = serde_json::from_value(records)
        .with_context(|| format!("Invalid record in {}", path.display()))?;
    Ok(Some(parsed))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
