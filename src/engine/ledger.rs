//! # engine::ledger
//!
//! **Ledger Engine**: weighted-average cost basis on buys, realized proceeds
//! on sells, and the filtered trade-log query.
//!
//! [`Ledger`] holds the pure accounting rules.  [`LedgerEngine`] wraps it for
//! the request path: every mutation runs against a copy, is persisted through
//! the injected [`LedgerStore`], and only then becomes visible.
//!
//! ## Position lifecycle (per symbol)
//!
//! ```text
//!   absent ──buy──▶ open ──buy / partial sell──▶ open
//!                    │
//!                    └──sell (full quantity)──▶ absent
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::trade_query::TradeFilter;
use crate::error::AppError;
use crate::models::{Portfolio, Position, Trade, TradeKind, TradeLog, TradeQuery};
use crate::store::LedgerStore;

// ─── Ledger ───────────────────────────────────────────────────────────────────

/// Positions plus the trade log that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub portfolio: Portfolio,
    pub trades: TradeLog,
}

/// Outcome of a sell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleReceipt {
    pub symbol: String,
    #[serde(rename = "qty")]
    pub quantity: f64,
    pub proceeds: f64,
}

impl Ledger {
    /// Record a buy of `quantity` shares at `price`.
    ///
    /// Opens the position on first buy, otherwise blends the lot into the
    /// existing average.  The trade records the incoming price, not the
    /// blended one.
    pub fn apply_buy(
        &mut self,
        symbol: &str,
        quantity: f64,
        price: f64,
        at: DateTime<Utc>,
    ) -> Result<&Position, AppError> {
        let symbol = normalize_symbol(symbol)?;
        let quantity = require_positive("qty", quantity)?;
        let price = require_positive("price", price)?;

        match self.portfolio.get_mut(&symbol) {
            Some(position) => position.blend(quantity, price),
            None => self
                .portfolio
                .upsert(Position::new(symbol.clone(), quantity, price)),
        }
        self.trades.append(Trade::buy(symbol.clone(), quantity, price, at));

        self.portfolio
            .get(&symbol)
            .ok_or_else(|| anyhow::anyhow!("position {symbol} vanished after buy").into())
    }

    /// Dispose of a position at `sell_price`.
    ///
    /// Without `quantity` the whole holding is sold.  With it, the holding is
    /// reduced and only removed once nothing is left; the average price of the
    /// remainder is unchanged.
    pub fn apply_sell(
        &mut self,
        symbol: &str,
        sell_price: f64,
        quantity: Option<f64>,
        at: DateTime<Utc>,
    ) -> Result<SaleReceipt, AppError> {
        let symbol = normalize_symbol(symbol)?;
        let sell_price = require_positive("sellPrice", sell_price)?;
        let requested = quantity.map(|q| require_positive("qty", q)).transpose()?;

        let held = self
            .portfolio
            .get(&symbol)
            .map(|p| p.quantity)
            .ok_or_else(|| AppError::NotFound(format!("Stock not found: {symbol}")))?;

        let sold = match requested {
            None => held,
            Some(q) if q > held => {
                return Err(AppError::InvalidInput(format!(
                    "Cannot sell {q} {symbol}: only {held} held"
                )))
            }
            Some(q) => q,
        };

        if sold >= held {
            self.portfolio.remove(&symbol);
        } else if let Some(position) = self.portfolio.get_mut(&symbol) {
            position.quantity = held - sold;
        }

        let trade = Trade::sell(symbol.clone(), sold, sell_price, at);
        let proceeds = trade.proceeds.unwrap_or(sell_price * sold);
        self.trades.append(trade);

        Ok(SaleReceipt {
            symbol,
            quantity: sold,
            proceeds,
        })
    }

    /// Trades matching `filter`, in insertion order.
    pub fn query_trades(&self, filter: &TradeFilter) -> Vec<Trade> {
        self.trades
            .all()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }
}

/// Rebuild the position set by folding the trade log through the same rules
/// the live ledger applies.
pub fn replay(trades: &[Trade]) -> Result<Portfolio, AppError> {
    let mut ledger = Ledger::default();
    for trade in trades {
        match trade.kind {
            TradeKind::Buy => {
                ledger.apply_buy(&trade.symbol, trade.quantity, trade.price, trade.timestamp)?;
            }
            TradeKind::Sell => {
                ledger.apply_sell(
                    &trade.symbol,
                    trade.price,
                    Some(trade.quantity),
                    trade.timestamp,
                )?;
            }
        }
    }
    Ok(ledger.portfolio)
}

// ─── Validation ───────────────────────────────────────────────────────────────

/// Symbols are stored trimmed and upper-cased.
pub fn normalize_symbol(symbol: &str) -> Result<String, AppError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::InvalidInput("Missing symbol".into()));
    }
    Ok(symbol.to_uppercase())
}

fn require_positive(field: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::InvalidInput(format!(
            "{field} must be a positive number, got {value}"
        )))
    }
}

// ─── LedgerEngine ─────────────────────────────────────────────────────────────

/// Shared, persisted ledger used by the HTTP handlers.
///
/// Writers hold the write lock across compute, persist and swap, so at most
/// one mutation is in flight.  Readers always see a committed ledger.
pub struct LedgerEngine {
    book: RwLock<Ledger>,
    store: Arc<dyn LedgerStore>,
}

impl LedgerEngine {
    /// Load the current ledger from `store`.
    pub async fn open(store: Arc<dyn LedgerStore>) -> Result<Self, AppError> {
        let ledger = store.load().await?;
        Ok(Self {
            book: RwLock::new(ledger),
            store,
        })
    }

    pub async fn positions(&self) -> Vec<Position> {
        self.book.read().await.portfolio.all().to_vec()
    }

    /// `(positions, trades, total cost basis)`
    pub async fn summary(&self) -> (usize, usize, f64) {
        let book = self.book.read().await;
        (
            book.portfolio.len(),
            book.trades.len(),
            book.portfolio.total_cost_basis(),
        )
    }

    /// Buy and return the refreshed position set.
    pub async fn apply_buy(
        &self,
        symbol: &str,
        quantity: f64,
        price: f64,
    ) -> Result<Vec<Position>, AppError> {
        let positions = self
            .commit(|ledger| {
                let position = ledger.apply_buy(symbol, quantity, price, Utc::now())?;
                info!(
                    symbol = %position.symbol,
                    qty = quantity,
                    price,
                    held = position.quantity,
                    avg_price = position.average_price,
                    "🟢 [LEDGER] Buy recorded"
                );
                Ok(ledger.portfolio.all().to_vec())
            })
            .await;

        if let Err(e) = &positions {
            warn!(symbol, qty = quantity, price, error = %e, "Buy rejected");
        }
        positions
    }

    pub async fn apply_sell(
        &self,
        symbol: &str,
        sell_price: f64,
        quantity: Option<f64>,
    ) -> Result<SaleReceipt, AppError> {
        let receipt = self
            .commit(|ledger| ledger.apply_sell(symbol, sell_price, quantity, Utc::now()))
            .await;

        match &receipt {
            Ok(r) => info!(
                symbol = %r.symbol,
                qty = r.quantity,
                price = sell_price,
                proceeds = r.proceeds,
                "🔴 [LEDGER] Sell recorded"
            ),
            Err(e) => warn!(symbol, price = sell_price, error = %e, "Sell rejected"),
        }
        receipt
    }

    pub async fn query_trades(&self, query: &TradeQuery) -> Vec<Trade> {
        let filter = TradeFilter::from_query(query);
        let trades = self.book.read().await.query_trades(&filter);
        debug!(?query, matched = trades.len(), "Trade log queried");
        trades
    }

    /// Apply `op` to a copy of the ledger, persist it, then swap it in.
    /// Nothing changes, in memory or on disk, if either step fails.
    async fn commit<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Ledger) -> Result<T, AppError>,
    {
        let mut book = self.book.write().await;
        let mut next = book.clone();
        let out = op(&mut next)?;
        self.store.save(&next).await?;
        *book = next;
        Ok(out)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
