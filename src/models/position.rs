//! # models::position
//!
//! [`Position`] is one held symbol with its weighted-average cost basis;
//! [`Portfolio`] is the active set of positions, at most one per symbol.
//!
//! Persisted field names follow the existing `portfolio.json` files
//! (`qty`, `price`); the longer names are accepted on read.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::ledger::normalize_symbol;

// ─── Position ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,

    /// Shares held.  Always `> 0` while the position is in the portfolio.
    #[serde(rename = "qty", alias = "quantity")]
    pub quantity: f64,

    /// Weighted-average acquisition price.
    #[serde(rename = "price", alias = "averagePrice")]
    pub average_price: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            average_price: price,
        }
    }

    /// Blend a new lot into the cost basis.
    ///
    /// The average is computed from the quantity *before* it is increased.
    pub fn blend(&mut self, quantity: f64, price: f64) {
        let old_quantity = self.quantity;
        let total = old_quantity + quantity;
        self.average_price = (self.average_price * old_quantity + price * quantity) / total;
        self.quantity = total;
    }

    /// Cost basis of the whole holding.
    #[inline]
    pub fn cost_basis(&self) -> f64 {
        self.average_price * self.quantity
    }
}

// ─── Portfolio ────────────────────────────────────────────────────────────────

/// Active positions in first-bought order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl Portfolio {
    pub fn all(&self) -> &[Position] {
        &self.positions
    }

    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Position> {
        self.positions.iter_mut().find(|p| p.symbol == symbol)
    }

    /// Replace the position for `position.symbol` in place, or append it.
    pub fn upsert(&mut self, position: Position) {
        match self.get_mut(&position.symbol) {
            Some(existing) => *existing = position,
            None => self.positions.push(position),
        }
    }

    /// Drop the position for `symbol`, returning it if it was held.
    pub fn remove(&mut self, symbol: &str) -> Option<Position> {
        let idx = self.positions.iter().position(|p| p.symbol == symbol)?;
        Some(self.positions.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn total_cost_basis(&self) -> f64 {
        self.positions.iter().map(Position::cost_basis).sum()
    }
}

impl From<Vec<Position>> for Portfolio {
    /// Stored rows are brought under the same rules as live ones: symbols are
    /// normalized, case variants are folded into the first occurrence, and
    /// rows without a positive quantity and price are dropped.
    fn from(positions: Vec<Position>) -> Self {
        let mut portfolio = Portfolio::default();
        for mut p in positions {
            let symbol = match normalize_symbol(&p.symbol) {
                Ok(symbol) if is_positive(p.quantity) && is_positive(p.average_price) => symbol,
                _ => {
                    warn!(
                        symbol = %p.symbol,
                        qty = p.quantity,
                        price = p.average_price,
                        "⚠️ Dropping invalid stored position"
                    );
                    continue;
                }
            };
            p.symbol = symbol;
            match portfolio.get_mut(&p.symbol) {
                Some(existing) => existing.blend(p.quantity, p.average_price),
                None => portfolio.positions.push(p),
            }
        }
        portfolio
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_uses_pre_update_quantity() {
        let mut p = Position::new("HUBC", 10.0, 100.0);
        p.blend(30.0, 120.0);
        assert_eq!(p.quantity, 40.0);
        // (100*10 + 120*30) / 40 = 115
        assert!((p.average_price - 115.0).abs() < 1e-9);
    }

    #[test]
    fn test_upsert_keeps_order() {
        let mut portfolio = Portfolio::default();
        portfolio.upsert(Position::new("A", 1.0, 1.0));
        portfolio.upsert(Position::new("B", 1.0, 1.0));
        portfolio.upsert(Position::new("A", 5.0, 2.0));

        let symbols: Vec<_> = portfolio.all().iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, ["A", "B"]);
        assert_eq!(portfolio.get("A").map(|p| p.quantity), Some(5.0));
    }

    #[test]
    fn test_remove_returns_position() {
        let mut portfolio = Portfolio::from(vec![Position::new("A", 2.0, 3.0)]);
        assert_eq!(portfolio.remove("A"), Some(Position::new("A", 2.0, 3.0)));
        assert!(portfolio.is_empty());
        assert_eq!(portfolio.remove("A"), None);
    }

    #[test]
    fn test_from_vec_folds_duplicates() {
        let portfolio = Portfolio::from(vec![
            Position::new("A", 10.0, 10.0),
            Position::new("B", 1.0, 1.0),
            Position::new("A", 10.0, 20.0),
        ]);
        assert_eq!(portfolio.len(), 2);
        let a = portfolio.get("A").expect("A held");
        assert_eq!(a.quantity, 20.0);
        assert!((a.average_price - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_vec_normalizes_symbols() {
        let portfolio = Portfolio::from(vec![
            Position::new(" hubc ", 10.0, 100.0),
            Position::new("HUBC", 10.0, 120.0),
        ]);
        assert_eq!(portfolio.len(), 1);
        let hubc = portfolio.get("HUBC").expect("HUBC held");
        assert_eq!(hubc.quantity, 20.0);
        assert!((hubc.average_price - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_vec_drops_invalid_rows() {
        let portfolio = Portfolio::from(vec![
            Position::new("A", 0.0, 10.0),
            Position::new("B", 5.0, -1.0),
            Position::new("C", f64::NAN, 1.0),
            Position::new("  ", 1.0, 1.0),
            Position::new("D", 2.0, 3.0),
        ]);
        assert_eq!(portfolio.all(), [Position::new("D", 2.0, 3.0)]);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(Position::new("OGDC", 5.0, 80.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "symbol": "OGDC", "qty": 5.0, "price": 80.5 }));

        let p: Position =
            serde_json::from_str(r#"{"symbol":"OGDC","quantity":5,"averagePrice":80.5}"#).unwrap();
        assert_eq!(p, Position::new("OGDC", 5.0, 80.5));
    }
}
