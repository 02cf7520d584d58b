//! # models::trade
//!
//! [`Trade`] is one immutable entry of the append-only trade log.  The log is
//! the system of record: the portfolio can always be rebuilt from it.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── TradeKind ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Buy,
    Sell,
}

impl FromStr for TradeKind {
    type Err = ();

    /// Case-insensitive: `"buy"`, `"BUY"` and `"Buy"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(TradeKind::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(TradeKind::Sell)
        } else {
            Err(())
        }
    }
}

// ─── Trade ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Absent on records written before ids were introduced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(rename = "type")]
    pub kind: TradeKind,

    pub symbol: String,

    #[serde(rename = "qty", alias = "quantity")]
    pub quantity: f64,

    /// Fill price of this trade (never the blended average).
    pub price: f64,

    /// `price × quantity`, Sell only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proceeds: Option<f64>,

    #[serde(rename = "date", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn buy(symbol: impl Into<String>, quantity: f64, price: f64, at: DateTime<Utc>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            kind: TradeKind::Buy,
            symbol: symbol.into(),
            quantity,
            price,
            proceeds: None,
            timestamp: at,
        }
    }

    pub fn sell(symbol: impl Into<String>, quantity: f64, price: f64, at: DateTime<Utc>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            kind: TradeKind::Sell,
            symbol: symbol.into(),
            quantity,
            price,
            proceeds: Some(price * quantity),
            timestamp: at,
        }
    }
}

// ─── TradeLog ─────────────────────────────────────────────────────────────────

/// Append-only, insertion-ordered list of trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeLog {
    trades: Vec<Trade>,
}

impl TradeLog {
    pub fn append(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn all(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

impl From<Vec<Trade>> for TradeLog {
    fn from(trades: Vec<Trade>) -> Self {
        Self { trades }
    }
}

// ─── TradeQuery ───────────────────────────────────────────────────────────────

/// Raw `GET /api/trades` query string.  Empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeQuery {
    pub symbol: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_parse_case_insensitive() {
        assert_eq!("BUY".parse::<TradeKind>(), Ok(TradeKind::Buy));
        assert_eq!("sell".parse::<TradeKind>(), Ok(TradeKind::Sell));
        assert!("short".parse::<TradeKind>().is_err());
    }

    #[test]
    fn test_sell_records_proceeds() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let trade = Trade::sell("PSO", 40.0, 12.5, at);
        assert_eq!(trade.proceeds, Some(500.0));
        assert_eq!(Trade::buy("PSO", 40.0, 12.5, at).proceeds, None);
    }

    #[test]
    fn test_reads_legacy_record() {
        // Record shape produced by the previous service: no id, JS ISO date.
        let json = r#"{"type":"Sell","symbol":"LUCK","qty":3,"price":700,
                       "proceeds":2100,"date":"2024-03-05T10:15:00.000Z"}"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.id, None);
        assert_eq!(trade.kind, TradeKind::Sell);
        assert_eq!(trade.proceeds, Some(2100.0));
        assert_eq!(
            trade.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 0).unwrap()
        );

        let back = serde_json::to_value(&trade).unwrap();
        assert_eq!(back["type"], "Sell");
        assert_eq!(back["qty"], 3.0);
        assert!(back.get("id").is_none());
    }
}
