//! # engine::trade_query
//!
//! Compiles a raw [`TradeQuery`] into a [`TradeFilter`].
//!
//! The read path is permissive: an unparseable date bound or an unknown trade
//! type never raises an error, it simply matches no trade.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::{Trade, TradeKind, TradeQuery};

/// One filter clause: either a value to compare with, or a value that could
/// not be understood and therefore matches nothing.
#[derive(Debug, Clone, PartialEq)]
enum Clause<T> {
    Is(T),
    Unmatchable,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeFilter {
    symbol: Option<String>,
    kind: Option<Clause<TradeKind>>,
    from: Option<Clause<DateTime<Utc>>>,
    to: Option<Clause<DateTime<Utc>>>,
}

impl TradeFilter {
    pub fn from_query(query: &TradeQuery) -> Self {
        Self {
            symbol: present(&query.symbol).map(str::to_uppercase),
            kind: present(&query.kind).map(|k| match k.parse::<TradeKind>() {
                Ok(kind) => Clause::Is(kind),
                Err(()) => Clause::Unmatchable,
            }),
            from: present(&query.from).map(|s| bound(s, NaiveTime::MIN)),
            to: present(&query.to).map(|s| bound(s, end_of_day())),
        }
    }

    /// Conjunction of every supplied clause.
    pub fn matches(&self, trade: &Trade) -> bool {
        if let Some(symbol) = &self.symbol {
            if &trade.symbol != symbol {
                return false;
            }
        }

        let kind_ok = match &self.kind {
            None => true,
            Some(Clause::Is(kind)) => trade.kind == *kind,
            Some(Clause::Unmatchable) => false,
        };
        let from_ok = match &self.from {
            None => true,
            Some(Clause::Is(from)) => trade.timestamp >= *from,
            Some(Clause::Unmatchable) => false,
        };
        let to_ok = match &self.to {
            None => true,
            Some(Clause::Is(to)) => trade.timestamp <= *to,
            Some(Clause::Unmatchable) => false,
        };

        kind_ok && from_ok && to_ok
    }
}

/// Empty query parameters (`?symbol=`) count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

/// Parse an RFC 3339 instant, or a plain `YYYY-MM-DD` date pinned to
/// `time_of_day` in UTC.
fn bound(raw: &str, time_of_day: NaiveTime) -> Clause<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Clause::Is(instant.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Clause::Is(date.and_time(time_of_day).and_utc()),
        Err(_) => Clause::Unmatchable,
    }
}
