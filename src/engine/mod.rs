//! Core engines: the portfolio ledger and the snapshot diff.

pub mod diff;
pub mod ledger;
pub mod trade_query;

pub use diff::SnapshotDiffEngine;
pub use ledger::LedgerEngine;
