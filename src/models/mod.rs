//! Domain models shared by the ledger and the snapshot diff engine.

pub mod position;
pub mod snapshot;
pub mod trade;

pub use position::{Portfolio, Position};
pub use snapshot::{RawSnapshot, Snapshot, SnapshotComparison, VolumeLeader};
pub use trade::{Trade, TradeKind, TradeLog, TradeQuery};
