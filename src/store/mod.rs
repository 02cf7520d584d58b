//! # store
//!
//! Persistence seams for the two engines.  Both are injected into
//! [`AppState`](crate::state::AppState) at startup; the engines never touch
//! the filesystem themselves.
//!
//! | Trait             | Production impl        | Used by               |
//! |-------------------|------------------------|-----------------------|
//! | [`LedgerStore`]   | [`JsonFileLedgerStore`] | Ledger Engine        |
//! | [`SnapshotStore`] | [`DirSnapshotStore`]   | Snapshot Diff Engine  |

use async_trait::async_trait;

use crate::engine::ledger::Ledger;
use crate::error::AppError;
use crate::models::{RawSnapshot, Snapshot};

pub mod json_file;
#[cfg(test)]
pub mod memory;
pub mod snapshot_dir;

pub use json_file::JsonFileLedgerStore;
pub use snapshot_dir::DirSnapshotStore;

// ─── Ledger ───────────────────────────────────────────────────────────────────

/// Positions and trade log, loaded and saved together so a mutation is never
/// half-visible.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<Ledger, AppError>;

    async fn save(&self, ledger: &Ledger) -> Result<(), AppError>;
}

// ─── Snapshots ────────────────────────────────────────────────────────────────

/// Read-only view over the dated snapshot files.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// All snapshot keys (date stems), sorted ascending.
    async fn list(&self) -> Result<Vec<String>, AppError>;

    /// The payload stored under `key`, in whatever shape it was written.
    async fn read(&self, key: &str) -> Result<RawSnapshot, AppError>;

    /// [`read`](Self::read) followed by shape normalization.
    async fn load(&self, key: &str) -> Result<Snapshot, AppError> {
        self.read(key).await?.normalize()
    }
}
