//! # state
//!
//! Shared application state: one handle per engine, each built around the
//! store it was given.  Cloned cheaply into every Axum handler via
//! `axum::extract::State`.

use std::sync::Arc;

use crate::config::Config;
use crate::engine::{LedgerEngine, SnapshotDiffEngine};
use crate::error::AppError;
use crate::store::{DirSnapshotStore, JsonFileLedgerStore, LedgerStore, SnapshotStore};

// ─── AppState ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    /// Positions + trade log.  Serialises its own writers.
    pub ledger: Arc<LedgerEngine>,

    /// Read-only view over the daily snapshot files.
    pub snapshots: Arc<SnapshotDiffEngine>,
}

impl AppState {
    /// Wire both engines to the given stores.  Loads the ledger.
    pub async fn new(
        ledger_store: Arc<dyn LedgerStore>,
        snapshot_store: Arc<dyn SnapshotStore>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            ledger: Arc::new(LedgerEngine::open(ledger_store).await?),
            snapshots: Arc::new(SnapshotDiffEngine::new(snapshot_store)),
        })
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

/// Build the production state: JSON ledger files and the snapshot directory
/// named in `config`.
pub async fn build_state(config: &Config) -> Result<SharedState, AppError> {
    let ledger_store = Arc::new(JsonFileLedgerStore::new(
        &config.portfolio_path,
        &config.trades_path,
    ));
    let snapshot_store = Arc::new(DirSnapshotStore::new(&config.data_dir));

    Ok(Arc::new(AppState::new(ledger_store, snapshot_store).await?))
}
