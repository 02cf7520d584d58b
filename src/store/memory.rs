//! In-memory store implementations for unit and router tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{LedgerStore, SnapshotStore};
use crate::engine::ledger::Ledger;
use crate::error::AppError;
use crate::models::RawSnapshot;

// ─── Ledger ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryLedgerStore {
    ledger: RwLock<Ledger>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryLedgerStore {
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            ..Self::default()
        }
    }

    /// Make every following `save` fail, to exercise rollback paths.
    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn persisted(&self) -> Ledger {
        self.ledger.read().await.clone()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self) -> Result<Ledger, AppError> {
        Ok(self.ledger.read().await.clone())
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), AppError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(anyhow!("disk full").into());
        }
        *self.ledger.write().await = ledger.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ─── Snapshots ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemorySnapshotStore {
    files: BTreeMap<String, Value>,
}

impl InMemorySnapshotStore {
    pub fn with(mut self, key: &str, payload: Value) -> Self {
        self.files.insert(key.to_string(), payload);
        self
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn list(&self) -> Result<Vec<String>, AppError> {
        Ok(self.files.keys().cloned().collect())
    }

    async fn read(&self, key: &str) -> Result<RawSnapshot, AppError> {
        self.files
            .get(key)
            .map(|payload| RawSnapshot::new(key, payload.clone()))
            .ok_or_else(|| anyhow!("no snapshot {key}").into())
    }
}
