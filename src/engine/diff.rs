//! # engine::diff
//!
//! **Snapshot Diff Engine**: compares the two most recent volume-leader
//! snapshots and reports which symbols are new today.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Snapshot, SnapshotComparison, VolumeLeader};
use crate::store::SnapshotStore;

pub struct SnapshotDiffEngine {
    store: Arc<dyn SnapshotStore>,
}

impl SnapshotDiffEngine {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Diff the latest snapshot ("today") against the one before it.
    ///
    /// With a single snapshot, yesterday is empty and every row is new.
    pub async fn compare_latest_two(&self) -> Result<SnapshotComparison, AppError> {
        let keys = self.store.list().await?;

        let (today_key, yesterday_key) = match keys.as_slice() {
            [] => return Err(AppError::NoData("No data files found".into())),
            [today] => (today, None),
            [.., yesterday, today] => (today, Some(yesterday)),
        };

        let today = self.store.load(today_key).await?;
        let yesterday = match yesterday_key {
            Some(key) => self.store.load(key).await?.volume_leaders,
            None => Vec::new(),
        };

        let comparison = new_entries(today, &yesterday);
        info!(
            date = %comparison.date,
            previous = yesterday_key.map(String::as_str).unwrap_or("-"),
            leaders = comparison.volume_leaders.len(),
            new_entries = comparison.new_entries.len(),
            "📊 [SNAPSHOT] Compared latest volume leaders"
        );
        Ok(comparison)
    }
}

/// Rows of `today` whose symbol appears nowhere in `yesterday`, in today's
/// order.  Rank or volume changes of a known symbol do not make it new.
pub fn new_entries(today: Snapshot, yesterday: &[VolumeLeader]) -> SnapshotComparison {
    let seen: HashSet<&str> = yesterday.iter().map(|l| l.symbol.as_str()).collect();

    let new_entries: Vec<VolumeLeader> = today
        .volume_leaders
        .iter()
        .filter(|l| !seen.contains(l.symbol.as_str()))
        .cloned()
        .collect();

    debug!(yesterday = seen.len(), new = new_entries.len(), "Symbol diff computed");

    SnapshotComparison {
        date: today.date,
        volume_leaders: today.volume_leaders,
        new_entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemorySnapshotStore;
    use serde_json::json;

    fn symbols(rows: &[VolumeLeader]) -> Vec<&str> {
        rows.iter().map(|l| l.symbol.as_str()).collect()
    }

    fn engine(store: InMemorySnapshotStore) -> SnapshotDiffEngine {
        SnapshotDiffEngine::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_new_symbol_reported() {
        let store = InMemorySnapshotStore::default()
            .with("2024-01-01", json!([{ "symbol": "A", "volume": "1" }, { "symbol": "B", "volume": "2" }]))
            .with("2024-01-02", json!([{ "symbol": "A", "volume": "3" }, { "symbol": "C", "volume": "4" }]));

        let result = engine(store).compare_latest_two().await.unwrap();
        assert_eq!(result.date, "2024-01-02");
        assert_eq!(symbols(&result.volume_leaders), ["A", "C"]);
        assert_eq!(symbols(&result.new_entries), ["C"]);
        assert_eq!(result.new_entries[0].volume.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_single_snapshot_everything_new() {
        let store = InMemorySnapshotStore::default()
            .with("2024-01-01", json!([{ "symbol": "A", "volume": "1" }, { "symbol": "B", "volume": "2" }]));

        let result = engine(store).compare_latest_two().await.unwrap();
        assert_eq!(result.new_entries, result.volume_leaders);
        assert_eq!(result.new_entries.len(), 2);
    }

    #[tokio::test]
    async fn test_no_snapshots_is_no_data() {
        let result = engine(InMemorySnapshotStore::default()).compare_latest_two().await;
        assert!(matches!(result, Err(AppError::NoData(_))));
    }

    #[tokio::test]
    async fn test_only_latest_two_compared() {
        let store = InMemorySnapshotStore::default()
            .with("2024-01-01", json!([{ "symbol": "C", "volume": "1" }]))
            .with("2024-01-02", json!([{ "symbol": "A", "volume": "1" }]))
            .with("2024-01-03", json!([{ "symbol": "A", "volume": "1" }, { "symbol": "C", "volume": "1" }]));

        let result = engine(store).compare_latest_two().await.unwrap();
        assert_eq!(symbols(&result.new_entries), ["C"]);
    }

    #[tokio::test]
    async fn test_mixed_shapes() {
        let store = InMemorySnapshotStore::default()
            .with("2024-01-01", json!({ "date": "2024-01-01", "volumeLeaders": [{ "symbol": "A", "volume": "1" }] }))
            .with("2024-01-02", json!([{ "symbol": "B", "volume": "1" }, { "symbol": "A", "volume": "9" }]));

        let result = engine(store).compare_latest_two().await.unwrap();
        assert_eq!(result.date, "2024-01-02");
        assert_eq!(symbols(&result.new_entries), ["B"]);
    }

    #[tokio::test]
    async fn test_malformed_yesterday_is_fatal() {
        let store = InMemorySnapshotStore::default()
            .with("2024-01-01", json!({ "date": "2024-01-01" }))
            .with("2024-01-02", json!([{ "symbol": "A", "volume": "1" }]));

        let result = engine(store).compare_latest_two().await;
        assert!(matches!(result, Err(AppError::MalformedData(_))));
    }

    #[tokio::test]
    async fn test_comparison_is_idempotent() {
        let store = InMemorySnapshotStore::default()
            .with("2024-01-01", json!([{ "symbol": "A", "volume": "1" }]))
            .with("2024-01-02", json!([{ "symbol": "B", "volume": "2", "ldcp": "10.5" }]));
        let engine = engine(store);

        let first = serde_json::to_string(&engine.compare_latest_two().await.unwrap()).unwrap();
        let second = serde_json::to_string(&engine.compare_latest_two().await.unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_symbols_today_all_kept() {
        let today = Snapshot {
            date: "2024-01-02".into(),
            volume_leaders: vec![VolumeLeader::new("X", "1"), VolumeLeader::new("X", "2")],
        };
        let result = new_entries(today, &[]);
        assert_eq!(result.new_entries.len(), 2);
    }
}
