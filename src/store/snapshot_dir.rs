//! # store::snapshot_dir
//!
//! [`SnapshotStore`] over the scraper's output directory: one `<date>.json`
//! file per trading day.  Keys are file stems, so lexicographic order is date
//! order for `YYYY-MM-DD` names.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::SnapshotStore;
use crate::error::AppError;
use crate::models::RawSnapshot;

const SNAPSHOT_EXT: &str = ".json";

pub struct DirSnapshotStore {
    dir: PathBuf,
}

impl DirSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SnapshotStore for DirSnapshotStore {
    async fn list(&self) -> Result<Vec<String>, AppError> {
        let exists = fs::try_exists(&self.dir)
            .await
            .with_context(|| format!("Failed to check {}", self.dir.display()))?;
        if !exists {
            return Err(AppError::NoData("Data folder missing".into()));
        }

        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to list {}", self.dir.display()))?;

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list {}", self.dir.display()))?
        {
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(SNAPSHOT_EXT)) else {
                continue;
            };
            if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        debug!(dir = %self.dir.display(), count = keys.len(), "Snapshot files listed");
        Ok(keys)
    }

    async fn read(&self, key: &str) -> Result<RawSnapshot, AppError> {
        let path = self.dir.join(format!("{key}{SNAPSHOT_EXT}"));
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let payload = serde_json::from_str(&content).map_err(|e| {
            AppError::MalformedData(format!("snapshot {key}: invalid JSON ({e})"))
        })?;

        Ok(RawSnapshot::new(key, payload))
    }
}
