//! # models::snapshot
//!
//! Daily "volume leaders" snapshots as written by the scraper, and the
//! comparison result served by `GET /api/snapshot`.
//!
//! A snapshot file is persisted in one of two shapes:
//!
//! ```text
//! data/2024-01-02.json   [ { "symbol": "HUBC", "volume": "12,345" }, ... ]
//! data/2024-01-03.json   { "date": "2024-01-03", "volumeLeaders": [ ... ] }
//! ```
//!
//! [`RawSnapshot::normalize`] is the only place that knows about both shapes;
//! everything downstream works on the canonical [`Snapshot`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

// ─── VolumeLeader ─────────────────────────────────────────────────────────────

/// One row of the volume-leaders table.
///
/// Unknown columns are carried through untouched so the list can be served
/// back exactly as it was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeLeader {
    pub symbol: String,

    /// Traded volume as displayed by the exchange, e.g. `"12,345,678"`.
    #[serde(
        default,
        deserialize_with = "volume_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VolumeLeader {
    pub fn new(symbol: impl Into<String>, volume: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            volume: Some(volume.into()),
            extra: Map::new(),
        }
    }
}

/// Accept `"12,345"` as well as a bare JSON number.
fn volume_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "volume must be a string or number, got {other}"
        ))),
    }
}

// ─── Snapshot ─────────────────────────────────────────────────────────────────

/// Canonical shape of one day's capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub volume_leaders: Vec<VolumeLeader>,
}

/// A snapshot as read from the store: its key (file stem) plus the payload in
/// whichever shape the scraper wrote it.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    pub key: String,
    pub payload: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedSnapshot {
    Bare(Vec<VolumeLeader>),
    Wrapped {
        #[serde(default)]
        date: Option<String>,
        #[serde(rename = "volumeLeaders")]
        volume_leaders: Vec<VolumeLeader>,
    },
}

impl RawSnapshot {
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    /// Coerce either persisted shape to a [`Snapshot`].
    ///
    /// Bare arrays take their date from the key.  Wrapped objects keep their
    /// own `date` and fall back to the key when it is missing or blank.
    pub fn normalize(self) -> Result<Snapshot, AppError> {
        let RawSnapshot { key, payload } = self;

        let persisted: PersistedSnapshot = serde_json::from_value(payload).map_err(|_| {
            AppError::MalformedData(format!(
                "snapshot {key}: volumeLeaders missing or malformed"
            ))
        })?;

        Ok(match persisted {
            PersistedSnapshot::Bare(volume_leaders) => Snapshot {
                date: key,
                volume_leaders,
            },
            PersistedSnapshot::Wrapped {
                date,
                volume_leaders,
            } => Snapshot {
                date: date.filter(|d| !d.trim().is_empty()).unwrap_or(key),
                volume_leaders,
            },
        })
    }
}

// ─── SnapshotComparison ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotComparison {
    /// Date of the latest snapshot.
    pub date: String,
    /// The latest snapshot's full list, unmodified.
    pub volume_leaders: Vec<VolumeLeader>,
    /// Rows of `volume_leaders` whose symbol was absent the day before.
    pub new_entries: Vec<VolumeLeader>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_bare_array() {
        let raw = RawSnapshot::new(
            "2024-01-02",
            json!([{ "symbol": "HUBC", "volume": "1,000" }]),
        );
        let snap = raw.normalize().unwrap();
        assert_eq!(snap.date, "2024-01-02");
        assert_eq!(snap.volume_leaders, vec![VolumeLeader::new("HUBC", "1,000")]);
    }

    #[test]
    fn test_normalize_wrapped_object() {
        let raw = RawSnapshot::new(
            "latest",
            json!({ "date": "2024-01-03", "volumeLeaders": [{ "symbol": "PSO", "volume": 42 }] }),
        );
        let snap = raw.normalize().unwrap();
        assert_eq!(snap.date, "2024-01-03");
        assert_eq!(snap.volume_leaders[0].volume.as_deref(), Some("42"));
    }

    #[test]
    fn test_normalize_wrapped_without_date_uses_key() {
        let raw = RawSnapshot::new("2024-01-04", json!({ "volumeLeaders": [] }));
        assert_eq!(raw.normalize().unwrap().date, "2024-01-04");
    }

    #[test]
    fn test_normalize_missing_leaders_is_malformed() {
        let raw = RawSnapshot::new("2024-01-05", json!({ "date": "2024-01-05" }));
        assert!(matches!(raw.normalize(), Err(AppError::MalformedData(_))));

        let raw = RawSnapshot::new("2024-01-05", json!({ "volumeLeaders": "HUBC" }));
        assert!(matches!(raw.normalize(), Err(AppError::MalformedData(_))));

        let raw = RawSnapshot::new("2024-01-05", json!([{ "volume": "10" }]));
        assert!(matches!(raw.normalize(), Err(AppError::MalformedData(_))));
    }

    #[test]
    fn test_extra_columns_round_trip() {
        let row = json!({ "symbol": "KEL", "volume": "9", "change": "+0.12" });
        let leader: VolumeLeader = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(serde_json::to_value(&leader).unwrap(), row);
    }
}
