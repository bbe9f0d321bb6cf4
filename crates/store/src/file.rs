//! FileStore - JSON payloads on local disk.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use contracts::{PayloadStore, ReplayPayload, TelemetryError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Suffix of the payload file, after the session key.
const PAYLOAD_SUFFIX: &str = "_race_telemetry.json";

/// Sidecar metadata written next to each payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreMeta {
    written_at: DateTime<Utc>,
    frames: usize,
}

/// Store that keeps one JSON file per session under a base directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `base_path`.
    ///
    /// # Errors
    /// `Io` when the directory cannot be created.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, TelemetryError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Path of the payload file for `key`.
    pub fn payload_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}{PAYLOAD_SUFFIX}"))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.meta.json"))
    }

    fn read_payload(path: &Path) -> Result<ReplayPayload, TelemetryError> {
        let file = File::open(path).map_err(|e| {
            TelemetryError::store_read(path.display().to_string(), e.to_string())
        })?;
        serde_json::from_reader(file).map_err(|e| {
            TelemetryError::store_read(path.display().to_string(), e.to_string())
        })
    }
}

impl PayloadStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(name = "file_store_load", skip(self))]
    async fn load(&self, key: &str) -> Result<Option<ReplayPayload>, TelemetryError> {
        let path = self.payload_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let payload = Self::read_payload(&path)?;
        debug!(key, frames = payload.frames.len(), "payload read from disk");
        Ok(Some(payload))
    }

    #[instrument(name = "file_store_save", skip(self, payload), fields(frames = payload.frames.len()))]
    async fn save(&mut self, key: &str, payload: &ReplayPayload) -> Result<(), TelemetryError> {
        let path = self.payload_path(key);
        let file = File::create(&path).map_err(|e| {
            TelemetryError::store_write(path.display().to_string(), e.to_string())
        })?;
        serde_json::to_writer(file, payload).map_err(|e| {
            TelemetryError::store_write(path.display().to_string(), e.to_string())
        })?;

        let meta = StoreMeta {
            written_at: Utc::now(),
            frames: payload.frames.len(),
        };
        let meta_path = self.meta_path(key);
        let meta_file = File::create(&meta_path).map_err(|e| {
            TelemetryError::store_write(meta_path.display().to_string(), e.to_string())
        })?;
        serde_json::to_writer_pretty(meta_file, &meta).map_err(|e| {
            TelemetryError::store_write(meta_path.display().to_string(), e.to_string())
        })?;

        debug!(key, path = %path.display(), "payload written to disk");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Frame, StatusInterval};
    use tempfile::tempdir;

    fn make_payload() -> ReplayPayload {
        ReplayPayload {
            frames: vec![Frame {
                t: 0.0,
                lap: 1,
                drivers: Default::default(),
            }],
            driver_colors: Default::default(),
            track_statuses: vec![StatusInterval {
                status: "1".to_string(),
                start_time: 0.0,
                end_time: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        store.save("gp", &make_payload()).await.unwrap();
        let loaded = store.load("gp").await.unwrap().unwrap();

        assert_eq!(loaded, make_payload());
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.load("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_read_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        fs::write(store.payload_path("gp"), "{broken").unwrap();
        let err = store.load("gp").await.unwrap_err();
        assert!(matches!(err, TelemetryError::StoreRead { .. }));
    }

    #[tokio::test]
    async fn test_meta_sidecar_is_written() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        store.save("gp", &make_payload()).await.unwrap();

        let raw = fs::read_to_string(dir.path().join("gp.meta.json")).unwrap();
        assert!(raw.contains("\"frames\": 1"));

        // The timestamp must survive a serde round trip.
        let meta: StoreMeta = serde_json::from_str(&raw).unwrap();
        assert_eq!(meta.frames, 1);
        assert!(meta.written_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_payload_filename_convention() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store
            .payload_path("monaco")
            .ends_with("monaco_race_telemetry.json"));
    }
}
