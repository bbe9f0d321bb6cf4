//! # Payload Store
//!
//! Compute-if-absent persistence for computed playback payloads.
//!
//! A payload is keyed by session name; once computed it is written to disk
//! and later runs read it back instead of recomputing. Invalidation is by
//! explicit refresh only.
//!
//! ## Usage Example
//!
//! ```ignore
//! use store::{FileStore, get_or_compute};
//!
//! let mut store = FileStore::new("output")?;
//! let payload = get_or_compute(&mut store, "monaco_2024", false, || compute()).await?;
//! ```

mod file;

pub use contracts::PayloadStore;
pub use file::FileStore;

use contracts::{ReplayPayload, TelemetryError};
use tracing::{debug, info};

/// Load `key` from the store, or compute and persist it.
///
/// With `refresh` set, the cached value is ignored and overwritten. A cache
/// read failure (corrupt or unreadable entry) falls back to recomputation
/// rather than failing the run; a write failure is fatal.
pub async fn get_or_compute<S, F>(
    store: &mut S,
    key: &str,
    refresh: bool,
    compute: F,
) -> Result<ReplayPayload, TelemetryError>
where
    S: PayloadStore,
    F: FnOnce() -> Result<ReplayPayload, TelemetryError>,
{
    if !refresh {
        match store.load(key).await {
            Ok(Some(payload)) => {
                metrics::counter!("replay_store_hits_total").increment(1);
                info!(store = store.name(), key, "payload loaded from store");
                return Ok(payload);
            }
            Ok(None) => {
                debug!(store = store.name(), key, "no stored payload");
            }
            Err(e) => {
                debug!(store = store.name(), key, error = %e, "stored payload unreadable, recomputing");
            }
        }
    }

    metrics::counter!("replay_store_misses_total").increment(1);
    let payload = compute()?;
    store.save(key, &payload).await?;
    info!(
        store = store.name(),
        key,
        frames = payload.frames.len(),
        "payload computed and stored"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ReplayPayload;
    use tempfile::tempdir;

    fn make_payload(frames: usize) -> ReplayPayload {
        ReplayPayload {
            frames: (0..frames)
                .map(|i| contracts::Frame {
                    t: i as f64,
                    lap: 1,
                    drivers: Default::default(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_compute_on_miss_then_hit() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        let first = get_or_compute(&mut store, "gp", false, || Ok(make_payload(3)))
            .await
            .unwrap();
        assert_eq!(first.frames.len(), 3);

        // Second call must hit the store, never the closure.
        let second = get_or_compute(&mut store, "gp", false, || {
            panic!("must not recompute on a hit")
        })
        .await
        .unwrap();
        assert_eq!(second.frames.len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_recomputes() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        get_or_compute(&mut store, "gp", false, || Ok(make_payload(3)))
            .await
            .unwrap();
        let refreshed = get_or_compute(&mut store, "gp", true, || Ok(make_payload(5)))
            .await
            .unwrap();
        assert_eq!(refreshed.frames.len(), 5);

        // Refresh overwrote the stored value.
        let after = get_or_compute(&mut store, "gp", false, || {
            panic!("must not recompute on a hit")
        })
        .await
        .unwrap();
        assert_eq!(after.frames.len(), 5);
    }

    #[tokio::test]
    async fn test_compute_failure_propagates() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();

        let err = get_or_compute(&mut store, "gp", false, || {
            Err(TelemetryError::insufficient_data("empty session"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, TelemetryError::InsufficientData { .. }));
    }
}
