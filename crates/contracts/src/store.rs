//! PayloadStore trait - persistence collaborator interface
//!
//! Compute-if-absent storage for computed payloads, keyed by session name.
//! The engine never calls this; persistence belongs to the orchestrating
//! layer.

use crate::{ReplayPayload, TelemetryError};

/// Payload persistence trait
///
/// All store implementations must implement this trait.
#[trait_variant::make(PayloadStore: Send)]
pub trait LocalPayloadStore {
    /// Store name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Load a previously stored payload, or `None` if absent.
    ///
    /// # Errors
    /// Returns a read error when the key exists but cannot be decoded.
    async fn load(&self, key: &str) -> Result<Option<ReplayPayload>, TelemetryError>;

    /// Store a payload under the given key, replacing any previous value.
    ///
    /// # Errors
    /// Returns a write error (should include context)
    async fn save(&mut self, key: &str, payload: &ReplayPayload) -> Result<(), TelemetryError>;
}
