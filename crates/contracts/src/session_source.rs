//! SessionSource trait - Session provider abstraction
//!
//! Defines a unified interface for race session providers, decoupling the
//! engine input preparation from where session data actually comes from.
//! Recorded JSON files and synthetic mock sessions implement the same API.

use std::collections::BTreeMap;

use crate::{EntityCode, Rgb, SessionLap, StatusEvent, TelemetryError};

/// Race session provider trait
///
/// The engine itself never touches this: a lowering step pulls everything out
/// into a plain [`RaceInput`](crate::RaceInput) first, so the engine stays a
/// pure transform.
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn SessionSource> = load_session();
/// for id in source.entity_ids() {
///     let code = source.entity_code(&id)?;
///     let laps = source.laps(&id)?;
///     // ...
/// }
/// ```
pub trait SessionSource {
    /// Opaque upstream identifiers for every competitor in the session.
    fn entity_ids(&self) -> Vec<String>;

    /// Human-readable code for one competitor.
    ///
    /// # Errors
    /// Returns `EntityNotFound` for an unknown identifier.
    fn entity_code(&self, id: &str) -> Result<EntityCode, TelemetryError>;

    /// Ordered laps for one competitor (chronological race order).
    ///
    /// # Errors
    /// Returns `EntityNotFound` for an unknown identifier.
    fn laps(&self, id: &str) -> Result<Vec<SessionLap>, TelemetryError>;

    /// Ordered race-control status change events.
    fn status_events(&self) -> Result<Vec<StatusEvent>, TelemetryError>;

    /// Entity color mapping (RGB), from the external color collaborator.
    fn driver_colors(&self) -> BTreeMap<EntityCode, Rgb>;
}
