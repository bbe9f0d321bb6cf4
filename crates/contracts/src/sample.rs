//! RawSample - session provider output
//!
//! Raw, lap-segmented motion/sensor readings as delivered by the external
//! session provider, before any synchronization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{EntityCode, StatusEvent};

/// RGB color triple, as delivered by the color collaborator.
pub type Rgb = [u8; 3];

/// One sensor reading for one entity within one lap.
///
/// Timestamps are entity-local session clocks (seconds). `distance` is the
/// cumulative distance within the current lap only; `relative_distance` is the
/// fractional lap progress in 0..1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawSample {
    /// Session timestamp (seconds)
    pub t: f64,

    /// Planar position
    pub x: f64,
    pub y: f64,

    /// Cumulative distance within this lap (metres)
    pub distance: f64,

    /// Fractional progress around this lap (0..1)
    pub relative_distance: f64,

    /// Speed (km/h)
    pub speed: f64,

    /// Selected gear
    pub gear: f64,

    /// Overtake-aid (DRS) flag, numeric as reported upstream
    pub drs: f64,
}

/// One lap as exposed by the session provider.
///
/// The tire compound is still the provider's human-readable label here; the
/// label→code lookup is a collaborator concern, not the engine's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLap {
    /// Lap number, chronological race order
    pub lap_number: u32,

    /// Tire compound label (e.g. "SOFT", "MEDIUM")
    pub compound: String,

    /// Samples recorded during this lap (not necessarily time-sorted)
    pub samples: Vec<RawSample>,
}

/// One lap after the compound label has been resolved to its integer code.
///
/// This is the shape the engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapData {
    /// Lap number, chronological race order
    pub lap_number: u32,

    /// Tire compound code (0 = unknown)
    pub tyre_code: u8,

    /// Samples recorded during this lap
    pub samples: Vec<RawSample>,
}

/// All laps for one entity, in chronological race order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityLaps {
    /// Competitor code
    pub code: EntityCode,

    /// Laps in race order
    pub laps: Vec<LapData>,
}

/// Complete engine input for one race.
///
/// This is a plain value: the engine is a pure transform over it and never
/// touches the provider that produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceInput {
    /// Per-entity raw laps
    pub entities: Vec<EntityLaps>,

    /// Race-control status change events, chronological
    pub status_events: Vec<StatusEvent>,

    /// Entity color mapping, supplied by the external color collaborator
    pub driver_colors: BTreeMap<EntityCode, Rgb>,
}
