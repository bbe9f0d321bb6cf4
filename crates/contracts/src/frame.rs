//! Frame / ReplayPayload - engine output
//!
//! One ranked snapshot per timeline tick, plus the assembled payload handed
//! to persistence/transport collaborators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{EntityCode, Rgb, StatusInterval};

/// One entity's state at one tick, with output rounding already applied.
///
/// `position` is the dense 1-based rank by race distance (1 = leader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverState {
    pub x: f64,
    pub y: f64,

    /// Race distance (metres since race start)
    pub dist: f64,

    /// Lap number (interpolated then rounded; can be one off at exact
    /// lap-boundary ticks, which is documented upstream behavior)
    pub lap: i64,

    /// Fractional lap progress
    pub rel_dist: f64,

    /// Tire compound code
    pub tyre: i64,

    /// Dense 1-based rank, unique within a frame
    pub position: u32,

    /// Speed (km/h, integer)
    pub speed: i64,

    pub gear: i64,
    pub drs: i64,
}

/// Ranked snapshot of every surviving entity at one timeline tick.
///
/// `drivers` is a `BTreeMap` so serialization order is deterministic: two runs
/// over identical input produce byte-identical frame sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Tick instant on the shared timeline (seconds, 2 decimal places)
    pub t: f64,

    /// The leader's lap number at this tick
    pub lap: i64,

    /// Per-entity state, keyed by competitor code
    pub drivers: BTreeMap<EntityCode, DriverState>,
}

/// The complete produced payload: frames, colors, and status overlays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayPayload {
    /// Ranked frames, indexed by timeline tick (possibly decimated)
    pub frames: Vec<Frame>,

    /// Entity color mapping, merged in from the external collaborator
    pub driver_colors: BTreeMap<EntityCode, Rgb>,

    /// Contiguous race-control status intervals
    pub track_statuses: Vec<StatusInterval>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_deterministically() {
        let mut drivers = BTreeMap::new();
        drivers.insert(
            EntityCode::from("VER"),
            DriverState {
                x: 10.5,
                y: -3.2,
                dist: 120.0,
                lap: 1,
                rel_dist: 0.1,
                tyre: 1,
                position: 1,
                speed: 280,
                gear: 7,
                drs: 0,
            },
        );
        let payload = ReplayPayload {
            frames: vec![Frame {
                t: 0.0,
                lap: 1,
                drivers,
            }],
            driver_colors: BTreeMap::from([(EntityCode::from("VER"), [30, 65, 255])]),
            track_statuses: vec![],
        };

        let a = serde_json::to_vec(&payload).unwrap();
        let b = serde_json::to_vec(&payload.clone()).unwrap();
        assert_eq!(a, b);

        let back: ReplayPayload = serde_json::from_slice(&a).unwrap();
        assert_eq!(back, payload);
    }
}
