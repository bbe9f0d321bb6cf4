//! EntityTrace / Timeline / ResampledTrace - intermediate engine products
//!
//! Channel-oriented (struct-of-arrays) layout: every channel is one `Vec<f64>`
//! and index *i* across all channels belongs to the same sample. This mirrors
//! the elementwise whole-channel operations the engine performs.

use serde::{Deserialize, Serialize};

use crate::EntityCode;

/// One entity's full-race trace: laps concatenated, distances accumulated
/// into monotonic race distance, samples sorted by timestamp.
///
/// Invariants (established by the extractor):
/// - all channels have equal length, at least 1
/// - `t` is strictly increasing
/// - `dist` is non-decreasing
/// - every value in every channel is finite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTrace {
    /// Competitor code
    pub code: EntityCode,

    /// Session timestamps (seconds, unshifted)
    pub t: Vec<f64>,

    pub x: Vec<f64>,
    pub y: Vec<f64>,

    /// Cumulative race distance since the race start (metres)
    pub dist: Vec<f64>,

    /// Fractional progress around the current lap (0..1)
    pub rel_dist: Vec<f64>,

    /// Lap number, carried as a continuous channel
    pub lap: Vec<f64>,

    /// Tire compound code, carried as a continuous channel
    pub tyre: Vec<f64>,

    pub speed: Vec<f64>,
    pub gear: Vec<f64>,
    pub drs: Vec<f64>,
}

impl EntityTrace {
    /// Number of samples in the trace.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Earliest timestamp. Traces are never empty once built.
    pub fn t_min(&self) -> f64 {
        self.t[0]
    }

    /// Latest timestamp.
    pub fn t_max(&self) -> f64 {
        self.t[self.t.len() - 1]
    }

    /// All value channels (everything except `t`), with their names.
    ///
    /// Used for integrity checks and channel-generic resampling.
    pub fn channels(&self) -> [(&'static str, &[f64]); 9] {
        [
            ("x", &self.x),
            ("y", &self.y),
            ("dist", &self.dist),
            ("rel_dist", &self.rel_dist),
            ("lap", &self.lap),
            ("tyre", &self.tyre),
            ("speed", &self.speed),
            ("gear", &self.gear),
            ("drs", &self.drs),
        ]
    }
}

/// The shared fixed-rate timeline spanning all entities.
///
/// Ticks start at 0 and step by `dt = 1 / frame_rate`; the covered range is
/// half-open, so the global end instant itself has no tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Tick spacing (seconds)
    pub dt: f64,

    /// Strictly increasing, evenly spaced tick instants, starting at 0
    pub ticks: Vec<f64>,
}

impl Timeline {
    /// Number of ticks.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

/// One entity's channels evaluated at every timeline tick.
///
/// Every channel has exactly `timeline.len()` values; ticks outside the
/// entity's own time span hold the clamped boundary value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampledTrace {
    /// Competitor code
    pub code: EntityCode,

    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub dist: Vec<f64>,
    pub rel_dist: Vec<f64>,
    pub lap: Vec<f64>,
    pub tyre: Vec<f64>,
    pub speed: Vec<f64>,
    pub gear: Vec<f64>,
    pub drs: Vec<f64>,
}
