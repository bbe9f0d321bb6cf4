//! Race-control status events and intervals.

use serde::{Deserialize, Serialize};

/// One raw race-control status change, as delivered by the session provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Session timestamp of the change (seconds, unshifted)
    pub t: f64,

    /// Status code label (e.g. "1" = green, "4" = safety car)
    pub status: String,
}

/// A time range during which a single race-control status held.
///
/// Intervals are contiguous: each interval's end equals the next interval's
/// start. The final interval is open (`end_time == None`, "until session
/// end"). Start times can be negative when the status change predates the
/// shared timeline origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInterval {
    /// Status code label
    pub status: String,

    /// Interval start on the shared timeline (seconds)
    pub start_time: f64,

    /// Interval end, or `None` for the last interval
    pub end_time: Option<f64>,
}
