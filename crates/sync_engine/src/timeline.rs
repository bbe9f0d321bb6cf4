//! Shared fixed-rate timeline derivation.

use std::collections::BTreeMap;

use contracts::{EntityCode, EntityTrace, TelemetryError, Timeline};
use tracing::instrument;

/// Derives the global timeline spanning all entity traces.
pub struct TimelineBuilder;

impl TimelineBuilder {
    /// Build the shared timeline and return it together with `global_t_min`.
    ///
    /// Ticks are `{0, dt, 2·dt, …}` with `count = floor((t_max − t_min) / dt)`;
    /// the range is half-open, so the final instant of the race has no tick.
    ///
    /// # Errors
    /// `InsufficientData` when no traces survive extraction, or when the
    /// global span cannot fit a single tick.
    #[instrument(
        name = "timeline_build",
        level = "debug",
        skip(traces),
        fields(entities = traces.len(), frame_rate)
    )]
    pub fn build(
        traces: &BTreeMap<EntityCode, EntityTrace>,
        frame_rate: f64,
    ) -> Result<(Timeline, f64), TelemetryError> {
        if traces.is_empty() {
            return Err(TelemetryError::insufficient_data(
                "no entity produced a usable trace",
            ));
        }

        let global_t_min = traces
            .values()
            .map(EntityTrace::t_min)
            .fold(f64::INFINITY, f64::min);
        let global_t_max = traces
            .values()
            .map(EntityTrace::t_max)
            .fold(f64::NEG_INFINITY, f64::max);

        let dt = 1.0 / frame_rate;
        let span = global_t_max - global_t_min;
        if span < dt {
            return Err(TelemetryError::insufficient_data(format!(
                "global span {span:.3}s is shorter than one tick ({dt:.3}s)"
            )));
        }

        let count = (span / dt).floor() as usize;
        let ticks = (0..count).map(|i| i as f64 * dt).collect();

        Ok((Timeline { dt, ticks }, global_t_min))
    }
}
