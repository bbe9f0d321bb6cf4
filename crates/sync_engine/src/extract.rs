//! Per-entity trace extraction.
//!
//! Turns one entity's lap-segmented raw samples into a single time-ordered
//! trace whose distance channel is cumulative race distance.

use contracts::{EntityCode, EntityTrace, LapData, TelemetryError};
use tracing::{debug, instrument};

/// Builds an [`EntityTrace`] from one entity's ordered laps.
pub struct EntityTraceExtractor;

impl EntityTraceExtractor {
    /// Extract a full-race trace for one entity.
    ///
    /// Laps are visited in the given (chronological) order. Each lap's
    /// distance channel is normalized so its minimum becomes 0, offset by the
    /// accumulated lengths of all prior laps, and the lap's own length added
    /// to the running total. The concatenation is then stable-sorted by
    /// timestamp: lap-order concatenation does not guarantee global time
    /// order when laps overlap or are revisited.
    ///
    /// Returns `Ok(None)` when the entity produced zero usable samples; this
    /// is a designed skip, not an error.
    ///
    /// # Errors
    /// `DataIntegrity` if any channel contains a non-finite value after
    /// concatenation.
    #[instrument(
        name = "trace_extract",
        level = "debug",
        skip(laps),
        fields(entity = %code, laps = laps.len())
    )]
    pub fn extract(
        code: &EntityCode,
        laps: &[LapData],
    ) -> Result<Option<EntityTrace>, TelemetryError> {
        let mut trace = EntityTrace {
            code: code.clone(),
            t: Vec::new(),
            x: Vec::new(),
            y: Vec::new(),
            dist: Vec::new(),
            rel_dist: Vec::new(),
            lap: Vec::new(),
            tyre: Vec::new(),
            speed: Vec::new(),
            gear: Vec::new(),
            drs: Vec::new(),
        };

        let mut total_dist_so_far = 0.0;

        for lap in laps {
            if lap.samples.is_empty() {
                continue;
            }

            // Normalize lap distance to start at 0; the post-normalization
            // maximum is this lap's length.
            let d_min = lap
                .samples
                .iter()
                .map(|s| s.distance)
                .fold(f64::INFINITY, f64::min);
            let mut lap_length = 0.0f64;

            for sample in &lap.samples {
                let d = sample.distance - d_min;
                lap_length = lap_length.max(d);

                trace.t.push(sample.t);
                trace.x.push(sample.x);
                trace.y.push(sample.y);
                trace.dist.push(total_dist_so_far + d);
                trace.rel_dist.push(sample.relative_distance);
                trace.lap.push(f64::from(lap.lap_number));
                trace.tyre.push(f64::from(lap.tyre_code));
                trace.speed.push(sample.speed);
                trace.gear.push(sample.gear);
                trace.drs.push(sample.drs);
            }

            total_dist_so_far += lap_length;
        }

        if trace.t.is_empty() {
            debug!(entity = %code, "no usable samples, excluding entity");
            return Ok(None);
        }

        Self::check_finite(&trace)?;
        Self::sort_by_time(&mut trace);
        Self::dedup_timestamps(&mut trace);

        Ok(Some(trace))
    }

    /// Reject non-finite values in any channel.
    fn check_finite(trace: &EntityTrace) -> Result<(), TelemetryError> {
        if let Some(idx) = trace.t.iter().position(|v| !v.is_finite()) {
            return Err(TelemetryError::data_integrity(
                trace.code.as_str(),
                "t",
                format!("non-finite value at sample {idx}"),
            ));
        }
        for (name, channel) in trace.channels() {
            if let Some(idx) = channel.iter().position(|v| !v.is_finite()) {
                return Err(TelemetryError::data_integrity(
                    trace.code.as_str(),
                    name,
                    format!("non-finite value at sample {idx}"),
                ));
            }
        }
        Ok(())
    }

    /// Stable-sort every channel by timestamp ascending.
    fn sort_by_time(trace: &mut EntityTrace) {
        let mut order: Vec<usize> = (0..trace.len()).collect();
        order.sort_by(|&a, &b| {
            trace.t[a]
                .partial_cmp(&trace.t[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Already in order for the common single-lap-source case.
        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return;
        }

        for channel in Self::all_channels_mut(trace) {
            *channel = order.iter().map(|&i| channel[i]).collect();
        }
    }

    /// Drop samples whose timestamp exactly repeats the previous one, keeping
    /// the first occurrence, so timestamps end up strictly increasing.
    fn dedup_timestamps(trace: &mut EntityTrace) {
        let keep: Vec<bool> = trace
            .t
            .iter()
            .enumerate()
            .map(|(i, &t)| i == 0 || t > trace.t[i - 1])
            .collect();

        if keep.iter().all(|&k| k) {
            return;
        }

        for channel in Self::all_channels_mut(trace) {
            let mut it = keep.iter();
            channel.retain(|_| *it.next().unwrap_or(&true));
        }
    }

    fn all_channels_mut(trace: &mut EntityTrace) -> [&mut Vec<f64>; 10] {
        [
            &mut trace.t,
            &mut trace.x,
            &mut trace.y,
            &mut trace.dist,
            &mut trace.rel_dist,
            &mut trace.lap,
            &mut trace.tyre,
            &mut trace.speed,
            &mut trace.gear,
            &mut trace.drs,
        ]
    }
}
