//! Ranked frame assembly and stride decimation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use contracts::{DriverState, EntityCode, Frame, ResampledTrace, Timeline};
use tracing::instrument;

/// Decimal places for x/y coordinates.
const POSITION_PRECISION: i32 = 1;
/// Decimal places for race/relative distance.
const DISTANCE_PRECISION: i32 = 1;
/// Decimal places for frame timestamps.
const TIME_PRECISION: i32 = 2;

/// Builds one ranked snapshot per timeline tick.
pub struct FrameAssembler;

impl FrameAssembler {
    /// Assemble the full-resolution frame sequence.
    ///
    /// Per tick: one entry per entity with output rounding applied, sorted by
    /// rounded race distance descending (leader first) with entity code as
    /// the ascending tie-break, then assigned dense 1-based positions. The
    /// frame lap is the leader's rounded lap number. A tick whose snapshot is
    /// somehow empty is skipped rather than emitted malformed.
    #[instrument(
        name = "frames_assemble",
        level = "debug",
        skip(resampled, timeline),
        fields(entities = resampled.len(), ticks = timeline.len())
    )]
    pub fn assemble(
        resampled: &BTreeMap<EntityCode, ResampledTrace>,
        timeline: &Timeline,
    ) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(timeline.len());

        for (i, &t) in timeline.ticks.iter().enumerate() {
            let mut snapshot: Vec<(EntityCode, DriverState)> = resampled
                .iter()
                .map(|(code, d)| (code.clone(), Self::driver_state_at(d, i)))
                .collect();

            if snapshot.is_empty() {
                continue;
            }

            // Leader = largest rounded race distance; ties resolved by code
            // so the order is deterministic.
            snapshot.sort_by(|a, b| {
                b.1.dist
                    .partial_cmp(&a.1.dist)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });

            let leader_lap = snapshot[0].1.lap;

            let mut drivers = BTreeMap::new();
            for (rank, (code, mut state)) in snapshot.into_iter().enumerate() {
                state.position = rank as u32 + 1;
                drivers.insert(code, state);
            }

            frames.push(Frame {
                t: round_dp(t, TIME_PRECISION),
                lap: leader_lap,
                drivers,
            });
        }

        frames
    }

    /// Keep ticks `0, k, 2k, …` of the full-resolution sequence.
    ///
    /// Plain stride subsampling, no smoothing or averaging; fast transients
    /// (e.g. a brief status change) can alias out of the decimated stream.
    pub fn decimate(frames: Vec<Frame>, frame_skip: usize) -> Vec<Frame> {
        if frame_skip <= 1 {
            return frames;
        }
        frames.into_iter().step_by(frame_skip).collect()
    }

    /// One entity's rounded state at tick `i`. Position is assigned later.
    fn driver_state_at(d: &ResampledTrace, i: usize) -> DriverState {
        DriverState {
            x: round_dp(d.x[i], POSITION_PRECISION),
            y: round_dp(d.y[i], POSITION_PRECISION),
            dist: round_dp(d.dist[i], DISTANCE_PRECISION),
            lap: d.lap[i].round() as i64,
            rel_dist: round_dp(d.rel_dist[i], DISTANCE_PRECISION),
            tyre: d.tyre[i].round() as i64,
            position: 0,
            speed: d.speed[i].round() as i64,
            // gear/drs truncate toward zero, matching the upstream feed
            gear: d.gear[i] as i64,
            drs: d.drs[i] as i64,
        }
    }
}

/// Round to `dp` decimal places.
fn round_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}
