//! Main engine orchestrator.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::time::Instant;

use contracts::{
    EngineConfig, EntityCode, EntityTrace, ProgressObserver, RaceInput, ReplayPayload,
    ResampledTrace, TelemetryError, Timeline,
};
use tracing::{debug, instrument, warn};

use crate::extract::EntityTraceExtractor;
use crate::frames::FrameAssembler;
use crate::resample::ChannelResampler;
use crate::status::StatusIntervalBuilder;
use crate::timeline::TimelineBuilder;

/// Progress milestones (percent) for each engine phase.
const PCT_EXTRACT_START: f64 = 5.0;
const PCT_EXTRACT_END: f64 = 40.0;
const PCT_TIMELINE: f64 = 45.0;
const PCT_RESAMPLE_END: f64 = 70.0;
const PCT_STATUS: f64 = 75.0;
const PCT_FRAMES: f64 = 80.0;
const PCT_FINALIZE: f64 = 95.0;

/// Resampling, synchronization, and ranking engine.
///
/// A pure transform: `(raw laps, status events) → (frames, status
/// intervals)`. Holds no state across runs; two runs over identical input
/// produce identical payloads.
#[derive(Debug, Clone)]
pub struct TelemetrySyncEngine {
    config: EngineConfig,
}

impl TelemetrySyncEngine {
    /// Create an engine with the given configuration.
    ///
    /// # Errors
    /// `ConfigValidation` for a non-positive frame rate or a zero stride.
    pub fn new(config: EngineConfig) -> Result<Self, TelemetryError> {
        if !(config.frame_rate > 0.0 && config.frame_rate.is_finite()) {
            return Err(TelemetryError::config_validation(
                "engine.frame_rate",
                format!("frame_rate must be a positive number, got {}", config.frame_rate),
            ));
        }
        if config.frame_skip < 1 {
            return Err(TelemetryError::config_validation(
                "engine.frame_skip",
                "frame_skip must be >= 1",
            ));
        }
        Ok(Self { config })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full transform over one race.
    ///
    /// The optional progress observer is invoked synchronously at coarse
    /// milestones with a non-decreasing percentage; it is never required for
    /// correctness.
    ///
    /// # Errors
    /// - `InsufficientData` when no entity yields a usable trace, or the
    ///   global span cannot fit a single tick
    /// - `DataIntegrity` when a channel holds a non-finite value
    ///
    /// All failures halt the whole computation; there is no partial result.
    #[instrument(
        name = "engine_run",
        skip_all,
        fields(
            entities = input.entities.len(),
            frame_rate = self.config.frame_rate,
            frame_skip = self.config.frame_skip
        )
    )]
    pub fn run(
        &self,
        input: &RaceInput,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<ReplayPayload, TelemetryError> {
        let started = Instant::now();
        let progress = MonotonicProgress::new(progress);
        progress.report("initializing", 0.0);

        let traces = self.extract_traces(input, &progress)?;

        progress.report("building timeline", PCT_TIMELINE);
        let (timeline, global_t_min) =
            TimelineBuilder::build(&traces, self.config.frame_rate)?;
        debug!(
            ticks = timeline.len(),
            dt = timeline.dt,
            global_t_min,
            "timeline built"
        );

        let resampled = self.resample_traces(&traces, &timeline, global_t_min, &progress);

        progress.report("mapping track status", PCT_STATUS);
        let track_statuses =
            StatusIntervalBuilder::build(&input.status_events, global_t_min);

        progress.report("assembling frames", PCT_FRAMES);
        let frames = FrameAssembler::assemble(&resampled, &timeline);
        metrics::counter!("replay_frames_total").increment(frames.len() as u64);

        let frames = FrameAssembler::decimate(frames, self.config.frame_skip);

        progress.report("finalizing", PCT_FINALIZE);
        let payload = ReplayPayload {
            frames,
            driver_colors: input.driver_colors.clone(),
            track_statuses,
        };

        metrics::histogram!("replay_engine_run_seconds")
            .record(started.elapsed().as_secs_f64());
        progress.report("complete", 100.0);

        Ok(payload)
    }

    /// Extract every entity's trace, in entity order, skipping entities with
    /// zero usable samples.
    ///
    /// Results are keyed by code so downstream phases merge in code order,
    /// never in completion order.
    fn extract_traces(
        &self,
        input: &RaceInput,
        progress: &MonotonicProgress<'_>,
    ) -> Result<BTreeMap<EntityCode, EntityTrace>, TelemetryError> {
        let total = input.entities.len().max(1) as f64;
        let mut traces = BTreeMap::new();

        for (idx, entity) in input.entities.iter().enumerate() {
            let pct = PCT_EXTRACT_START
                + (PCT_EXTRACT_END - PCT_EXTRACT_START) * (idx as f64 / total);
            progress.report(&format!("extracting traces ({})", entity.code), pct);

            match EntityTraceExtractor::extract(&entity.code, &entity.laps)? {
                Some(trace) => {
                    if traces.insert(entity.code.clone(), trace).is_some() {
                        warn!(entity = %entity.code, "duplicate entity code, keeping latest");
                    }
                }
                None => {
                    metrics::counter!("replay_entities_excluded_total").increment(1);
                }
            }
        }

        debug!(
            surviving = traces.len(),
            excluded = input.entities.len() - traces.len(),
            "trace extraction finished"
        );
        Ok(traces)
    }

    fn resample_traces(
        &self,
        traces: &BTreeMap<EntityCode, EntityTrace>,
        timeline: &Timeline,
        global_t_min: f64,
        progress: &MonotonicProgress<'_>,
    ) -> BTreeMap<EntityCode, ResampledTrace> {
        let total = traces.len().max(1) as f64;

        traces
            .iter()
            .enumerate()
            .map(|(idx, (code, trace))| {
                let pct = PCT_TIMELINE
                    + (PCT_RESAMPLE_END - PCT_TIMELINE) * ((idx + 1) as f64 / total);
                progress.report("resampling channels", pct);
                (
                    code.clone(),
                    ChannelResampler::resample(trace, timeline, global_t_min),
                )
            })
            .collect()
    }
}

/// Wraps an optional observer and clamps percentages so they never decrease,
/// whatever interleaving the phases produce.
struct MonotonicProgress<'a> {
    observer: Option<&'a dyn ProgressObserver>,
    last: Cell<f64>,
}

impl<'a> MonotonicProgress<'a> {
    fn new(observer: Option<&'a dyn ProgressObserver>) -> Self {
        Self {
            observer,
            last: Cell::new(0.0),
        }
    }

    fn report(&self, phase: &str, percent: f64) {
        let Some(observer) = self.observer else {
            return;
        };
        let clamped = percent.max(self.last.get());
        self.last.set(clamped);
        observer.report(phase, clamped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{EntityLaps, LapData, RawSample, StatusEvent};
    use std::sync::Mutex;

    fn make_sample(t: f64, distance: f64) -> RawSample {
        RawSample {
            t,
            x: distance,
            y: 0.0,
            distance,
            relative_distance: (distance / 100.0).fract(),
            speed: 180.0,
            gear: 5.0,
            drs: 0.0,
        }
    }

    /// One lap ramping distance 0..length over [t0, t1] in `n` samples.
    fn make_lap(lap_number: u32, t0: f64, t1: f64, length: f64, n: usize) -> LapData {
        let samples = (0..n)
            .map(|i| {
                let frac = i as f64 / (n - 1) as f64;
                make_sample(t0 + frac * (t1 - t0), frac * length)
            })
            .collect();
        LapData {
            lap_number,
            tyre_code: 2,
            samples,
        }
    }

    fn make_entity(code: &str, laps: Vec<LapData>) -> EntityLaps {
        EntityLaps {
            code: code.into(),
            laps,
        }
    }

    fn engine(frame_rate: f64, frame_skip: usize) -> TelemetrySyncEngine {
        TelemetrySyncEngine::new(EngineConfig {
            frame_rate,
            frame_skip,
        })
        .unwrap()
    }

    /// The worked two-entity scenario: A covers 0→100 over t=0..4, B covers
    /// 0→80 over t=1..4, at 1 Hz.
    fn two_entity_input() -> RaceInput {
        RaceInput {
            entities: vec![
                make_entity("AAA", vec![make_lap(1, 0.0, 4.0, 100.0, 9)]),
                make_entity("BBB", vec![make_lap(1, 1.0, 4.0, 80.0, 7)]),
            ],
            status_events: vec![
                StatusEvent {
                    t: 0.0,
                    status: "1".to_string(),
                },
                StatusEvent {
                    t: 2.0,
                    status: "2".to_string(),
                },
            ],
            driver_colors: BTreeMap::from([
                ("AAA".into(), [255, 0, 0]),
                ("BBB".into(), [0, 0, 255]),
            ]),
        }
    }

    #[test]
    fn test_two_entity_scenario() {
        let payload = engine(1.0, 1).run(&two_entity_input(), None).unwrap();

        // Global span 0..4 at 1 Hz: 4 ticks, half-open.
        assert_eq!(payload.frames.len(), 4);
        assert_eq!(payload.frames[0].t, 0.0);
        assert_eq!(payload.frames[3].t, 3.0);

        for frame in &payload.frames {
            assert_eq!(frame.drivers.len(), 2);
            let a = frame.drivers.get("AAA").unwrap();
            let b = frame.drivers.get("BBB").unwrap();
            // A's distance is always >= B's, so A leads throughout.
            assert!(a.dist >= b.dist);
            assert_eq!(a.position, 1);
            assert_eq!(b.position, 2);
        }

        // B is clamp-extrapolated before t=1: same state at ticks 0 and 1.
        let b0 = payload.frames[0].drivers.get("BBB").unwrap();
        let b1 = payload.frames[1].drivers.get("BBB").unwrap();
        assert_eq!(b0.dist, b1.dist);
        assert_eq!(b0.dist, 0.0);
    }

    #[test]
    fn test_status_intervals_in_payload() {
        let payload = engine(1.0, 1).run(&two_entity_input(), None).unwrap();

        assert_eq!(payload.track_statuses.len(), 2);
        assert_eq!(payload.track_statuses[0].end_time, Some(2.0));
        assert_eq!(payload.track_statuses[1].end_time, None);
    }

    #[test]
    fn test_frame_skip_is_stride_subsampling() {
        let input = two_entity_input();
        let full = engine(25.0, 1).run(&input, None).unwrap();
        let skipped = engine(25.0, 3).run(&input, None).unwrap();

        let expected: Vec<_> = full.frames.iter().step_by(3).cloned().collect();
        assert_eq!(skipped.frames, expected);
    }

    #[test]
    fn test_determinism_byte_identical() {
        let input = two_entity_input();
        let engine = engine(25.0, 1);

        let a = serde_json::to_vec(&engine.run(&input, None).unwrap()).unwrap();
        let b = serde_json::to_vec(&engine.run(&input, None).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_entity_without_samples_is_excluded_not_fatal() {
        let mut input = two_entity_input();
        input.entities.push(make_entity("CCC", vec![]));

        let payload = engine(1.0, 1).run(&input, None).unwrap();
        for frame in &payload.frames {
            assert_eq!(frame.drivers.len(), 2);
            assert!(!frame.drivers.contains_key("CCC"));
        }
    }

    #[test]
    fn test_no_entities_is_insufficient_data() {
        let input = RaceInput::default();
        let err = engine(25.0, 1).run(&input, None).unwrap_err();
        assert!(matches!(err, TelemetryError::InsufficientData { .. }));
    }

    #[test]
    fn test_progress_is_monotonic_and_bounded() {
        let events: Mutex<Vec<(String, f64)>> = Mutex::new(Vec::new());
        let observer = |phase: &str, percent: f64| {
            events.lock().unwrap().push((phase.to_string(), percent));
        };

        engine(1.0, 1)
            .run(&two_entity_input(), Some(&observer))
            .unwrap();

        let events = events.into_inner().unwrap();
        assert!(events.len() >= 2);
        assert_eq!(events.first().unwrap().1, 0.0);
        assert_eq!(events.last().unwrap().1, 100.0);
        for pair in events.windows(2) {
            assert!(pair[1].1 >= pair[0].1, "progress went backwards: {pair:?}");
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(TelemetrySyncEngine::new(EngineConfig {
            frame_rate: 0.0,
            frame_skip: 1,
        })
        .is_err());
        assert!(TelemetrySyncEngine::new(EngineConfig {
            frame_rate: 25.0,
            frame_skip: 0,
        })
        .is_err());
    }

    #[test]
    fn test_colors_pass_through() {
        let payload = engine(1.0, 1).run(&two_entity_input(), None).unwrap();
        assert_eq!(payload.driver_colors.get("AAA"), Some(&[255, 0, 0]));
    }
}
