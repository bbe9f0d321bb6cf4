//! Replay run metrics collection.
//!
//! Records Prometheus metrics for completed runs and builds printable
//! summaries of a computed payload.

use contracts::ReplayPayload;
use metrics::{counter, gauge, histogram};

/// Record metrics for one completed payload.
///
/// Call once per engine run, after the payload is available.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_payload_metrics;
///
/// let payload = engine.run(&input, None)?;
/// record_payload_metrics(&payload, elapsed_secs);
/// ```
pub fn record_payload_metrics(payload: &ReplayPayload, elapsed_secs: f64) {
    counter!("replay_runs_total").increment(1);
    histogram!("replay_run_duration_seconds").record(elapsed_secs);

    gauge!("replay_last_frame_count").set(payload.frames.len() as f64);
    gauge!("replay_last_entity_count").set(
        payload
            .frames
            .first()
            .map(|f| f.drivers.len())
            .unwrap_or(0) as f64,
    );
    gauge!("replay_last_status_count").set(payload.track_statuses.len() as f64);

    if let (Some(first), Some(last)) = (payload.frames.first(), payload.frames.last()) {
        histogram!("replay_playback_span_seconds").record(last.t - first.t);
    }
}

/// Record a payload store access
pub fn record_store_access(store: &str, hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };
    counter!(
        "replay_store_accesses_total",
        "store" => store.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a session load
pub fn record_session_loaded(session: &str, entities: usize) {
    counter!(
        "replay_sessions_loaded_total",
        "session" => session.to_string()
    )
    .increment(1);
    gauge!("replay_last_session_entities").set(entities as f64);
}

/// Printable summary of one computed payload.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Session name (cache key)
    pub session: String,

    /// Frames in the decimated stream
    pub frames: usize,

    /// Competitors present in the first frame
    pub entities: usize,

    /// Track status intervals
    pub statuses: usize,

    /// Playback span (seconds, first to last frame)
    pub span_secs: f64,

    /// Wall-clock compute time (seconds); zero when served from the store
    pub elapsed_secs: f64,

    /// Per-frame competitor count statistics
    pub driver_count_stats: StatsSummary,
}

impl RunSummary {
    /// Build a summary from a payload.
    pub fn from_payload(session: &str, payload: &ReplayPayload, elapsed_secs: f64) -> Self {
        let mut driver_counts = RunningStats::default();
        for frame in &payload.frames {
            driver_counts.push(frame.drivers.len() as f64);
        }

        let span_secs = match (payload.frames.first(), payload.frames.last()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        };

        Self {
            session: session.to_string(),
            frames: payload.frames.len(),
            entities: payload
                .frames
                .first()
                .map(|f| f.drivers.len())
                .unwrap_or(0),
            statuses: payload.track_statuses.len(),
            span_secs,
            elapsed_secs,
            driver_count_stats: StatsSummary::from(&driver_counts),
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Replay Run Summary ===")?;
        writeln!(f, "Session: {}", self.session)?;
        writeln!(f, "Frames: {}", self.frames)?;
        writeln!(f, "Competitors: {}", self.entities)?;
        writeln!(f, "Status intervals: {}", self.statuses)?;
        writeln!(f, "Playback span: {:.2}s", self.span_secs)?;
        if self.elapsed_secs > 0.0 {
            writeln!(f, "Compute time: {:.3}s", self.elapsed_secs)?;
        }
        writeln!(f, "Drivers per frame: {}", self.driver_count_stats)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Frame, StatusInterval};
    use std::collections::BTreeMap;

    fn make_payload(frames: usize, drivers: usize) -> ReplayPayload {
        let frames = (0..frames)
            .map(|i| Frame {
                t: i as f64 * 0.04,
                lap: 1,
                drivers: (0..drivers)
                    .map(|d| {
                        (
                            contracts::EntityCode::from(format!("D{d:02}")),
                            contracts::DriverState {
                                x: 0.0,
                                y: 0.0,
                                dist: 0.0,
                                lap: 1,
                                rel_dist: 0.0,
                                tyre: 2,
                                position: d as u32 + 1,
                                speed: 200,
                                gear: 5,
                                drs: 0,
                            },
                        )
                    })
                    .collect::<BTreeMap<_, _>>(),
            })
            .collect();

        ReplayPayload {
            frames,
            driver_colors: Default::default(),
            track_statuses: vec![StatusInterval {
                status: "1".to_string(),
                start_time: 0.0,
                end_time: None,
            }],
        }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_run_summary_from_payload() {
        let payload = make_payload(50, 3);
        let summary = RunSummary::from_payload("monza", &payload, 0.5);

        assert_eq!(summary.frames, 50);
        assert_eq!(summary.entities, 3);
        assert_eq!(summary.statuses, 1);
        assert!((summary.span_secs - 49.0 * 0.04).abs() < 1e-9);
        assert_eq!(summary.driver_count_stats.count, 50);
        assert!((summary.driver_count_stats.mean - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let payload = make_payload(10, 2);
        let summary = RunSummary::from_payload("monza", &payload, 0.0);

        let output = format!("{summary}");
        assert!(output.contains("Session: monza"));
        assert!(output.contains("Frames: 10"));
        // Compute time is omitted for cached payloads.
        assert!(!output.contains("Compute time"));
    }

    #[test]
    fn test_empty_payload_summary() {
        let payload = ReplayPayload::default();
        let summary = RunSummary::from_payload("empty", &payload, 0.0);

        assert_eq!(summary.frames, 0);
        assert_eq!(summary.entities, 0);
        assert_eq!(summary.span_secs, 0.0);
    }
}
