//! Channel resampling onto the shared timeline.
//!
//! Piecewise-linear interpolation against the entity's own (shifted)
//! timestamps, with flat extrapolation at both ends: ticks outside the
//! entity's span hold the nearest boundary value, modeling sensors that start
//! or stop slightly off the global bounds.

use contracts::{EntityTrace, ResampledTrace, Timeline};
use tracing::instrument;

/// Evaluates every channel of a trace at every timeline tick.
pub struct ChannelResampler;

impl ChannelResampler {
    /// Resample one entity's channels onto the shared timeline.
    ///
    /// The entity's timestamps are shifted by `−global_t_min` first so both
    /// sides share the timeline origin. Categorical channels (lap, tyre) are
    /// interpolated numerically like the continuous ones; rounding happens at
    /// frame assembly.
    #[instrument(
        name = "channel_resample",
        level = "debug",
        skip(trace, timeline),
        fields(entity = %trace.code, samples = trace.len(), ticks = timeline.len())
    )]
    pub fn resample(
        trace: &EntityTrace,
        timeline: &Timeline,
        global_t_min: f64,
    ) -> ResampledTrace {
        let t_shifted: Vec<f64> = trace.t.iter().map(|t| t - global_t_min).collect();
        let ticks = &timeline.ticks;

        ResampledTrace {
            code: trace.code.clone(),
            x: interp(ticks, &t_shifted, &trace.x),
            y: interp(ticks, &t_shifted, &trace.y),
            dist: interp(ticks, &t_shifted, &trace.dist),
            rel_dist: interp(ticks, &t_shifted, &trace.rel_dist),
            lap: interp(ticks, &t_shifted, &trace.lap),
            tyre: interp(ticks, &t_shifted, &trace.tyre),
            speed: interp(ticks, &t_shifted, &trace.speed),
            gear: interp(ticks, &t_shifted, &trace.gear),
            drs: interp(ticks, &t_shifted, &trace.drs),
        }
    }
}

/// Piecewise-linear interpolation of `(xs, ys)` at each ascending query tick,
/// clamped to the boundary values outside `[xs[0], xs[last]]`.
///
/// `xs` must be strictly increasing and non-empty (extractor invariant).
fn interp(ticks: &[f64], xs: &[f64], ys: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(!xs.is_empty());

    let last = xs.len() - 1;
    let mut out = Vec::with_capacity(ticks.len());
    let mut j = 0usize;

    for &t in ticks {
        if t <= xs[0] {
            out.push(ys[0]);
            continue;
        }
        if t >= xs[last] {
            out.push(ys[last]);
            continue;
        }

        // Ticks ascend, so the segment cursor only ever moves forward.
        while xs[j + 1] < t {
            j += 1;
        }

        let (x0, x1) = (xs[j], xs[j + 1]);
        let (y0, y1) = (ys[j], ys[j + 1]);
        let dx = x1 - x0;
        if dx > 0.0 {
            out.push(y0 + (y1 - y0) * (t - x0) / dx);
        } else {
            out.push(y0);
        }
    }

    out
}
