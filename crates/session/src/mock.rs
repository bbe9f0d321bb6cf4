//! Synthetic session generator.
//!
//! Deterministic by construction: the same parameters always produce the
//! same session, so downstream tests can assert on exact payload bytes.

use std::collections::BTreeMap;

use contracts::{
    EntityCode, RawSample, Rgb, SessionLap, SessionSource, StatusEvent, TelemetryError,
};

/// Nominal lap length of the synthetic circuit, in meters.
const LAP_LENGTH: f64 = 1000.0;

/// Synthetic race session with a configurable grid.
///
/// Each competitor drives `laps` laps of the same circuit at a slightly
/// different pace, sampled irregularly within each lap. Competitor `k` is a
/// little slower than competitor `k-1`, so the finishing order is known.
pub struct MockSession {
    entities: usize,
    laps: u32,
    samples_per_lap: usize,
}

impl MockSession {
    pub fn new(entities: usize, laps: u32, samples_per_lap: usize) -> Self {
        assert!(samples_per_lap >= 2, "a lap needs at least two samples");
        Self {
            entities,
            laps,
            samples_per_lap,
        }
    }

    fn code_for(index: usize) -> String {
        format!("C{:02}", index + 1)
    }

    fn index_of(&self, id: &str) -> Result<usize, TelemetryError> {
        self.entity_ids()
            .iter()
            .position(|e| e == id)
            .ok_or_else(|| TelemetryError::EntityNotFound {
                entity: id.to_string(),
            })
    }

    /// Seconds competitor `index` takes for one lap.
    fn lap_time(index: usize) -> f64 {
        60.0 + index as f64 * 0.5
    }
}

impl SessionSource for MockSession {
    fn entity_ids(&self) -> Vec<String> {
        (0..self.entities).map(Self::code_for).collect()
    }

    fn entity_code(&self, id: &str) -> Result<EntityCode, TelemetryError> {
        self.index_of(id)?;
        Ok(EntityCode::new(id))
    }

    fn laps(&self, id: &str) -> Result<Vec<SessionLap>, TelemetryError> {
        let index = self.index_of(id)?;
        let lap_time = Self::lap_time(index);
        let mut laps = Vec::with_capacity(self.laps as usize);

        for lap in 0..self.laps {
            let lap_start = lap as f64 * lap_time;
            // Later laps skip the frac=0 sample: that instant is already the
            // previous lap's final sample, and timestamps must stay strictly
            // increasing across lap boundaries.
            let first = if lap == 0 { 0 } else { 1 };
            let samples = (first..self.samples_per_lap)
                .map(|i| {
                    let frac = i as f64 / (self.samples_per_lap - 1) as f64;
                    // Uneven spacing: samples bunch up early in the lap.
                    let frac = frac * frac * 0.4 + frac * 0.6;
                    let distance = frac * LAP_LENGTH;
                    let angle = frac * std::f64::consts::TAU;
                    RawSample {
                        t: lap_start + frac * lap_time,
                        x: angle.cos() * 200.0,
                        y: angle.sin() * 200.0,
                        distance,
                        relative_distance: frac,
                        speed: 150.0 + 100.0 * (angle * 3.0).sin().abs(),
                        gear: 3.0 + 4.0 * frac,
                        drs: if frac > 0.7 { 12.0 } else { 0.0 },
                    }
                })
                .collect();

            laps.push(SessionLap {
                lap_number: lap + 1,
                compound: "MEDIUM".to_string(),
                samples,
            });
        }

        Ok(laps)
    }

    fn status_events(&self) -> Result<Vec<StatusEvent>, TelemetryError> {
        let race_end = self.laps as f64 * Self::lap_time(self.entities.saturating_sub(1));
        let mut events = vec![StatusEvent {
            t: 0.0,
            status: "1".to_string(),
        }];
        if race_end > 30.0 {
            events.push(StatusEvent {
                t: race_end * 0.4,
                status: "2".to_string(),
            });
            events.push(StatusEvent {
                t: race_end * 0.6,
                status: "1".to_string(),
            });
        }
        Ok(events)
    }

    fn driver_colors(&self) -> BTreeMap<EntityCode, Rgb> {
        (0..self.entities)
            .map(|i| {
                let shade = (i as u32 * 37 % 200) as u8 + 55;
                (EntityCode::from(Self::code_for(i)), [shade, 60, 180])
            })
            .collect()
    }
}
