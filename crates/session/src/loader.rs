//! Lowering a session source into engine input.

use contracts::{EntityLaps, LapData, RaceInput, SessionSource, TelemetryError};
use tracing::{debug, instrument};

use crate::compound::TyreCompound;

/// Pull everything out of a session source into a plain [`RaceInput`].
///
/// Entities keep the source's order; compound labels become numeric tire
/// codes here so the engine never sees strings.
///
/// # Errors
/// Propagates any source failure; a partially-lowered session is never
/// returned.
#[instrument(name = "build_race_input", skip_all)]
pub fn build_race_input(source: &dyn SessionSource) -> Result<RaceInput, TelemetryError> {
    let mut entities = Vec::new();

    for id in source.entity_ids() {
        let code = source.entity_code(&id)?;
        let laps = source
            .laps(&id)?
            .into_iter()
            .map(|lap| LapData {
                lap_number: lap.lap_number,
                tyre_code: TyreCompound::from_label(&lap.compound).code(),
                samples: lap.samples,
            })
            .collect();
        entities.push(EntityLaps { code, laps });
    }

    debug!(entities = entities.len(), "session lowered to race input");

    Ok(RaceInput {
        entities,
        status_events: source.status_events()?,
        driver_colors: source.driver_colors(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSession;

    #[test]
    fn test_lowering_preserves_source_order() {
        let session = MockSession::new(3, 2, 20);
        let input = build_race_input(&session).unwrap();

        let codes: Vec<String> = input
            .entities
            .iter()
            .map(|e| e.code.as_str().to_string())
            .collect();
        assert_eq!(codes, session.entity_ids());
    }

    #[test]
    fn test_compound_labels_become_codes() {
        let session = MockSession::new(1, 1, 5);
        let input = build_race_input(&session).unwrap();

        // Mock sessions run the whole race on mediums.
        assert_eq!(input.entities[0].laps[0].tyre_code, 2);
    }

    #[test]
    fn test_status_and_colors_carried_over() {
        let session = MockSession::new(2, 1, 5);
        let input = build_race_input(&session).unwrap();

        assert!(!input.status_events.is_empty());
        assert_eq!(input.driver_colors.len(), 2);
    }
}
