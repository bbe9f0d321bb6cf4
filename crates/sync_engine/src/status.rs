//! Race-control status interval construction.

use contracts::{StatusEvent, StatusInterval};
use tracing::instrument;

/// Converts discrete status-change events into contiguous intervals aligned
/// to the shared timeline origin.
pub struct StatusIntervalBuilder;

impl StatusIntervalBuilder {
    /// Build contiguous intervals from chronological status events.
    ///
    /// Each event opens an interval; the next event's (shifted) start closes
    /// the previous one. The last interval stays open (`end_time == None`).
    /// Event order is preserved as given; unlike trace extraction, no re-sort
    /// happens here. Starts can be negative when an event predates
    /// `global_t_min`.
    #[instrument(
        name = "status_intervals_build",
        level = "debug",
        skip(events),
        fields(events = events.len())
    )]
    pub fn build(events: &[StatusEvent], global_t_min: f64) -> Vec<StatusInterval> {
        let mut intervals: Vec<StatusInterval> = Vec::with_capacity(events.len());

        for event in events {
            let start_time = event.t - global_t_min;
            if let Some(prev) = intervals.last_mut() {
                prev.end_time = Some(start_time);
            }
            intervals.push(StatusInterval {
                status: event.status.clone(),
                start_time,
                end_time: None,
            });
        }

        intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(t: f64, status: &str) -> StatusEvent {
        StatusEvent {
            t,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_intervals_are_contiguous() {
        let events = vec![
            make_event(0.0, "1"),
            make_event(50.0, "2"),
            make_event(80.0, "1"),
        ];

        let intervals = StatusIntervalBuilder::build(&events, 0.0);

        assert_eq!(intervals.len(), 3);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].end_time, Some(pair[1].start_time));
        }
        assert_eq!(intervals[2].end_time, None);
    }

    #[test]
    fn test_shift_can_produce_negative_start() {
        // Event at t=0 with global window starting at 10 lands at -10.
        let events = vec![make_event(0.0, "1"), make_event(120.0, "2")];

        let intervals = StatusIntervalBuilder::build(&events, 10.0);

        assert_eq!(intervals[0].status, "1");
        assert_eq!(intervals[0].start_time, -10.0);
        assert_eq!(intervals[0].end_time, Some(110.0));
        assert_eq!(intervals[1].status, "2");
        assert_eq!(intervals[1].start_time, 110.0);
        assert_eq!(intervals[1].end_time, None);
    }

    #[test]
    fn test_empty_events_yield_no_intervals() {
        let intervals = StatusIntervalBuilder::build(&[], 0.0);
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_single_event_stays_open() {
        let intervals = StatusIntervalBuilder::build(&[make_event(3.0, "4")], 1.0);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_time, 2.0);
        assert_eq!(intervals[0].end_time, None);
    }
}
