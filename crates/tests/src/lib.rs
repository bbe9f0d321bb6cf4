//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Contract smoke tests
//! - Mock session end-to-end runs (session -> engine -> payload)
//! - Store round trips
//! - Configuration loading

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let code = contracts::EntityCode::new("VER");
        assert_eq!(code.as_str(), "VER");
        assert_eq!(contracts::DEFAULT_FRAME_RATE, 25.0);
    }
}

#[cfg(test)]
mod e2e_tests {
    use contracts::{EngineConfig, RaceInput, ReplayPayload};
    use session::{build_race_input, MockSession};
    use sync_engine::TelemetrySyncEngine;

    fn mock_input() -> RaceInput {
        // 3 competitors, 2 laps each, C01 fastest.
        build_race_input(&MockSession::new(3, 2, 40)).unwrap()
    }

    fn run(input: &RaceInput, frame_rate: f64, frame_skip: usize) -> ReplayPayload {
        TelemetrySyncEngine::new(EngineConfig {
            frame_rate,
            frame_skip,
        })
        .unwrap()
        .run(input, None)
        .unwrap()
    }

    /// Full pipeline: mock session -> race input -> ranked frames.
    #[test]
    fn test_e2e_mock_session() {
        let payload = run(&mock_input(), 1.0, 1);

        // Slowest competitor (C03) spans 0..122s at 1 Hz, half-open.
        assert_eq!(payload.frames.len(), 122);
        assert_eq!(payload.frames[0].t, 0.0);

        for frame in &payload.frames {
            assert_eq!(frame.drivers.len(), 3);
        }

        // C01 is the fastest, so it has covered the most distance at the end.
        let last = payload.frames.last().unwrap();
        assert_eq!(last.drivers.get("C01").unwrap().position, 1);
    }

    #[test]
    fn test_positions_are_dense_every_frame() {
        let payload = run(&mock_input(), 1.0, 1);

        for frame in &payload.frames {
            let mut positions: Vec<u32> =
                frame.drivers.values().map(|d| d.position).collect();
            positions.sort_unstable();
            assert_eq!(positions, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_race_distance_never_decreases() {
        let payload = run(&mock_input(), 5.0, 1);

        for code in ["C01", "C02", "C03"] {
            let dists: Vec<f64> = payload
                .frames
                .iter()
                .map(|f| f.drivers.get(code).unwrap().dist)
                .collect();
            for w in dists.windows(2) {
                assert!(w[1] >= w[0], "{code} distance regressed: {w:?}");
            }
        }
    }

    #[test]
    fn test_frames_are_evenly_spaced() {
        let payload = run(&mock_input(), 25.0, 1);

        for w in payload.frames.windows(2) {
            assert!((w[1].t - w[0].t - 0.04).abs() < 1e-9);
        }
    }

    #[test]
    fn test_status_intervals_are_contiguous() {
        let payload = run(&mock_input(), 1.0, 1);

        assert_eq!(payload.track_statuses.len(), 3);
        for pair in payload.track_statuses.windows(2) {
            assert_eq!(pair[0].end_time, Some(pair[1].start_time));
        }
        assert_eq!(payload.track_statuses.last().unwrap().end_time, None);
    }

    #[test]
    fn test_stride_equals_subsampled_full_run() {
        let input = mock_input();
        let full = run(&input, 5.0, 1);
        let strided = run(&input, 5.0, 4);

        let expected: Vec<_> = full.frames.iter().step_by(4).cloned().collect();
        assert_eq!(strided.frames, expected);
        assert_eq!(strided.track_statuses, full.track_statuses);
    }

    #[test]
    fn test_runs_are_byte_identical() {
        let input = mock_input();
        let a = serde_json::to_vec(&run(&input, 25.0, 1)).unwrap();
        let b = serde_json::to_vec(&run(&input, 25.0, 1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_driver_colors_survive_the_pipeline() {
        let payload = run(&mock_input(), 1.0, 1);
        assert_eq!(payload.driver_colors.len(), 3);
        assert!(payload.driver_colors.contains_key("C01"));
    }
}

#[cfg(test)]
mod archive_tests {
    use contracts::EngineConfig;
    use session::{build_race_input, JsonSessionSource};
    use sync_engine::TelemetrySyncEngine;

    /// Two competitors with different coverage: A spans the whole window,
    /// B joins a second late and is clamp-extrapolated before that.
    const ARCHIVE: &str = r#"{
        "name": "two_car_race",
        "entities": [
            {
                "id": "1", "code": "AAA",
                "laps": [{
                    "lap_number": 1, "compound": "SOFT",
                    "samples": [
                        {"t": 0.0, "x": 0.0, "y": 0.0, "distance": 0.0,
                         "relative_distance": 0.0, "speed": 100.0, "gear": 3.0, "drs": 0.0},
                        {"t": 4.0, "x": 4.0, "y": 0.0, "distance": 100.0,
                         "relative_distance": 1.0, "speed": 100.0, "gear": 3.0, "drs": 0.0}
                    ]
                }]
            },
            {
                "id": "2", "code": "BBB",
                "laps": [{
                    "lap_number": 1, "compound": "WET",
                    "samples": [
                        {"t": 1.0, "x": 0.0, "y": 0.0, "distance": 0.0,
                         "relative_distance": 0.0, "speed": 80.0, "gear": 2.0, "drs": 0.0},
                        {"t": 4.0, "x": 3.0, "y": 0.0, "distance": 80.0,
                         "relative_distance": 0.8, "speed": 80.0, "gear": 2.0, "drs": 0.0}
                    ]
                }]
            }
        ],
        "status_events": [{"t": 0.0, "status": "1"}],
        "driver_colors": {"AAA": [255, 0, 0], "BBB": [0, 0, 255]}
    }"#;

    #[test]
    fn test_archive_to_ranked_frames() {
        let source = JsonSessionSource::from_str(ARCHIVE).unwrap();
        let input = build_race_input(&source).unwrap();

        // Compound labels arrive as numeric codes.
        assert_eq!(input.entities[0].laps[0].tyre_code, 1);
        assert_eq!(input.entities[1].laps[0].tyre_code, 5);

        let payload = TelemetrySyncEngine::new(EngineConfig {
            frame_rate: 1.0,
            frame_skip: 1,
        })
        .unwrap()
        .run(&input, None)
        .unwrap();

        assert_eq!(payload.frames.len(), 4);
        for frame in &payload.frames {
            // A covers more distance at every tick, so it always leads.
            assert_eq!(frame.drivers.get("AAA").unwrap().position, 1);
            assert_eq!(frame.drivers.get("BBB").unwrap().position, 2);
        }

        // B holds its first sample before it appears at t=1.
        let b0 = payload.frames[0].drivers.get("BBB").unwrap();
        assert_eq!(b0.dist, 0.0);
        assert_eq!(b0.tyre, 5);
    }
}

#[cfg(test)]
mod store_tests {
    use contracts::EngineConfig;
    use session::{build_race_input, MockSession};
    use store::{get_or_compute, FileStore, PayloadStore};
    use sync_engine::TelemetrySyncEngine;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_engine_payload_round_trips_through_store() {
        let input = build_race_input(&MockSession::new(2, 1, 20)).unwrap();
        let engine = TelemetrySyncEngine::new(EngineConfig {
            frame_rate: 5.0,
            frame_skip: 1,
        })
        .unwrap();

        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        assert_eq!(store.name(), "file");

        let computed = get_or_compute(&mut store, "mock_race", false, || {
            engine.run(&input, None)
        })
        .await
        .unwrap();

        let cached = get_or_compute(&mut store, "mock_race", false, || {
            panic!("payload must come from the store")
        })
        .await
        .unwrap();

        assert_eq!(
            serde_json::to_vec(&computed).unwrap(),
            serde_json::to_vec(&cached).unwrap()
        );
    }
}

#[cfg(test)]
mod summary_tests {
    use contracts::EngineConfig;
    use observability::RunSummary;
    use session::{build_race_input, MockSession};
    use sync_engine::TelemetrySyncEngine;

    #[test]
    fn test_run_summary_matches_payload() {
        let input = build_race_input(&MockSession::new(2, 1, 20)).unwrap();
        let payload = TelemetrySyncEngine::new(EngineConfig {
            frame_rate: 2.0,
            frame_skip: 1,
        })
        .unwrap()
        .run(&input, None)
        .unwrap();

        let summary = RunSummary::from_payload("mock_race", &payload, 0.1);
        assert_eq!(summary.frames, payload.frames.len());
        assert_eq!(summary.entities, 2);
        assert!(summary.span_secs > 0.0);

        let rendered = format!("{summary}");
        assert!(rendered.contains("Session: mock_race"));
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::ConfigLoader;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"
[session]
input = "races/monza.json"

[engine]
frame_rate = 10.0
"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.session_name(), "monza");
        assert_eq!(config.engine.frame_rate, 10.0);
        assert_eq!(config.engine.frame_skip, 1);
    }
}
