//! Mock Replay Example
//!
//! Runs the full pipeline over a synthetic session, without any recorded
//! telemetry on disk.
//!
//! Run with: cargo run --bin mock_replay

use contracts::EngineConfig;
use observability::RunSummary;
use session::{build_race_input, MockSession};
use store::{get_or_compute, FileStore};
use sync_engine::TelemetrySyncEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Mock Replay Demo");

    // ==== Stage 1: Generate a synthetic session ====
    let session = MockSession::new(5, 3, 60);
    let input = build_race_input(&session)?;
    tracing::info!(entities = input.entities.len(), "Mock session generated");

    // ==== Stage 2: Run the engine (with progress logging) ====
    let engine = TelemetrySyncEngine::new(EngineConfig {
        frame_rate: 25.0,
        frame_skip: 1,
    })?;

    let observer = |phase: &str, percent: f64| {
        tracing::info!(phase, percent = format!("{percent:.0}"), "progress");
    };

    // ==== Stage 3: Persist through the store ====
    let mut store = FileStore::new("computed_data")?;
    let payload = get_or_compute(&mut store, "mock_demo", true, || {
        engine.run(&input, Some(&observer))
    })
    .await?;

    // ==== Stage 4: Print the summary ====
    let summary = RunSummary::from_payload("mock_demo", &payload, 0.0);
    print!("{summary}");

    let leader = payload
        .frames
        .last()
        .and_then(|f| f.drivers.iter().find(|(_, d)| d.position == 1));
    if let Some((code, state)) = leader {
        tracing::info!(
            winner = %code,
            distance = state.dist,
            lap = state.lap,
            "Final leader"
        );
    }

    Ok(())
}
