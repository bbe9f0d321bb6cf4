//! Pipeline orchestrator - session loading, engine runs, payload caching.

use std::cell::Cell;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{EngineConfig, ReplayConfig, ReplayPayload};
use observability::RunSummary;
use session::{build_race_input, JsonSessionSource};
use store::{get_or_compute, FileStore, PayloadStore};
use sync_engine::{FrameAssembler, TelemetrySyncEngine};
use tracing::{debug, info};

/// Result of one pipeline run.
pub struct PipelineOutcome {
    /// Decimated payload, ready for playback
    pub payload: ReplayPayload,

    /// Printable run summary
    pub summary: RunSummary,

    /// Whether the payload came from the store rather than a fresh compute
    pub from_store: bool,
}

/// Orchestrates one end-to-end run: load session, compute or fetch the
/// payload, decimate, summarize.
///
/// The store always holds the full-resolution payload; the frame stride is
/// applied after loading, so changing `frame_skip` never invalidates the
/// cache.
pub struct Pipeline {
    config: ReplayConfig,
}

impl Pipeline {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Execute the pipeline.
    pub async fn run(&self) -> Result<PipelineOutcome> {
        let key = self.config.session_name();

        info!(
            input = %self.config.session.input.display(),
            session = %key,
            "Loading session"
        );
        let source = JsonSessionSource::from_path(&self.config.session.input)
            .with_context(|| {
                format!(
                    "Failed to load session from {}",
                    self.config.session.input.display()
                )
            })?;
        let input = build_race_input(&source).context("Failed to lower session")?;
        observability::record_session_loaded(&key, input.entities.len());

        let mut store = FileStore::new(&self.config.store.output_dir)
            .context("Failed to open payload store")?;

        // The full-resolution payload is what gets cached; stride comes later.
        let engine = TelemetrySyncEngine::new(EngineConfig {
            frame_rate: self.config.engine.frame_rate,
            frame_skip: 1,
        })?;

        // Relay engine progress out of the compute closure into the log.
        let (progress_tx, mut progress_rx) =
            tokio::sync::mpsc::unbounded_channel::<(String, f64)>();
        let progress_task = tokio::spawn(async move {
            while let Some((phase, percent)) = progress_rx.recv().await {
                info!(phase = %phase, percent = format!("{percent:.0}"), "Engine progress");
            }
        });

        let computed = Cell::new(false);
        let computed_flag = &computed;
        let started = Instant::now();
        let observer = move |phase: &str, percent: f64| {
            let _ = progress_tx.send((phase.to_string(), percent));
        };

        // `move` so the progress sender is dropped with the closure and the
        // relay task can finish.
        let full = get_or_compute(&mut store, &key, self.config.store.refresh, move || {
            computed_flag.set(true);
            tokio::task::block_in_place(|| engine.run(&input, Some(&observer)))
        })
        .await?;

        let from_store = !computed.get();
        let elapsed = if from_store {
            0.0
        } else {
            started.elapsed().as_secs_f64()
        };
        observability::record_store_access(store.name(), from_store);
        progress_task.await.ok();

        let mut payload = full;
        if self.config.engine.frame_skip > 1 {
            let before = payload.frames.len();
            payload.frames =
                FrameAssembler::decimate(payload.frames, self.config.engine.frame_skip);
            debug!(
                before,
                after = payload.frames.len(),
                stride = self.config.engine.frame_skip,
                "Frame stride applied"
            );
        }

        observability::record_payload_metrics(&payload, elapsed);
        let summary = RunSummary::from_payload(&key, &payload, elapsed);

        Ok(PipelineOutcome {
            payload,
            summary,
            from_store,
        })
    }
}
