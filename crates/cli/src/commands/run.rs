//! `run` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ReplayConfig;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::Pipeline;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref input) = args.input {
        info!(input = %input.display(), "Overriding session input from CLI");
        config.session.input = input.clone();
    }
    if let Some(frame_rate) = args.frame_rate {
        info!(frame_rate, "Overriding frame rate from CLI");
        config.engine.frame_rate = frame_rate;
    }
    if let Some(frame_skip) = args.frame_skip {
        info!(frame_skip, "Overriding frame stride from CLI");
        config.engine.frame_skip = frame_skip;
    }
    if args.refresh {
        config.store.refresh = true;
    }

    info!(
        session = %config.session_name(),
        input = %config.session.input.display(),
        frame_rate = config.engine.frame_rate,
        frame_skip = config.engine.frame_skip,
        output_dir = %config.store.output_dir.display(),
        refresh = config.store.refresh,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    // Metrics endpoint (tracing is already initialized by main)
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let pipeline = Pipeline::new(config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");

    tokio::select! {
        result = pipeline.run() => {
            let outcome = result.context("Pipeline execution failed")?;

            info!(
                frames = outcome.summary.frames,
                entities = outcome.summary.entities,
                from_store = outcome.from_store,
                "Pipeline completed successfully"
            );
            print!("{}", outcome.summary);

            if let Some(ref output) = args.output {
                write_payload(output, &outcome.payload)?;
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("Replay Syncer finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Write the payload JSON to a file, or stdout for "-".
fn write_payload(output: &Path, payload: &contracts::ReplayPayload) -> Result<()> {
    let json = serde_json::to_string(payload).context("Failed to serialize payload")?;
    if output.as_os_str() == "-" {
        println!("{json}");
    } else {
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write payload to {}", output.display()))?;
        info!(path = %output.display(), "Payload written");
    }
    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &ReplayConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Session:");
    println!("  Name: {}", config.session_name());
    println!("  Input: {}", config.session.input.display());
    println!("\nEngine:");
    println!("  Frame rate: {} Hz (dt = {:.4}s)", config.engine.frame_rate, config.engine.dt());
    println!("  Frame stride: {}", config.engine.frame_skip);
    println!("\nStore:");
    println!("  Output dir: {}", config.store.output_dir.display());
    println!("  Refresh: {}", config.store.refresh);
    println!();
}
