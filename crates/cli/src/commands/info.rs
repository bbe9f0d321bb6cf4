//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use session::SessionSource;
use tracing::info;

use crate::cli::InfoArgs;

/// Session info for JSON output
#[derive(Serialize)]
struct SessionInfo {
    session_name: String,
    input: String,
    entities: Vec<EntityInfo>,
    status_events: usize,
    colored_entities: usize,
    engine: EngineInfo,
}

#[derive(Serialize)]
struct EntityInfo {
    id: String,
    code: String,
    lap_count: usize,
    sample_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    laps: Vec<LapInfo>,
}

#[derive(Serialize)]
struct LapInfo {
    lap_number: u32,
    compound: String,
    samples: usize,
}

#[derive(Serialize)]
struct EngineInfo {
    frame_rate: f64,
    frame_skip: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading session info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let source = session::JsonSessionSource::from_path(&config.session.input)
        .with_context(|| {
            format!(
                "Failed to load session from {}",
                config.session.input.display()
            )
        })?;

    let session_info = build_session_info(&config, &source, args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&session_info)
            .context("Failed to serialize session info")?;
        println!("{}", json);
    } else {
        print_session_info(&session_info, args);
    }

    Ok(())
}

fn build_session_info(
    config: &contracts::ReplayConfig,
    source: &session::JsonSessionSource,
    args: &InfoArgs,
) -> Result<SessionInfo> {
    let mut entities = Vec::new();
    for id in source.entity_ids() {
        let code = source.entity_code(&id)?;
        let laps = source.laps(&id)?;
        let sample_count = laps.iter().map(|lap| lap.samples.len()).sum();

        let lap_details = if args.laps {
            laps.iter()
                .map(|lap| LapInfo {
                    lap_number: lap.lap_number,
                    compound: lap.compound.clone(),
                    samples: lap.samples.len(),
                })
                .collect()
        } else {
            Vec::new()
        };

        entities.push(EntityInfo {
            id,
            code: code.as_str().to_string(),
            lap_count: laps.len(),
            sample_count,
            laps: lap_details,
        });
    }

    Ok(SessionInfo {
        session_name: config.session_name(),
        input: config.session.input.display().to_string(),
        entities,
        status_events: source.status_events()?.len(),
        colored_entities: source.driver_colors().len(),
        engine: EngineInfo {
            frame_rate: config.engine.frame_rate,
            frame_skip: config.engine.frame_skip,
        },
    })
}

fn print_session_info(session_info: &SessionInfo, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                Replay Syncer Session Info                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📍 Session");
    println!("   ├─ Name: {}", session_info.session_name);
    println!("   ├─ Input: {}", session_info.input);
    println!("   ├─ Status events: {}", session_info.status_events);
    println!("   └─ Colored competitors: {}", session_info.colored_entities);

    println!("\n🏎️  Competitors ({})", session_info.entities.len());
    for (i, entity) in session_info.entities.iter().enumerate() {
        let is_last = i == session_info.entities.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!(
            "   {} {} (id {}) - {} laps, {} samples",
            prefix, entity.code, entity.id, entity.lap_count, entity.sample_count
        );

        if args.laps {
            for (j, lap) in entity.laps.iter().enumerate() {
                let lap_is_last = j == entity.laps.len() - 1;
                let lap_prefix = if lap_is_last { "└─" } else { "├─" };
                println!(
                    "   {}  {} Lap {} ({}, {} samples)",
                    child_prefix, lap_prefix, lap.lap_number, lap.compound, lap.samples
                );
            }
        }
    }

    println!("\n⚙️  Engine Settings");
    println!("   ├─ Frame rate: {} Hz", session_info.engine.frame_rate);
    println!("   └─ Frame stride: {}", session_info.engine.frame_skip);

    println!();
}
