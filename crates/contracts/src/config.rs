//! Engine and run configuration contracts shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Reference frame rate (Hz); changing it changes `dt` and thus frame count.
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

/// Sync engine configuration
///
/// These are the engine's only tunables. Caching keys, storage, and transport
/// are entirely the orchestrating layer's concern.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    /// Output frame rate (Hz); `dt = 1 / frame_rate`
    #[serde(default = "default_frame_rate")]
    #[validate(range(min = 0.001, max = 1000.0))]
    pub frame_rate: f64,

    /// Keep every Nth frame after full-resolution assembly (1 = all frames)
    #[serde(default = "default_frame_skip")]
    #[validate(range(min = 1))]
    pub frame_skip: usize,
}

impl EngineConfig {
    /// Tick spacing (seconds).
    pub fn dt(&self) -> f64 {
        1.0 / self.frame_rate
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            frame_skip: 1,
        }
    }
}

fn default_frame_rate() -> f64 {
    DEFAULT_FRAME_RATE
}

fn default_frame_skip() -> usize {
    1
}

/// Session input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path to the recorded session file (JSON)
    pub input: PathBuf,

    /// Session name override; defaults to the input file stem
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory for computed payloads
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Recompute even if a cached payload exists
    #[serde(default)]
    pub refresh: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            refresh: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("computed_data")
}

/// Complete run configuration for the replay syncer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplayConfig {
    /// Session input
    pub session: SessionConfig,

    /// Engine tunables
    #[serde(default)]
    #[validate(nested)]
    pub engine: EngineConfig,

    /// Payload store
    #[serde(default)]
    pub store: StoreConfig,
}

impl ReplayConfig {
    /// Cache/storage key for this run: configured name or the input file stem.
    pub fn session_name(&self) -> String {
        self.session
            .name
            .clone()
            .or_else(|| {
                self.session
                    .input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "session".to_string())
    }
}
