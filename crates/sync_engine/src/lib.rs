//! # Sync Engine
//!
//! Resampling, synchronization, and ranking engine for race replay playback.
//!
//! Responsible for:
//! - Per-entity trace extraction with cumulative race distance
//! - Shared fixed-rate timeline derivation
//! - Channel resampling with clamped extrapolation
//! - Race-control status interval construction
//! - Ranked frame assembly and stride decimation
//!
//! The engine is a single batch, CPU-bound, synchronous transform: no I/O, no
//! shared state across invocations, referentially transparent given identical
//! raw input.
//!
//! ## Usage example
//!
//! ```ignore
//! use sync_engine::{EngineConfig, TelemetrySyncEngine};
//!
//! let engine = TelemetrySyncEngine::new(EngineConfig::default())?;
//! let payload = engine.run(&race_input, None)?;
//! ```

mod engine;
mod extract;
mod frames;
mod resample;
mod status;
mod timeline;

pub use engine::TelemetrySyncEngine;
pub use extract::EntityTraceExtractor;
pub use frames::FrameAssembler;
pub use resample::ChannelResampler;
pub use status::StatusIntervalBuilder;
pub use timeline::TimelineBuilder;

// Re-export contracts types
pub use contracts::{
    EngineConfig, EntityTrace, Frame, NoopProgress, ProgressObserver, RaceInput, ReplayPayload,
    ResampledTrace, StatusInterval, Timeline,
};
