//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Raw sample timestamps are entity-local session clocks (seconds, f64)
//! - The engine shifts everything onto a shared timeline starting at 0
//! - Timeline ticks are evenly spaced by `dt = 1 / frame_rate`

mod config;
mod entity_code;
mod error;
mod frame;
mod progress;
mod sample;
mod session_source;
mod status;
mod store;
mod trace;

pub use config::*;
pub use entity_code::EntityCode;
pub use error::*;
pub use frame::*;
pub use progress::*;
pub use sample::*;
pub use session_source::SessionSource;
pub use status::*;
pub use store::*;
pub use trace::*;
