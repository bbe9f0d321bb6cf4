//! # Session Loading
//!
//! Turns a recorded race session into the engine's input shape.
//!
//! Responsibilities:
//! - Load session archives from JSON files (`JsonSessionSource`)
//! - Map tire compound labels to numeric codes
//! - Lower any `SessionSource` into a `RaceInput` (`build_race_input`)
//! - Generate deterministic synthetic sessions for testing (`MockSession`)
//!
//! ## Usage Example
//!
//! ```ignore
//! use session::{JsonSessionSource, build_race_input};
//!
//! let source = JsonSessionSource::from_path("session.json")?;
//! let input = build_race_input(&source)?;
//! ```

mod compound;
mod json;
mod loader;
mod mock;

pub use compound::TyreCompound;
pub use contracts::{RaceInput, SessionSource};
pub use json::{JsonSessionSource, SessionFile};
pub use loader::build_race_input;
pub use mock::MockSession;
