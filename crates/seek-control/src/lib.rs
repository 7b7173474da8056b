pub mod controller;
pub mod engine;
pub mod error;

mod position;

pub use controller::{SeekController, SeekOutcome};
pub use engine::{resolve_duration, MediaDuration, MediaEngine, Seconds, SeekTolerance, SeekableRange};
pub use error::{Result, SeekError};
