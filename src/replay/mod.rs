//! Server-confirmed turn playback

pub mod engine;

pub use engine::{apply_step, Continuation, ReplayEngine, ReplayProgress, StepReport};
