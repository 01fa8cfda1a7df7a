//! Builds a turn from interactive input

pub mod autopilot;
pub mod rejection;
pub mod turn_composer;

pub use autopilot::Autopilot;
pub use rejection::Rejection;
pub use turn_composer::{ComposerOutcome, ComposerPhase, PendingOrder, TurnComposer, UnitPhase};
