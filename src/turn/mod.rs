//! Action / step / turn model and the inbound turn parser

pub mod action;
pub mod combat;
pub mod draft;
pub mod step;
pub mod wire;

pub use action::{Action, ActionKind};
pub use combat::Combat;
pub use draft::{Turn, TurnDraft, TurnStatus};
pub use step::Step;
pub use wire::{parse_turn, parse_turn_str, EntryKind, ProtocolError};
