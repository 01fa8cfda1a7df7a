//! Trigger Tactics - turn-based hex tactics client core
//!
//! Composes turns from pointer input, submits them to the game server, and
//! replays the server's confirmed results step by step.

pub mod composer;
pub mod core;
pub mod hex;
pub mod replay;
pub mod session;
pub mod turn;
pub mod unit;
