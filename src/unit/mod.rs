//! Unit state, roster and master data

pub mod catalog;
pub mod roster;
pub mod snapshot;
pub mod state;

pub use catalog::{TriggerSpec, UnitCatalog, UnitTypeSpec};
pub use roster::UnitRoster;
pub use snapshot::{EnemyUnitSnapshot, FriendUnitSnapshot};
pub use state::{CombatEffect, OpponentUnit, PlayerUnit, UnitState};
