//! Unit lists as reported by the server in a game-state message

use serde::{Deserialize, Serialize};

use crate::core::types::{TriggerId, UnitId, UnitTypeId};
use crate::hex::coord::Position;

/// Own unit, fully visible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendUnitSnapshot {
    pub unit_id: UnitId,
    pub unit_type_id: UnitTypeId,
    pub position: Position,
    pub using_main_trigger_id: TriggerId,
    pub using_sub_trigger_id: TriggerId,
    #[serde(default)]
    pub having_main_trigger_ids: Vec<TriggerId>,
    #[serde(default)]
    pub having_sub_trigger_ids: Vec<TriggerId>,
    #[serde(default)]
    pub main_trigger_hp: i32,
    #[serde(default)]
    pub sub_trigger_hp: i32,
    #[serde(default)]
    pub sight_range: u32,
    #[serde(default)]
    pub is_bailout: bool,
}

/// Opponent unit; position is in the opponent's own frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyUnitSnapshot {
    pub unit_id: UnitId,
    #[serde(default = "unknown_unit_type")]
    pub unit_type_id: UnitTypeId,
    pub position: Position,
    #[serde(default)]
    pub using_main_trigger_id: TriggerId,
    #[serde(default)]
    pub using_sub_trigger_id: TriggerId,
    #[serde(default)]
    pub is_bailout: bool,
}

fn unknown_unit_type() -> UnitTypeId {
    "UNKNOWN".to_string()
}
