//! Server-resolved combat outcome

use serde::{Deserialize, Serialize};

use crate::core::types::{CombatId, TriggerId, UnitId};
use crate::hex::azimuth::Azimuth;
use crate::hex::coord::Position;

/// One attacker/defender exchange within a step. Read-only once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combat {
    pub combat_id: CombatId,
    pub attacking_unit_id: UnitId,
    pub attacker_position: Position,
    pub attacker_main_trigger_id: TriggerId,
    pub attacker_sub_trigger_id: TriggerId,
    pub attacker_main_trigger_azimuth: Azimuth,
    pub attacker_sub_trigger_azimuth: Azimuth,
    pub attacker_base_attack: i32,
    pub defending_unit_id: UnitId,
    pub defender_position: Position,
    pub defender_main_trigger_id: TriggerId,
    pub defender_sub_trigger_id: TriggerId,
    pub defender_main_trigger_azimuth: Azimuth,
    pub defender_sub_trigger_azimuth: Azimuth,
    /// Defender's main trigger HP after the hit
    pub main_trigger_hp: i32,
    /// Defender's sub trigger HP after the hit
    pub sub_trigger_hp: i32,
    pub defender_base_defense: i32,
    pub defender_base_avoid: i32,
    pub is_avoided: bool,
    pub is_defeated: bool,
}

impl Combat {
    /// Smallest strictly positive trigger HP left on the defender
    pub fn remaining_hp(&self) -> Option<i32> {
        [self.main_trigger_hp, self.sub_trigger_hp]
            .into_iter()
            .filter(|hp| *hp > 0)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combat(main_hp: i32, sub_hp: i32) -> Combat {
        Combat {
            combat_id: CombatId("c1".into()),
            attacking_unit_id: UnitId::new("a"),
            attacker_position: Position::new(1, 1),
            attacker_main_trigger_id: "KOGETSU".into(),
            attacker_sub_trigger_id: "SHIELD".into(),
            attacker_main_trigger_azimuth: Azimuth::NORTH,
            attacker_sub_trigger_azimuth: Azimuth::NORTH,
            attacker_base_attack: 50,
            defending_unit_id: UnitId::new("d"),
            defender_position: Position::new(1, 0),
            defender_main_trigger_id: "ASTEROID".into(),
            defender_sub_trigger_id: "BAGWORM".into(),
            defender_main_trigger_azimuth: Azimuth::NORTH,
            defender_sub_trigger_azimuth: Azimuth::NORTH,
            main_trigger_hp: main_hp,
            sub_trigger_hp: sub_hp,
            defender_base_defense: 10,
            defender_base_avoid: 5,
            is_avoided: false,
            is_defeated: false,
        }
    }

    #[test]
    fn test_remaining_hp_picks_min_positive() {
        assert_eq!(combat(40, 15).remaining_hp(), Some(15));
        assert_eq!(combat(0, 15).remaining_hp(), Some(15));
        assert_eq!(combat(-5, 30).remaining_hp(), Some(30));
    }

    #[test]
    fn test_remaining_hp_none_when_exhausted() {
        assert_eq!(combat(0, 0).remaining_hp(), None);
        assert_eq!(combat(-1, 0).remaining_hp(), None);
    }
}
