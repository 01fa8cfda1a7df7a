//! Unit type and trigger master data
//!
//! Built-in defaults mirror the live server. A config file may replace
//! either list wholesale.

use serde::{Deserialize, Serialize};

use crate::core::types::{TriggerId, UnitTypeId};

/// Per-trigger fan shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub id: TriggerId,
    /// Fan width in degrees
    pub angle: f64,
    /// Reach in cells
    pub range: u32,
}

/// Per-unit-type stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTypeSpec {
    pub id: UnitTypeId,
    /// Action points granted at the start of each turn
    pub action_points: u32,
    pub base_attack: i32,
    pub base_defense: i32,
    pub base_avoid: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitCatalog {
    /// Budget for unit types missing from `unit_types`
    pub default_action_points: u32,
    pub unit_types: Vec<UnitTypeSpec>,
    pub triggers: Vec<TriggerSpec>,
}

impl Default for UnitCatalog {
    fn default() -> Self {
        let unit = |id: &str, base_attack, base_defense, base_avoid| UnitTypeSpec {
            id: id.to_string(),
            action_points: 2,
            base_attack,
            base_defense,
            base_avoid,
        };
        let trigger = |id: &str, angle, range| TriggerSpec {
            id: id.to_string(),
            angle,
            range,
        };

        Self {
            default_action_points: 2,
            unit_types: vec![
                unit("MIKUMO_OSAMU", 30, 10, 5),
                unit("KUGA_YUMA", 50, 5, 10),
                unit("AMATORI_CHIKA", 25, 15, 5),
                unit("HYUSE_KURONIN", 25, 15, 5),
            ],
            triggers: vec![
                trigger("KOGETSU", 120.0, 2),
                trigger("RAYGUST", 120.0, 2),
                trigger("SCOPEON", 120.0, 1),
                trigger("ASTEROID", 60.0, 5),
                trigger("IBIS", 30.0, 10),
                trigger("SHIELD", 120.0, 1),
                trigger("BAGWORM", 60.0, 1),
            ],
        }
    }
}

impl UnitCatalog {
    pub fn unit_type(&self, id: &str) -> Option<&UnitTypeSpec> {
        self.unit_types.iter().find(|spec| spec.id == id)
    }

    pub fn trigger(&self, id: &str) -> Option<&TriggerSpec> {
        self.triggers.iter().find(|spec| spec.id == id)
    }

    /// Turn budget for a unit type, falling back to the default
    pub fn action_points(&self, unit_type_id: &str) -> u32 {
        self.unit_type(unit_type_id)
            .map(|spec| spec.action_points)
            .unwrap_or(self.default_action_points)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_action_points == 0 {
            return Err("default_action_points must be positive".into());
        }

        for (i, spec) in self.unit_types.iter().enumerate() {
            if spec.action_points == 0 {
                return Err(format!("unit type {} has no action points", spec.id));
            }
            if self.unit_types[..i].iter().any(|other| other.id == spec.id) {
                return Err(format!("duplicate unit type {}", spec.id));
            }
        }

        for (i, spec) in self.triggers.iter().enumerate() {
            if !(spec.angle > 0.0 && spec.angle <= 360.0) {
                return Err(format!(
                    "trigger {} angle must be in (0, 360], got {}",
                    spec.id, spec.angle
                ));
            }
            if self.triggers[..i].iter().any(|other| other.id == spec.id) {
                return Err(format!("duplicate trigger {}", spec.id));
            }
        }

        Ok(())
    }
}
