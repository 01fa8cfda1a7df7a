//! Inbound turn parsing
//!
//! A turn arrives as loosely typed JSON. The envelope (turn fields and the
//! step list) must be well formed or the whole message is dropped. Each
//! action and combat entry is then validated on its own, so one bad entry
//! costs only that entry.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::types::{ActionId, StepId, TriggerId, UnitId, UnitTypeId};
use crate::hex::azimuth::{Azimuth, TriggerDirection};
use crate::hex::coord::Position;
use crate::hex::layout::GridConfig;
use crate::turn::action::{Action, ActionKind};
use crate::turn::combat::Combat;
use crate::turn::draft::{Turn, TurnStatus};
use crate::turn::step::Step;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Step {step} {entry} {index} rejected: {reason}")]
    Desync {
        step: usize,
        entry: EntryKind,
        index: usize,
        reason: String,
    },
}

/// Which list inside a step a rejected entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Action,
    Combat,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Action => f.write_str("action"),
            EntryKind::Combat => f.write_str("combat"),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTurn {
    #[serde(default)]
    turn_status: Option<TurnStatus>,
    steps: Vec<RawStep>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    #[serde(default)]
    step_id: Option<StepId>,
    #[serde(default)]
    actions: Vec<Value>,
    #[serde(default)]
    combats: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    #[serde(default)]
    action_id: Option<ActionId>,
    action_type: ActionKind,
    unit_id: UnitId,
    unit_type_id: UnitTypeId,
    position: Position,
    using_main_trigger_id: TriggerId,
    using_sub_trigger_id: TriggerId,
    main_trigger_azimuth: Azimuth,
    sub_trigger_azimuth: Azimuth,
}

impl RawAction {
    fn validate(self, grid: &GridConfig) -> Result<Action, String> {
        if self.unit_id.as_str().is_empty() {
            return Err("empty unit id".into());
        }
        if !self.position.is_within(grid) {
            return Err(format!("position {} outside grid", self.position));
        }

        Ok(Action::with_id(
            self.action_id.unwrap_or_default(),
            self.action_type,
            self.unit_id,
            self.unit_type_id,
            self.position,
            (self.using_main_trigger_id, self.using_sub_trigger_id),
            TriggerDirection::new(self.main_trigger_azimuth, self.sub_trigger_azimuth),
        ))
    }
}

fn validate_combat(combat: Combat, grid: &GridConfig) -> Result<Combat, String> {
    if combat.attacking_unit_id.as_str().is_empty() {
        return Err("empty attacking unit id".into());
    }
    if combat.defending_unit_id.as_str().is_empty() {
        return Err("empty defending unit id".into());
    }
    if !combat.attacker_position.is_within(grid) {
        return Err(format!(
            "attacker position {} outside grid",
            combat.attacker_position
        ));
    }
    if !combat.defender_position.is_within(grid) {
        return Err(format!(
            "defender position {} outside grid",
            combat.defender_position
        ));
    }
    Ok(combat)
}

/// Parse a server turn payload.
///
/// Returns the turn built from every valid entry, plus one `Desync` report per
/// skipped entry. Envelope errors are returned as `Serialization`.
pub fn parse_turn(
    turn_number: u32,
    payload: &Value,
    grid: &GridConfig,
) -> Result<(Turn, Vec<ProtocolError>), ProtocolError> {
    let raw = RawTurn::deserialize(payload)?;
    let mut desyncs = Vec::new();
    let mut steps = Vec::with_capacity(raw.steps.len());

    for (step_index, raw_step) in raw.steps.into_iter().enumerate() {
        let mut step = Step {
            step_id: raw_step.step_id.unwrap_or_default(),
            actions: Vec::with_capacity(raw_step.actions.len()),
            combats: Vec::with_capacity(raw_step.combats.len()),
        };

        for (index, entry) in raw_step.actions.into_iter().enumerate() {
            let parsed = RawAction::deserialize(entry)
                .map_err(|e| e.to_string())
                .and_then(|raw| raw.validate(grid));
            match parsed {
                Ok(action) => step.actions.push(action),
                Err(reason) => {
                    let err = ProtocolError::Desync {
                        step: step_index,
                        entry: EntryKind::Action,
                        index,
                        reason,
                    };
                    tracing::warn!(turn = turn_number, "{}", err);
                    desyncs.push(err);
                }
            }
        }

        for (index, entry) in raw_step.combats.into_iter().enumerate() {
            let parsed = Combat::deserialize(entry)
                .map_err(|e| e.to_string())
                .and_then(|combat| validate_combat(combat, grid));
            match parsed {
                Ok(combat) => step.combats.push(combat),
                Err(reason) => {
                    let err = ProtocolError::Desync {
                        step: step_index,
                        entry: EntryKind::Combat,
                        index,
                        reason,
                    };
                    tracing::warn!(turn = turn_number, "{}", err);
                    desyncs.push(err);
                }
            }
        }

        steps.push(step);
    }

    let turn = Turn {
        turn_number,
        status: raw.turn_status.unwrap_or(TurnStatus::Completed),
        steps,
    };
    Ok((turn, desyncs))
}

/// Parse a turn payload given as JSON text
pub fn parse_turn_str(
    turn_number: u32,
    payload: &str,
    grid: &GridConfig,
) -> Result<(Turn, Vec<ProtocolError>), ProtocolError> {
    let value: Value = serde_json::from_str(payload)?;
    parse_turn(turn_number, &value, grid)
}
