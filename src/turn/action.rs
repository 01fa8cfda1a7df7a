//! A single unit's single action

use serde::{Deserialize, Serialize};

use crate::core::types::{ActionId, TriggerId, UnitId, UnitTypeId};
use crate::hex::azimuth::{Azimuth, TriggerDirection};
use crate::hex::coord::Position;

/// What a unit does with one action point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    Wait,
    Guard,
    UniqueCommand,
    PursuitMove,
}

/// One unit's state at the end of one step: where it stands and where its
/// triggers face. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    action_id: ActionId,
    #[serde(rename = "actionType")]
    kind: ActionKind,
    unit_id: UnitId,
    unit_type_id: UnitTypeId,
    position: Position,
    using_main_trigger_id: TriggerId,
    using_sub_trigger_id: TriggerId,
    main_trigger_azimuth: Azimuth,
    sub_trigger_azimuth: Azimuth,
}

impl Action {
    pub fn new(
        kind: ActionKind,
        unit_id: UnitId,
        unit_type_id: impl Into<UnitTypeId>,
        position: Position,
        triggers: (TriggerId, TriggerId),
        direction: TriggerDirection,
    ) -> Self {
        Self::with_id(
            ActionId::new(),
            kind,
            unit_id,
            unit_type_id,
            position,
            triggers,
            direction,
        )
    }

    /// Build with a known id (server echo)
    pub fn with_id(
        action_id: ActionId,
        kind: ActionKind,
        unit_id: UnitId,
        unit_type_id: impl Into<UnitTypeId>,
        position: Position,
        triggers: (TriggerId, TriggerId),
        direction: TriggerDirection,
    ) -> Self {
        let (main_trigger, sub_trigger) = triggers;
        Self {
            action_id,
            kind,
            unit_id,
            unit_type_id: unit_type_id.into(),
            position,
            using_main_trigger_id: main_trigger,
            using_sub_trigger_id: sub_trigger,
            main_trigger_azimuth: direction.main,
            sub_trigger_azimuth: direction.sub,
        }
    }

    pub fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }

    pub fn unit_type_id(&self) -> &str {
        &self.unit_type_id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn main_trigger_id(&self) -> &str {
        &self.using_main_trigger_id
    }

    pub fn sub_trigger_id(&self) -> &str {
        &self.using_sub_trigger_id
    }

    pub fn direction(&self) -> TriggerDirection {
        TriggerDirection::new(self.main_trigger_azimuth, self.sub_trigger_azimuth)
    }
}
