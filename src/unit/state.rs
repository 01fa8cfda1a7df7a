//! Per-unit runtime state
//!
//! Player units are driven by the composer and by replay; opponent units only
//! by replay. Both sit behind [`UnitState`] so replay can treat them alike.

use crate::core::types::{TriggerId, UnitId, UnitTypeId, VisualHandle};
use crate::hex::azimuth::TriggerDirection;
use crate::hex::coord::{invert_position, Position};
use crate::hex::layout::GridConfig;
use crate::turn::action::Action;
use crate::turn::combat::Combat;
use crate::unit::snapshot::{EnemyUnitSnapshot, FriendUnitSnapshot};

/// What a combat did to its defender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEffect {
    Defeated,
    Avoided,
    RemainingHp(i32),
}

/// Capabilities shared by player and opponent units
pub trait UnitState {
    fn unit_id(&self) -> &UnitId;
    fn unit_type_id(&self) -> &str;
    fn position(&self) -> Position;
    fn direction(&self) -> TriggerDirection;
    /// Equipped (main, sub) trigger ids
    fn triggers(&self) -> (&str, &str);
    fn is_bailed_out(&self) -> bool;
    fn visual(&self) -> Option<VisualHandle>;
    fn set_visual(&mut self, handle: Option<VisualHandle>);

    /// Move and reorient according to a server-confirmed action
    fn apply_action(&mut self, action: &Action, grid: &GridConfig);

    /// Resolve a combat in which this unit defends
    fn apply_combat(&mut self, combat: &Combat) -> CombatEffect;
}

/// Fields common to both sides
#[derive(Debug, Clone)]
struct UnitCore {
    unit_id: UnitId,
    unit_type_id: UnitTypeId,
    position: Position,
    direction: TriggerDirection,
    main_trigger: TriggerId,
    sub_trigger: TriggerId,
    bailed_out: bool,
    visual: Option<VisualHandle>,
}

impl UnitCore {
    fn take_action(&mut self, action: &Action, position: Position) {
        self.position = position;
        self.direction = action.direction();
        self.main_trigger = action.main_trigger_id().to_string();
        self.sub_trigger = action.sub_trigger_id().to_string();
    }

    fn defend(&mut self, combat: &Combat) -> CombatEffect {
        if combat.is_defeated {
            self.bailed_out = true;
            return CombatEffect::Defeated;
        }
        if combat.is_avoided {
            return CombatEffect::Avoided;
        }
        match combat.remaining_hp() {
            Some(hp) => CombatEffect::RemainingHp(hp),
            None => {
                tracing::warn!(
                    unit = %self.unit_id,
                    main_hp = combat.main_trigger_hp,
                    sub_hp = combat.sub_trigger_hp,
                    "combat left no trigger HP but no defeat; treating as defeated"
                );
                self.bailed_out = true;
                CombatEffect::Defeated
            }
        }
    }
}

/// A unit controlled by the local player
#[derive(Debug, Clone)]
pub struct PlayerUnit {
    core: UnitCore,
    budget: u32,
    max_budget: u32,
    current_step: usize,
    main_trigger_hp: i32,
    sub_trigger_hp: i32,
    having_main_triggers: Vec<TriggerId>,
    having_sub_triggers: Vec<TriggerId>,
    sight_range: u32,
}

impl PlayerUnit {
    pub fn new(
        unit_id: UnitId,
        unit_type_id: impl Into<UnitTypeId>,
        position: Position,
        triggers: (TriggerId, TriggerId),
        budget: u32,
    ) -> Self {
        let (main_trigger, sub_trigger) = triggers;
        Self {
            core: UnitCore {
                unit_id,
                unit_type_id: unit_type_id.into(),
                position,
                direction: TriggerDirection::default(),
                main_trigger,
                sub_trigger,
                bailed_out: false,
                visual: None,
            },
            budget,
            max_budget: budget,
            current_step: 0,
            main_trigger_hp: 0,
            sub_trigger_hp: 0,
            having_main_triggers: Vec::new(),
            having_sub_triggers: Vec::new(),
            sight_range: 0,
        }
    }

    pub fn from_snapshot(snapshot: FriendUnitSnapshot, budget: u32) -> Self {
        let mut unit = Self::new(
            snapshot.unit_id,
            snapshot.unit_type_id,
            snapshot.position,
            (snapshot.using_main_trigger_id, snapshot.using_sub_trigger_id),
            budget,
        );
        unit.core.bailed_out = snapshot.is_bailout;
        unit.main_trigger_hp = snapshot.main_trigger_hp;
        unit.sub_trigger_hp = snapshot.sub_trigger_hp;
        unit.having_main_triggers = snapshot.having_main_trigger_ids;
        unit.having_sub_triggers = snapshot.having_sub_trigger_ids;
        unit.sight_range = snapshot.sight_range;
        unit
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn max_budget(&self) -> u32 {
        self.max_budget
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn trigger_hp(&self) -> (i32, i32) {
        (self.main_trigger_hp, self.sub_trigger_hp)
    }

    pub fn having_main_triggers(&self) -> &[TriggerId] {
        &self.having_main_triggers
    }

    pub fn having_sub_triggers(&self) -> &[TriggerId] {
        &self.having_sub_triggers
    }

    pub fn sight_range(&self) -> u32 {
        self.sight_range
    }

    /// Can this unit still be given orders this turn?
    pub fn can_act(&self) -> bool {
        self.budget > 0 && !self.core.bailed_out
    }

    /// Done for this turn: out of budget, or out of the game
    pub fn is_done(&self) -> bool {
        !self.can_act()
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.core.position = position;
    }

    pub(crate) fn set_direction(&mut self, direction: TriggerDirection) {
        self.core.direction = direction;
    }

    pub(crate) fn set_budget(&mut self, budget: u32) {
        self.budget = budget.min(self.max_budget);
    }

    /// Move the step counter forward after recording actions
    pub(crate) fn advance_step(&mut self, steps: usize) {
        self.current_step += steps;
    }

    /// Refill budget and rewind the step counter for a new turn
    pub fn reset_for_turn(&mut self, budget: u32) {
        self.max_budget = budget;
        self.budget = if self.core.bailed_out { 0 } else { budget };
        self.current_step = 0;
    }
}

impl UnitState for PlayerUnit {
    fn unit_id(&self) -> &UnitId {
        &self.core.unit_id
    }

    fn unit_type_id(&self) -> &str {
        &self.core.unit_type_id
    }

    fn position(&self) -> Position {
        self.core.position
    }

    fn direction(&self) -> TriggerDirection {
        self.core.direction
    }

    fn triggers(&self) -> (&str, &str) {
        (&self.core.main_trigger, &self.core.sub_trigger)
    }

    fn is_bailed_out(&self) -> bool {
        self.core.bailed_out
    }

    fn visual(&self) -> Option<VisualHandle> {
        self.core.visual
    }

    fn set_visual(&mut self, handle: Option<VisualHandle>) {
        self.core.visual = handle;
    }

    fn apply_action(&mut self, action: &Action, _grid: &GridConfig) {
        self.core.take_action(action, action.position());
    }

    fn apply_combat(&mut self, combat: &Combat) -> CombatEffect {
        let effect = self.core.defend(combat);
        if !combat.is_avoided {
            self.main_trigger_hp = combat.main_trigger_hp;
            self.sub_trigger_hp = combat.sub_trigger_hp;
        }
        if effect == CombatEffect::Defeated {
            self.budget = 0;
        }
        effect
    }
}

/// A unit controlled by the other player, seen mirrored through the board center
#[derive(Debug, Clone)]
pub struct OpponentUnit {
    core: UnitCore,
}

impl OpponentUnit {
    /// `position` is already in the local frame
    pub fn new(
        unit_id: UnitId,
        unit_type_id: impl Into<UnitTypeId>,
        position: Position,
        triggers: (TriggerId, TriggerId),
    ) -> Self {
        let (main_trigger, sub_trigger) = triggers;
        Self {
            core: UnitCore {
                unit_id,
                unit_type_id: unit_type_id.into(),
                position,
                direction: TriggerDirection::default(),
                main_trigger,
                sub_trigger,
                bailed_out: false,
                visual: None,
            },
        }
    }

    /// Build from the server's view, inverting the position into the local frame
    pub fn from_snapshot(snapshot: EnemyUnitSnapshot, grid: &GridConfig) -> Self {
        let mut unit = Self::new(
            snapshot.unit_id,
            snapshot.unit_type_id,
            invert_position(snapshot.position, grid),
            (snapshot.using_main_trigger_id, snapshot.using_sub_trigger_id),
        );
        unit.core.bailed_out = snapshot.is_bailout;
        unit
    }
}

impl UnitState for OpponentUnit {
    fn unit_id(&self) -> &UnitId {
        &self.core.unit_id
    }

    fn unit_type_id(&self) -> &str {
        &self.core.unit_type_id
    }

    fn position(&self) -> Position {
        self.core.position
    }

    fn direction(&self) -> TriggerDirection {
        self.core.direction
    }

    fn triggers(&self) -> (&str, &str) {
        (&self.core.main_trigger, &self.core.sub_trigger)
    }

    fn is_bailed_out(&self) -> bool {
        self.core.bailed_out
    }

    fn visual(&self) -> Option<VisualHandle> {
        self.core.visual
    }

    fn set_visual(&mut self, handle: Option<VisualHandle>) {
        self.core.visual = handle;
    }

    fn apply_action(&mut self, action: &Action, grid: &GridConfig) {
        self.core.take_action(action, invert_position(action.position(), grid));
    }

    fn apply_combat(&mut self, combat: &Combat) -> CombatEffect {
        self.core.defend(combat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CombatId;
    use crate::hex::azimuth::Azimuth;
    use crate::turn::action::ActionKind;

    fn action_to(col: i32, row: i32) -> Action {
        Action::new(
            ActionKind::Move,
            UnitId::new("u"),
            "KUGA_YUMA",
            Position::new(col, row),
            ("KOGETSU".into(), "BAGWORM".into()),
            TriggerDirection::new(Azimuth::new(90.0), Azimuth::new(180.0)),
        )
    }

    fn combat(defeated: bool, avoided: bool, main_hp: i32, sub_hp: i32) -> Combat {
        Combat {
            combat_id: CombatId("c".into()),
            attacking_unit_id: UnitId::new("a"),
            attacker_position: Position::new(0, 0),
            attacker_main_trigger_id: String::new(),
            attacker_sub_trigger_id: String::new(),
            attacker_main_trigger_azimuth: Azimuth::NORTH,
            attacker_sub_trigger_azimuth: Azimuth::NORTH,
            attacker_base_attack: 30,
            defending_unit_id: UnitId::new("u"),
            defender_position: Position::new(0, 1),
            defender_main_trigger_id: String::new(),
            defender_sub_trigger_id: String::new(),
            defender_main_trigger_azimuth: Azimuth::NORTH,
            defender_sub_trigger_azimuth: Azimuth::NORTH,
            main_trigger_hp: main_hp,
            sub_trigger_hp: sub_hp,
            defender_base_defense: 10,
            defender_base_avoid: 5,
            is_avoided: avoided,
            is_defeated: defeated,
        }
    }

    fn player() -> PlayerUnit {
        PlayerUnit::new(
            UnitId::new("u"),
            "KUGA_YUMA",
            Position::new(4, 34),
            ("RAYGUST".into(), "SHIELD".into()),
            2,
        )
    }

    #[test]
    fn test_player_apply_action() {
        let mut unit = player();
        unit.apply_action(&action_to(4, 33), &GridConfig::default());
        assert_eq!(unit.position(), Position::new(4, 33));
        assert_eq!(unit.direction().main.degrees(), 90.0);
        assert_eq!(unit.triggers(), ("KOGETSU", "BAGWORM"));
    }

    #[test]
    fn test_opponent_apply_action_inverts() {
        let grid = GridConfig::default();
        let mut unit = OpponentUnit::new(
            UnitId::new("u"),
            "UNKNOWN",
            Position::new(31, 1),
            (String::new(), String::new()),
        );
        unit.apply_action(&action_to(4, 33), &grid);
        assert_eq!(unit.position(), Position::new(31, 2));
    }

    #[test]
    fn test_opponent_snapshot_inverts() {
        let grid = GridConfig::default();
        let unit = OpponentUnit::from_snapshot(
            EnemyUnitSnapshot {
                unit_id: UnitId::new("e"),
                unit_type_id: "UNKNOWN".into(),
                position: Position::new(4, 34),
                using_main_trigger_id: String::new(),
                using_sub_trigger_id: String::new(),
                is_bailout: false,
            },
            &grid,
        );
        assert_eq!(unit.position(), Position::new(31, 1));
    }

    #[test]
    fn test_defeat_bails_out() {
        let mut unit = player();
        assert_eq!(unit.apply_combat(&combat(true, false, 0, 0)), CombatEffect::Defeated);
        assert!(unit.is_bailed_out());
        assert!(unit.is_done());
    }

    #[test]
    fn test_avoided() {
        let mut unit = player();
        assert_eq!(unit.apply_combat(&combat(false, true, 0, 0)), CombatEffect::Avoided);
        assert!(!unit.is_bailed_out());
    }

    #[test]
    fn test_remaining_hp() {
        let mut unit = player();
        let effect = unit.apply_combat(&combat(false, false, 40, 12));
        assert_eq!(effect, CombatEffect::RemainingHp(12));
        assert_eq!(unit.trigger_hp(), (40, 12));
    }

    #[test]
    fn test_degenerate_combat_is_defeat() {
        let mut unit = player();
        assert_eq!(unit.apply_combat(&combat(false, false, 0, -3)), CombatEffect::Defeated);
        assert!(unit.is_bailed_out());
    }

    #[test]
    fn test_reset_for_turn() {
        let mut unit = player();
        unit.set_budget(0);
        unit.advance_step(2);
        unit.reset_for_turn(2);
        assert_eq!(unit.budget(), 2);
        assert_eq!(unit.current_step(), 0);
    }

    #[test]
    fn test_bailed_out_unit_gets_no_budget() {
        let mut unit = player();
        unit.apply_combat(&combat(true, false, 0, 0));
        unit.reset_for_turn(2);
        assert_eq!(unit.budget(), 0);
        assert!(!unit.can_act());
    }
}
