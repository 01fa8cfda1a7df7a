//! Presentation callbacks
//!
//! Everything visual lives outside the core. The session reports what changed
//! through this trait; every method defaults to doing nothing.

use crate::composer::rejection::Rejection;
use crate::core::types::UnitId;
use crate::hex::azimuth::TriggerDirection;
use crate::hex::layout::PixelPosition;
use crate::turn::combat::Combat;
use crate::unit::state::CombatEffect;

pub trait PresentationHooks {
    /// A unit now stands at `pixel` (world coordinates of the cell center)
    fn on_unit_moved(&mut self, _unit_id: &UnitId, _pixel: PixelPosition) {}

    fn on_orientation_changed(&mut self, _unit_id: &UnitId, _direction: TriggerDirection) {}

    /// An attack is about to land
    fn on_attack(&mut self, _combat: &Combat) {}

    fn on_combat_resolved(&mut self, _combat: &Combat, _effect: CombatEffect) {}

    fn on_turn_replay_complete(&mut self, _next_turn_number: u32) {}

    /// Optional UI hint for refused input
    fn on_rejected(&mut self, _rejection: &Rejection) {}

    fn on_error(&mut self, _message: &str) {}
}

/// Hooks that ignore everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl PresentationHooks for NoopHooks {}

/// Everything the session reported, in order
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    UnitMoved(UnitId, PixelPosition),
    OrientationChanged(UnitId, TriggerDirection),
    Attack(UnitId, UnitId),
    CombatResolved(UnitId, CombatEffect),
    TurnReplayComplete(u32),
    Rejected(Rejection),
    Error(String),
}

/// Hooks that keep a log of calls
#[derive(Debug, Default, Clone)]
pub struct RecordingHooks {
    pub events: Vec<HookEvent>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<HookEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PresentationHooks for RecordingHooks {
    fn on_unit_moved(&mut self, unit_id: &UnitId, pixel: PixelPosition) {
        self.events.push(HookEvent::UnitMoved(unit_id.clone(), pixel));
    }

    fn on_orientation_changed(&mut self, unit_id: &UnitId, direction: TriggerDirection) {
        self.events
            .push(HookEvent::OrientationChanged(unit_id.clone(), direction));
    }

    fn on_attack(&mut self, combat: &Combat) {
        self.events.push(HookEvent::Attack(
            combat.attacking_unit_id.clone(),
            combat.defending_unit_id.clone(),
        ));
    }

    fn on_combat_resolved(&mut self, combat: &Combat, effect: CombatEffect) {
        self.events.push(HookEvent::CombatResolved(
            combat.defending_unit_id.clone(),
            effect,
        ));
    }

    fn on_turn_replay_complete(&mut self, next_turn_number: u32) {
        self.events
            .push(HookEvent::TurnReplayComplete(next_turn_number));
    }

    fn on_rejected(&mut self, rejection: &Rejection) {
        self.events.push(HookEvent::Rejected(rejection.clone()));
    }

    fn on_error(&mut self, message: &str) {
        self.events.push(HookEvent::Error(message.to_string()));
    }
}
