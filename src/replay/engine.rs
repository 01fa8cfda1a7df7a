//! Step-by-step playback of a server-confirmed turn
//!
//! The engine never sleeps. After each non-final step it hands back a
//! [`Continuation`]; the owner waits `delay` and calls [`ReplayEngine::resume`]
//! with the token. A token that does not match the pending one is ignored.

use std::time::Duration;

use crate::core::config::ReplayConfig;
use crate::hex::layout::{position_to_pixel, GridConfig};
use crate::session::hooks::PresentationHooks;
use crate::turn::draft::Turn;
use crate::turn::step::Step;
use crate::unit::roster::UnitRoster;

/// A request to be woken after `delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    pub token: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayProgress {
    /// More steps remain
    Continue(Continuation),
    /// The last step has been applied
    Completed { next_turn_number: u32 },
    /// Nothing happened (no replay running, or a stale token)
    Idle,
}

/// Counts from one applied step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub actions_applied: usize,
    pub combats_resolved: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
struct ActiveReplay {
    turn: Turn,
    next_step: usize,
    pending_token: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ReplayEngine {
    active: Option<ActiveReplay>,
    next_token: u64,
    step_delay: Duration,
    grid: GridConfig,
}

impl ReplayEngine {
    pub fn new(grid: GridConfig, config: ReplayConfig) -> Self {
        Self {
            active: None,
            next_token: 1,
            step_delay: config.step_delay(),
            grid,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn turn_number(&self) -> Option<u32> {
        self.active.as_ref().map(|a| a.turn.turn_number)
    }

    pub fn pending_token(&self) -> Option<u64> {
        self.active.as_ref().and_then(|a| a.pending_token)
    }

    /// Begin a replay. The first step is applied immediately.
    pub fn start(
        &mut self,
        turn: Turn,
        roster: &mut UnitRoster,
        hooks: &mut dyn PresentationHooks,
    ) -> ReplayProgress {
        if self.active.is_some() {
            tracing::warn!("replay started while another was running; dropping the old one");
        }

        let turn_number = turn.turn_number;
        if turn.is_empty() {
            self.active = None;
            tracing::info!(turn = turn_number, "empty turn, nothing to replay");
            return ReplayProgress::Completed {
                next_turn_number: turn_number.saturating_add(1),
            };
        }

        tracing::info!(turn = turn_number, steps = turn.steps.len(), "replay started");
        self.active = Some(ActiveReplay {
            turn,
            next_step: 0,
            pending_token: None,
        });
        self.advance(roster, hooks)
    }

    /// Apply the next step if `token` is the one we are waiting on
    pub fn resume(
        &mut self,
        token: u64,
        roster: &mut UnitRoster,
        hooks: &mut dyn PresentationHooks,
    ) -> ReplayProgress {
        match self.pending_token() {
            Some(pending) if pending == token => self.advance(roster, hooks),
            pending => {
                tracing::debug!(token, ?pending, "ignoring stale continuation");
                ReplayProgress::Idle
            }
        }
    }

    /// Abandon the running replay without applying further steps
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::info!(
                turn = active.turn.turn_number,
                applied = active.next_step,
                "replay cancelled"
            );
        }
    }

    fn advance(
        &mut self,
        roster: &mut UnitRoster,
        hooks: &mut dyn PresentationHooks,
    ) -> ReplayProgress {
        let grid = self.grid;
        let Some(active) = self.active.as_mut() else {
            return ReplayProgress::Idle;
        };

        let index = active.next_step;
        if let Some(step) = active.turn.steps.get(index) {
            let report = apply_step(step, roster, hooks, &grid);
            tracing::debug!(
                turn = active.turn.turn_number,
                step = index,
                actions = report.actions_applied,
                combats = report.combats_resolved,
                skipped = report.skipped,
                "step applied"
            );
        }
        active.next_step += 1;

        if active.next_step >= active.turn.steps.len() {
            let next_turn_number = active.turn.turn_number.saturating_add(1);
            self.active = None;
            tracing::info!(next_turn = next_turn_number, "replay complete");
            return ReplayProgress::Completed { next_turn_number };
        }

        let token = self.next_token;
        self.next_token += 1;
        active.pending_token = Some(token);
        ReplayProgress::Continue(Continuation {
            token,
            delay: self.step_delay,
        })
    }
}

/// Apply every action, then every combat, of one step
pub fn apply_step(
    step: &Step,
    roster: &mut UnitRoster,
    hooks: &mut dyn PresentationHooks,
    grid: &GridConfig,
) -> StepReport {
    let mut report = StepReport::default();

    for action in &step.actions {
        let Some(unit) = roster.get_mut(action.unit_id()) else {
            tracing::warn!(unit = %action.unit_id(), "action for unknown unit skipped");
            report.skipped += 1;
            continue;
        };
        unit.apply_action(action, grid);
        let pixel = position_to_pixel(unit.position(), grid);
        let direction = unit.direction();
        hooks.on_unit_moved(action.unit_id(), pixel);
        hooks.on_orientation_changed(action.unit_id(), direction);
        report.actions_applied += 1;
    }

    for combat in &step.combats {
        if roster.get(&combat.attacking_unit_id).is_none() {
            tracing::warn!(
                attacker = %combat.attacking_unit_id,
                "combat with unknown attacker skipped"
            );
            report.skipped += 1;
            continue;
        }
        let Some(defender) = roster.get_mut(&combat.defending_unit_id) else {
            tracing::warn!(
                defender = %combat.defending_unit_id,
                "combat with unknown defender skipped"
            );
            report.skipped += 1;
            continue;
        };

        hooks.on_attack(combat);
        let effect = defender.apply_combat(combat);
        hooks.on_combat_resolved(combat, effect);
        report.combats_resolved += 1;
    }

    report
}
