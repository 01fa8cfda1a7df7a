//! Interactive turn building
//!
//! One unit at a time goes through select → move (or stay) → orient main →
//! orient sub. Committing the sub orientation records the unit's actions into
//! the shared draft. When the last player unit runs out of budget the draft is
//! frozen and handed back for submission.

use crate::composer::rejection::Rejection;
use crate::core::types::UnitId;
use crate::hex::azimuth::{Azimuth, TriggerDirection};
use crate::hex::coord::{adjacent_cells, find_path, Position, ReachableCell};
use crate::hex::layout::{
    pointer_azimuth, position_to_pixel, GridConfig, PixelPosition, ViewTransform,
};
use crate::turn::action::{Action, ActionKind};
use crate::turn::draft::TurnDraft;
use crate::turn::step::Step;
use crate::unit::roster::UnitRoster;
use crate::unit::state::{PlayerUnit, UnitState};

/// An order under construction for one unit
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOrder {
    pub unit_id: UnitId,
    /// Position before the move, for path reconstruction
    pub before: Position,
    /// Budget before the move, for rollback
    pub budget_before: u32,
    /// Facing before the order, for rollback
    pub direction_before: TriggerDirection,
    /// Reorienting without moving
    pub in_place: bool,
    pub direction: TriggerDirection,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ComposerPhase {
    #[default]
    Idle,
    Selected(UnitId),
    OrientingMain(PendingOrder),
    OrientingSub(PendingOrder),
}

/// Per-unit view of the composer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitPhase {
    Idle,
    Selected,
    OrientingMain,
    OrientingSub,
    /// Out of budget (or bailed out) until the next turn
    Completed,
}

/// What an accepted input did
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerOutcome {
    Selected(UnitId),
    Deselected,
    /// A half-finished order was undone; the unit is back where it started
    RolledBack {
        unit_id: UnitId,
        position: Position,
        direction: TriggerDirection,
    },
    Moved {
        unit_id: UnitId,
        from: Position,
        to: Position,
        remaining_budget: u32,
    },
    OrientationStarted(UnitId),
    OrientationChanged {
        unit_id: UnitId,
        direction: TriggerDirection,
    },
    MainCommitted(UnitId),
    UnitCommitted {
        unit_id: UnitId,
        actions: usize,
        remaining_budget: u32,
    },
    /// Every player unit is done; submit these steps
    TurnReady(Vec<Step>),
}

#[derive(Debug, Clone, Default)]
pub struct TurnComposer {
    phase: ComposerPhase,
    draft: TurnDraft,
    grid: GridConfig,
}

fn reject<T>(rejection: Rejection) -> Result<T, Rejection> {
    tracing::debug!(%rejection, "input rejected");
    Err(rejection)
}

impl TurnComposer {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            phase: ComposerPhase::Idle,
            draft: TurnDraft::new(),
            grid,
        }
    }

    pub fn phase(&self) -> &ComposerPhase {
        &self.phase
    }

    pub fn draft(&self) -> &TurnDraft {
        &self.draft
    }

    pub fn selected(&self) -> Option<&UnitId> {
        match &self.phase {
            ComposerPhase::Idle => None,
            ComposerPhase::Selected(id) => Some(id),
            ComposerPhase::OrientingMain(order) | ComposerPhase::OrientingSub(order) => {
                Some(&order.unit_id)
            }
        }
    }

    pub fn is_orienting(&self) -> bool {
        matches!(
            self.phase,
            ComposerPhase::OrientingMain(_) | ComposerPhase::OrientingSub(_)
        )
    }

    pub fn unit_phase(&self, roster: &UnitRoster, id: &UnitId) -> Option<UnitPhase> {
        let unit = roster.player(id)?;
        let phase = match &self.phase {
            ComposerPhase::Selected(sel) if sel == id => UnitPhase::Selected,
            ComposerPhase::OrientingMain(order) if &order.unit_id == id => {
                UnitPhase::OrientingMain
            }
            ComposerPhase::OrientingSub(order) if &order.unit_id == id => UnitPhase::OrientingSub,
            _ if unit.is_done() => UnitPhase::Completed,
            _ => UnitPhase::Idle,
        };
        Some(phase)
    }

    /// Any live unit on the cell
    pub fn unit_at<'a>(
        &self,
        roster: &'a UnitRoster,
        cell: Position,
    ) -> Option<&'a dyn UnitState> {
        roster.unit_at(cell)
    }

    /// Cells the selected unit may move to right now
    pub fn reachable_cells(&self, roster: &UnitRoster) -> Vec<ReachableCell> {
        let Some(unit) = self.selected_player(roster) else {
            return Vec::new();
        };
        adjacent_cells(unit.position(), unit.budget(), &self.grid)
            .into_iter()
            .filter(|cell| !roster.is_occupied(cell.position))
            .collect()
    }

    fn selected_player<'a>(&self, roster: &'a UnitRoster) -> Option<&'a PlayerUnit> {
        match &self.phase {
            ComposerPhase::Selected(id) => roster.player(id),
            _ => None,
        }
    }

    pub fn select(
        &mut self,
        roster: &UnitRoster,
        id: &UnitId,
    ) -> Result<ComposerOutcome, Rejection> {
        if self.is_orienting() {
            return reject(Rejection::OrientationPending);
        }
        let Some(unit) = roster.player(id) else {
            return reject(Rejection::UnknownUnit(id.clone()));
        };
        if unit.is_bailed_out() {
            return reject(Rejection::BailedOut(id.clone()));
        }
        if unit.budget() == 0 {
            return reject(Rejection::UnitExhausted(id.clone()));
        }

        self.phase = ComposerPhase::Selected(id.clone());
        tracing::debug!(unit = %id, budget = unit.budget(), "unit selected");
        Ok(ComposerOutcome::Selected(id.clone()))
    }

    /// Drop the selection. A half-finished order is rolled back.
    pub fn deselect(&mut self, roster: &mut UnitRoster) -> ComposerOutcome {
        match std::mem::take(&mut self.phase) {
            ComposerPhase::OrientingMain(order) | ComposerPhase::OrientingSub(order) => {
                if let Some(unit) = roster.player_mut(&order.unit_id) {
                    unit.set_position(order.before);
                    unit.set_budget(order.budget_before);
                    unit.set_direction(order.direction_before);
                }
                tracing::debug!(unit = %order.unit_id, "pending order rolled back");
                ComposerOutcome::RolledBack {
                    unit_id: order.unit_id,
                    position: order.before,
                    direction: order.direction_before,
                }
            }
            ComposerPhase::Selected(_) | ComposerPhase::Idle => ComposerOutcome::Deselected,
        }
    }

    pub fn attempt_move(
        &mut self,
        roster: &mut UnitRoster,
        target: Position,
    ) -> Result<ComposerOutcome, Rejection> {
        let ComposerPhase::Selected(id) = &self.phase else {
            return reject(if self.is_orienting() {
                Rejection::OrientationPending
            } else {
                Rejection::NothingSelected
            });
        };
        let id = id.clone();
        let Some(unit) = roster.player(&id) else {
            return reject(Rejection::UnknownUnit(id));
        };

        let before = unit.position();
        let budget_before = unit.budget();
        let Some(cell) = adjacent_cells(before, budget_before, &self.grid)
            .into_iter()
            .find(|cell| cell.position == target)
        else {
            return reject(Rejection::Unreachable(target));
        };
        if roster.is_occupied(target) {
            return reject(Rejection::Occupied(target));
        }
        let direction = unit.direction();

        let Some(unit) = roster.player_mut(&id) else {
            return reject(Rejection::UnknownUnit(id));
        };
        unit.set_position(target);
        unit.set_budget(cell.remaining_budget);

        self.phase = ComposerPhase::OrientingMain(PendingOrder {
            unit_id: id.clone(),
            before,
            budget_before,
            direction_before: direction,
            in_place: false,
            direction,
        });
        tracing::debug!(unit = %id, %before, to = %target, "unit moved");
        Ok(ComposerOutcome::Moved {
            unit_id: id,
            from: before,
            to: target,
            remaining_budget: cell.remaining_budget,
        })
    }

    /// Start orienting the selected unit where it stands; costs one point
    pub fn reorient_in_place(
        &mut self,
        roster: &mut UnitRoster,
    ) -> Result<ComposerOutcome, Rejection> {
        let ComposerPhase::Selected(id) = &self.phase else {
            return reject(if self.is_orienting() {
                Rejection::OrientationPending
            } else {
                Rejection::NothingSelected
            });
        };
        let id = id.clone();
        let Some(unit) = roster.player_mut(&id) else {
            return reject(Rejection::UnknownUnit(id));
        };
        if unit.budget() == 0 {
            return reject(Rejection::UnitExhausted(id));
        }

        let before = unit.position();
        let budget_before = unit.budget();
        unit.set_budget(budget_before - 1);
        self.phase = ComposerPhase::OrientingMain(PendingOrder {
            unit_id: id.clone(),
            before,
            budget_before,
            direction_before: unit.direction(),
            in_place: true,
            direction: unit.direction(),
        });
        Ok(ComposerOutcome::OrientationStarted(id))
    }

    /// Aim the trigger currently being oriented
    pub fn update_drag(
        &mut self,
        roster: &mut UnitRoster,
        azimuth: Azimuth,
    ) -> Result<ComposerOutcome, Rejection> {
        let order = match &mut self.phase {
            ComposerPhase::OrientingMain(order) => {
                order.direction.main = azimuth;
                order
            }
            ComposerPhase::OrientingSub(order) => {
                order.direction.sub = azimuth;
                order
            }
            _ => return reject(Rejection::NotOrienting),
        };
        if let Some(unit) = roster.player_mut(&order.unit_id) {
            unit.set_direction(order.direction);
        }
        Ok(ComposerOutcome::OrientationChanged {
            unit_id: order.unit_id.clone(),
            direction: order.direction,
        })
    }

    /// Aim toward a pointer given in screen pixels
    pub fn pointer_drag_to(
        &mut self,
        roster: &mut UnitRoster,
        pointer: PixelPosition,
        view: &ViewTransform,
    ) -> Result<ComposerOutcome, Rejection> {
        let unit_id = match &self.phase {
            ComposerPhase::OrientingMain(order) | ComposerPhase::OrientingSub(order) => {
                order.unit_id.clone()
            }
            _ => return reject(Rejection::NotOrienting),
        };
        let Some(unit) = roster.player(&unit_id) else {
            return reject(Rejection::UnknownUnit(unit_id));
        };
        let center = position_to_pixel(unit.position(), &self.grid);
        let azimuth = pointer_azimuth(center, view.screen_to_world(pointer));
        self.update_drag(roster, azimuth)
    }

    /// Lock in the trigger being oriented. After the sub trigger, the unit's
    /// actions are recorded.
    pub fn commit_orientation(
        &mut self,
        roster: &mut UnitRoster,
    ) -> Result<ComposerOutcome, Rejection> {
        match std::mem::take(&mut self.phase) {
            ComposerPhase::OrientingMain(order) => {
                let unit_id = order.unit_id.clone();
                self.phase = ComposerPhase::OrientingSub(order);
                Ok(ComposerOutcome::MainCommitted(unit_id))
            }
            ComposerPhase::OrientingSub(order) => self.record_order(roster, order),
            other => {
                self.phase = other;
                reject(Rejection::NotOrienting)
            }
        }
    }

    fn record_order(
        &mut self,
        roster: &mut UnitRoster,
        order: PendingOrder,
    ) -> Result<ComposerOutcome, Rejection> {
        let grid = self.grid;
        let Some(unit) = roster.player_mut(&order.unit_id) else {
            return reject(Rejection::UnknownUnit(order.unit_id));
        };

        let (kind, cells) = if order.in_place {
            (ActionKind::Wait, vec![unit.position()])
        } else {
            (ActionKind::Move, find_path(order.before, unit.position(), &grid))
        };

        let (main_trigger, sub_trigger) = unit.triggers();
        let triggers = (main_trigger.to_string(), sub_trigger.to_string());
        let first_step = unit.current_step();
        for (offset, cell) in cells.iter().enumerate() {
            let action = Action::new(
                kind,
                unit.unit_id().clone(),
                unit.unit_type_id(),
                *cell,
                triggers.clone(),
                order.direction,
            );
            self.draft.add_action_with_index(first_step + offset, action);
        }
        unit.set_direction(order.direction);
        unit.advance_step(cells.len());
        let remaining_budget = unit.budget();

        tracing::debug!(
            unit = %order.unit_id,
            actions = cells.len(),
            remaining_budget,
            "order recorded"
        );

        if roster.all_players_done() {
            let steps = self.draft.freeze();
            tracing::info!(steps = steps.len(), "turn ready for submission");
            return Ok(ComposerOutcome::TurnReady(steps));
        }

        Ok(ComposerOutcome::UnitCommitted {
            unit_id: order.unit_id,
            actions: cells.len(),
            remaining_budget,
        })
    }

    /// Tap semantics: own unit selects, the selected unit reorients in place,
    /// a reachable empty cell moves there, anything else clears the selection.
    pub fn pointer_select(
        &mut self,
        roster: &mut UnitRoster,
        cell: Position,
    ) -> Result<ComposerOutcome, Rejection> {
        if self.is_orienting() {
            return reject(Rejection::OrientationPending);
        }

        let tapped = roster.player_at(cell).map(|u| u.unit_id().clone());
        let selected = match &self.phase {
            ComposerPhase::Selected(id) => Some(id.clone()),
            _ => None,
        };

        match (selected, tapped) {
            (Some(selected), Some(tapped)) if selected == tapped => self.reorient_in_place(roster),
            (Some(_), Some(tapped)) => self.select(roster, &tapped),
            (Some(_), None) => {
                let reachable = self
                    .reachable_cells(roster)
                    .iter()
                    .any(|c| c.position == cell);
                if reachable {
                    self.attempt_move(roster, cell)
                } else {
                    Ok(self.deselect(roster))
                }
            }
            (None, Some(tapped)) => self.select(roster, &tapped),
            (None, None) => reject(Rejection::NothingToSelect(cell)),
        }
    }

    /// Forget the selection and any recorded actions
    pub fn clear(&mut self) {
        self.phase = ComposerPhase::Idle;
        self.draft.clear();
    }
}
