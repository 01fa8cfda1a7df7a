//! Turns: drafted locally, or received fully formed from the server

use serde::{Deserialize, Serialize};

use crate::turn::action::Action;
use crate::turn::step::Step;

/// Server-side turn lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnStatus {
    #[default]
    StepSetting,
    UnitStepping,
    Completed,
}

/// A server-confirmed turn, ready for replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub turn_number: u32,
    #[serde(rename = "turnStatus")]
    pub status: TurnStatus,
    pub steps: Vec<Step>,
}

impl Turn {
    pub fn new(turn_number: u32, steps: Vec<Step>) -> Self {
        Self {
            turn_number,
            status: TurnStatus::Completed,
            steps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(Step::is_empty)
    }
}

/// Steps being composed from player input.
///
/// Each unit keeps its own step counter; the counter value is the index into
/// this shared list, so the n-th action of every unit lands in the same step.
#[derive(Debug, Clone, Default)]
pub struct TurnDraft {
    steps: Vec<Step>,
}

impl TurnDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to step `index`, padding with empty steps if it does not exist yet
    pub fn add_action_with_index(&mut self, index: usize, action: Action) {
        while self.steps.len() <= index {
            self.steps.push(Step::new());
        }
        self.steps[index].add_action(action);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn action_count(&self) -> usize {
        self.steps.iter().map(|s| s.actions.len()).sum()
    }

    /// Take the steps for submission, leaving the draft empty
    pub fn freeze(&mut self) -> Vec<Step> {
        std::mem::take(&mut self.steps)
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitId;
    use crate::hex::azimuth::TriggerDirection;
    use crate::hex::coord::Position;
    use crate::turn::action::ActionKind;

    fn action(unit: &str, col: i32) -> Action {
        Action::new(
            ActionKind::Move,
            UnitId::new(unit),
            "MIKUMO_OSAMU",
            Position::new(col, 0),
            ("RAYGUST".into(), "SHIELD".into()),
            TriggerDirection::default(),
        )
    }

    #[test]
    fn test_ascending_indices() {
        let mut draft = TurnDraft::new();
        for i in 0..4 {
            draft.add_action_with_index(i, action("u1", i as i32));
        }
        assert_eq!(draft.len(), 4);
        for (i, step) in draft.steps().iter().enumerate() {
            assert_eq!(step.actions.len(), 1);
            assert_eq!(step.actions[0].position().col, i as i32);
        }
    }

    #[test]
    fn test_gap_is_padded() {
        let mut draft = TurnDraft::new();
        draft.add_action_with_index(2, action("u1", 0));
        assert_eq!(draft.len(), 3);
        assert!(draft.steps()[0].actions.is_empty());
        assert!(draft.steps()[1].actions.is_empty());
        assert_eq!(draft.steps()[2].actions.len(), 1);
    }

    #[test]
    fn test_shared_step_keeps_insertion_order() {
        let mut draft = TurnDraft::new();
        draft.add_action_with_index(0, action("u1", 1));
        draft.add_action_with_index(0, action("u2", 2));
        draft.add_action_with_index(1, action("u1", 3));
        assert_eq!(draft.len(), 2);
        let first: Vec<_> = draft.steps()[0]
            .actions
            .iter()
            .map(|a| a.unit_id().as_str().to_string())
            .collect();
        assert_eq!(first, vec!["u1", "u2"]);
        assert_eq!(draft.action_count(), 3);
    }

    #[test]
    fn test_freeze_clears() {
        let mut draft = TurnDraft::new();
        draft.add_action_with_index(0, action("u1", 0));
        let steps = draft.freeze();
        assert_eq!(steps.len(), 1);
        assert!(draft.is_empty());
    }

    #[test]
    fn test_empty_turn() {
        let turn = Turn::new(3, vec![Step::new(), Step::new()]);
        assert!(turn.is_empty());
        assert!(Turn::new(3, Vec::new()).is_empty());
    }
}
