//! One simultaneous tick of unit actions

use serde::{Deserialize, Serialize};

use crate::core::types::StepId;
use crate::turn::action::Action;
use crate::turn::combat::Combat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_id: StepId,
    pub actions: Vec<Action>,
    /// Filled in by the server; always empty on submission
    #[serde(default)]
    pub combats: Vec<Combat>,
}

impl Step {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.combats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_step_is_empty() {
        let step = Step::new();
        assert!(step.is_empty());
        let value = serde_json::to_value(&step).unwrap();
        assert!(value["stepId"].is_string());
        assert_eq!(value["actions"], serde_json::json!([]));
        assert_eq!(value["combats"], serde_json::json!([]));
    }
}
