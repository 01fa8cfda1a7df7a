//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-assigned unit identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Player identifier issued at matchmaking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Game (match) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Server-assigned combat identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatId(pub String);

/// Action identifier. Generated locally as a UUID v4; ids echoed back by the
/// server are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Step identifier, generated the same way as [`ActionId`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub String);

impl StepId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to a presentation object (sprite, label) owned outside the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Unit type tag (e.g. `KUGA_YUMA`)
pub type UnitTypeId = String;

/// Trigger tag (e.g. `KOGETSU`)
pub type TriggerId = String;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_equality() {
        assert_eq!(UnitId::new("u-1"), UnitId::new("u-1"));
        assert_ne!(UnitId::new("u-1"), UnitId::new("u-2"));
    }

    #[test]
    fn test_action_ids_are_unique() {
        assert_ne!(ActionId::new(), ActionId::new());
    }

    #[test]
    fn test_unit_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UnitId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
