//! Wire messages exchanged with the game server
//!
//! Every frame is a JSON object tagged by its `action` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::{GameId, PlayerId};
use crate::turn::step::Step;
use crate::turn::wire::ProtocolError;
use crate::unit::snapshot::{EnemyUnitSnapshot, FriendUnitSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action")]
pub enum OutboundMessage {
    /// Submit the composed turn
    #[serde(rename = "turnExecution", rename_all = "camelCase")]
    SubmitTurn {
        player_id: PlayerId,
        game_id: GameId,
        turn_number: u32,
        steps: Vec<Step>,
    },

    #[serde(rename = "cancelMatching", rename_all = "camelCase")]
    CancelMatch { player_id: PlayerId },

    /// Ask for a full unit list to resync from
    #[serde(rename = "getGameState", rename_all = "camelCase")]
    RequestState { player_id: PlayerId, game_id: GameId },
}

impl OutboundMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum InboundMessage {
    /// The server's resolution of a turn. `result` is parsed lazily so that
    /// bad entries inside it can be skipped one by one.
    #[serde(rename = "turnExecutionResult", rename_all = "camelCase")]
    TurnResult { turn_number: u32, result: Value },

    #[serde(rename = "cancelMatchingResult", rename_all = "camelCase")]
    MatchCancelled {
        #[serde(default)]
        player_id: Option<PlayerId>,
    },

    #[serde(rename = "getGameStateResult", rename_all = "camelCase")]
    GameState {
        #[serde(default)]
        turn_number: Option<u32>,
        friend_units: Vec<FriendUnitSnapshot>,
        enemy_units: Vec<EnemyUnitSnapshot>,
    },

    #[serde(rename = "error")]
    Error { message: String },
}

impl InboundMessage {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}
