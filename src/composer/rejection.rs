use thiserror::Error;

use crate::core::types::UnitId;
use crate::hex::coord::Position;

/// An input that was refused. No state changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("No own unit at {0}")]
    NothingToSelect(Position),

    #[error("Unit {0} has no action points left")]
    UnitExhausted(UnitId),

    #[error("Unit {0} has bailed out")]
    BailedOut(UnitId),

    #[error("Unit {0} is not in the roster")]
    UnknownUnit(UnitId),

    #[error("No unit selected")]
    NothingSelected,

    #[error("Cell {0} is out of reach")]
    Unreachable(Position),

    #[error("Cell {0} is occupied")]
    Occupied(Position),

    #[error("Finish orienting the current unit first")]
    OrientationPending,

    #[error("No orientation in progress")]
    NotOrienting,

    #[error("A turn replay is running")]
    ReplayInProgress,

    #[error("Turn already submitted, waiting for the server")]
    AwaitingResult,

    #[error("No match in progress")]
    NoMatch,
}
