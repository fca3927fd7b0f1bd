use thiserror::Error;

use crate::models::Seat;

/// Errors surfaced to the client. Ignored transitions are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Please select a player first")]
    InvalidTarget,

    #[error("Invalid victim: {0} cannot be the victim of their own action")]
    InvalidVictim(Seat),

    #[error("No victim selection is pending")]
    NoPendingAction,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Points must be between -{max} and {max}, got {points}")]
    InvalidPoints { points: i64, max: i64 },
}

pub type ClockResult<T> = Result<T, ClockError>;
