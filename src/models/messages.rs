use serde::{Deserialize, Serialize};

use crate::game::Scorekeeper;
use crate::models::{
    ActionKind, EliminationReason, GameMode, LogLine, MatchSnapshot, Phase, Piece, Seat, Standing,
    VictimKind,
};

/// Message sent from the renderer to the server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum ClientMessage {
    Configure {
        minutes: u64,
        #[serde(default)]
        increment_seconds: u64,
        #[serde(default)]
        mode: GameMode,
        #[serde(default)]
        names: Option<[String; 4]>,
    },
    StartMatch,
    TapPlayer {
        seat: Seat,
    },
    TogglePause,
    SelectTarget {
        seat: Seat,
    },
    /// A victim kind here starts victim selection instead of scoring.
    ScoreAction {
        kind: ActionKind,
        #[serde(default)]
        points: i64,
    },
    ScoreCapture {
        piece: Piece,
        #[serde(default)]
        points: Option<i64>,
    },
    ScoreVictimAction {
        kind: VictimKind,
        victim: Seat,
        points: i64,
    },
    BeginVictimSelection {
        kind: VictimKind,
        points: i64,
    },
    ResolveVictim {
        victim: Seat,
    },
    CancelVictimSelection,
    SetStatus {
        status: EliminationReason,
    },
    Undo,
    ResetClocks,
    ResetScores,
    FinishMatch,
    Sync,
}

impl ClientMessage {
    /// Commands after which no stale tick may touch the state.
    pub fn halts_clock(&self) -> bool {
        matches!(
            self,
            ClientMessage::StartMatch | ClientMessage::ResetClocks | ClientMessage::FinishMatch
        )
    }
}

/// Message sent from the server to the renderer
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerMessage {
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<MatchSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<Vec<LogLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standings: Option<Vec<Standing>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerMessage {
    /// Full state, with standings once the match is over.
    pub fn state(keeper: &Scorekeeper) -> Self {
        let finished = keeper.phase() == Phase::Finished;
        ServerMessage {
            message_type: if finished { "match_finished" } else { "state" }.to_string(),
            snapshot: Some(keeper.snapshot()),
            log: Some(keeper.log()),
            standings: finished.then(|| keeper.standings()),
            error: None,
        }
    }

    /// Clock-only update sent on every tick.
    pub fn tick(keeper: &Scorekeeper) -> Self {
        ServerMessage {
            message_type: "tick".to_string(),
            snapshot: Some(keeper.snapshot()),
            log: None,
            standings: None,
            error: None,
        }
    }

    pub fn error(error: impl ToString) -> Self {
        ServerMessage {
            message_type: "error".to_string(),
            snapshot: None,
            log: None,
            standings: None,
            error: Some(error.to_string()),
        }
    }
}
