use serde::{Deserialize, Serialize};

use crate::models::{GameMode, Phase, Seat, VictimKind};

/// A victim action waiting for the operator to pick who was mated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingVictimAction {
    pub scorer: Seat,
    pub kind: VictimKind,
    pub points: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub seat: Seat,
    pub name: String,
    pub time_ms: u64,
    pub time_display: String,
    pub low_time: bool,
    pub score: i64,
    pub eliminated: bool,
    pub active: bool,
}

/// Everything the renderer needs to draw the table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub phase: Phase,
    pub mode: GameMode,
    pub mode_label: String,
    pub minutes: u64,
    pub increment_seconds: u64,
    pub active: Option<Seat>,
    pub players: Vec<PlayerView>,
    pub selected_target: Option<Seat>,
    pub pending: Option<PendingVictimAction>,
    pub can_undo: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub rank: usize,
    pub seat: Seat,
    pub name: String,
    pub score: i64,
    pub time_ms: u64,
    pub eliminated: bool,
}
