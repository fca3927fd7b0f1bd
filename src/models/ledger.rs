use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Phase, Seat};

/// Fixed bonus for each player credited by a stalemate somebody else caused.
pub const STALEMATE_BONUS: i64 = 10;

/// Largest magnitude a single scoring action may carry.
pub const MAX_POINTS: i64 = 1_000;

/// Free-form scoring events credited to a single player.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreKind {
    Check,
    Checkmate,
    Stalemate,
    /// Bonus to every player still in the game; the point value is fixed.
    StalemateOther,
    /// Manual correction, usually negative.
    Adjustment,
}

/// Events that score for one player and knock out another.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimKind {
    #[serde(rename = "checkmate-victim", alias = "checkmate")]
    Checkmate,
    #[serde(rename = "stalemate-other-victim", alias = "stalemate-other")]
    StalemateOther,
}

/// What a score button sends. Victim kinds still need their victim picked.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum ActionKind {
    Score(ScoreKind),
    Victim(VictimKind),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    PromotedQueen,
}

impl Piece {
    /// Free-for-all capture value.
    pub fn default_points(self) -> i64 {
        match self {
            Piece::Pawn => 1,
            Piece::Knight => 3,
            Piece::Bishop => 5,
            Piece::Rook => 5,
            Piece::Queen => 9,
            Piece::PromotedQueen => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Piece::Pawn => "pawn",
            Piece::Knight => "knight",
            Piece::Bishop => "bishop",
            Piece::Rook => "rook",
            Piece::Queen => "queen",
            Piece::PromotedQueen => "promoted queen",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EliminationReason {
    Timeout,
    #[serde(alias = "eliminate")]
    Resigned,
    Checkmated,
    Stalemated,
}

impl EliminationReason {
    pub fn label(self) -> &'static str {
        match self {
            EliminationReason::Timeout => "timeout",
            EliminationReason::Resigned => "resigned",
            EliminationReason::Checkmated => "checkmated",
            EliminationReason::Stalemated => "stalemated",
        }
    }
}

/// Everything needed to take an elimination back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EliminationRecord {
    pub seat: Seat,
    pub reason: EliminationReason,
    pub previous_active: Option<Seat>,
    pub previous_phase: Phase,
    /// Who the turn passed to, if the eliminated seat was on move.
    pub advanced_to: Option<Seat>,
    pub finished_match: bool,
    /// Clock session the elimination happened in; see `MatchState::clock_epoch`.
    pub clock_epoch: u64,
    pub turn_before: u64,
    pub turn_after: u64,
}

/// A fixed bonus credited to an explicit list of seats.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BonusGrant {
    pub recipients: Vec<Seat>,
    pub points: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    Score {
        score_kind: ScoreKind,
        seat: Seat,
        points: i64,
    },
    Capture {
        seat: Seat,
        piece: Piece,
        points: i64,
    },
    /// Stalemate caused by another player with no victim: one entry for the whole table.
    StalemateAll {
        declared_by: Seat,
        bonus: BonusGrant,
    },
    Victim {
        victim_kind: VictimKind,
        scorer: Seat,
        victim: Seat,
        points: i64,
        bonus: Option<BonusGrant>,
        /// `None` when the victim was already out, e.g. checkmating a timed-out king.
        elimination: Option<EliminationRecord>,
    },
    Elimination(EliminationRecord),
}

impl LedgerEvent {
    /// The seat the log line is attributed to.
    pub fn seat(&self) -> Seat {
        match self {
            LedgerEvent::Score { seat, .. } => *seat,
            LedgerEvent::Capture { seat, .. } => *seat,
            LedgerEvent::StalemateAll { declared_by, .. } => *declared_by,
            LedgerEvent::Victim { scorer, .. } => *scorer,
            LedgerEvent::Elimination(record) => record.seat,
        }
    }

    /// Net change to the sum of all scores.
    pub fn points(&self) -> Option<i64> {
        match self {
            LedgerEvent::Score { points, .. } | LedgerEvent::Capture { points, .. } => Some(*points),
            LedgerEvent::StalemateAll { bonus, .. } => {
                Some(bonus.points * bonus.recipients.len() as i64)
            }
            LedgerEvent::Victim { points, bonus, .. } => Some(
                points
                    + bonus
                        .as_ref()
                        .map(|b| b.points * b.recipients.len() as i64)
                        .unwrap_or(0),
            ),
            LedgerEvent::Elimination(_) => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LedgerEvent::Score { score_kind, .. } => match score_kind {
                ScoreKind::Check => "Check".to_string(),
                ScoreKind::Checkmate => "Checkmate".to_string(),
                ScoreKind::Stalemate => "Stalemate".to_string(),
                ScoreKind::StalemateOther => "Stalemate by other".to_string(),
                ScoreKind::Adjustment => "Adjustment".to_string(),
            },
            LedgerEvent::Capture { piece, .. } => format!("Captured {}", piece.label()),
            LedgerEvent::StalemateAll { bonus, .. } => {
                format!("Stalemate by other (+{} each)", bonus.points)
            }
            LedgerEvent::Victim { victim_kind, victim, .. } => match victim_kind {
                VictimKind::Checkmate => format!("Checkmated {}", victim),
                VictimKind::StalemateOther => format!("Stalemated {}", victim),
            },
            LedgerEvent::Elimination(record) => format!("Eliminated ({})", record.reason.label()),
        }
    }
}

/// One reversible record in the score ledger
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub event: LedgerEvent,
}

/// Flattened entry for the log panel
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub seat: Seat,
    pub player_name: String,
    pub description: String,
    pub points: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_victim_points_include_bonus() {
        let event = LedgerEvent::Victim {
            victim_kind: VictimKind::StalemateOther,
            scorer: Seat::Red,
            victim: Seat::Blue,
            points: 20,
            bonus: Some(BonusGrant {
                recipients: vec![Seat::Yellow, Seat::Green],
                points: STALEMATE_BONUS,
            }),
            elimination: None,
        };
        assert_eq!(event.points(), Some(40));
        assert_eq!(event.seat(), Seat::Red);
        assert_eq!(event.describe(), "Stalemated blue");
    }

    #[test]
    fn test_capture_description() {
        let event = LedgerEvent::Capture {
            seat: Seat::Green,
            piece: Piece::PromotedQueen,
            points: 1,
        };
        assert_eq!(event.describe(), "Captured promoted queen");
    }

    #[test]
    fn test_kind_aliases() {
        let kind: VictimKind = serde_json::from_str("\"checkmate-victim\"").unwrap();
        assert_eq!(kind, VictimKind::Checkmate);
        let kind: ScoreKind = serde_json::from_str("\"stalemate-other\"").unwrap();
        assert_eq!(kind, ScoreKind::StalemateOther);
        let reason: EliminationReason = serde_json::from_str("\"eliminate\"").unwrap();
        assert_eq!(reason, EliminationReason::Resigned);
    }

    #[test]
    fn test_action_kind_prefers_plain_scores() {
        let kind: ActionKind = serde_json::from_str("\"checkmate\"").unwrap();
        assert_eq!(kind, ActionKind::Score(ScoreKind::Checkmate));
        let kind: ActionKind = serde_json::from_str("\"stalemate-other\"").unwrap();
        assert_eq!(kind, ActionKind::Score(ScoreKind::StalemateOther));
        let kind: ActionKind = serde_json::from_str("\"checkmate-victim\"").unwrap();
        assert_eq!(kind, ActionKind::Victim(VictimKind::Checkmate));
        let kind: ActionKind = serde_json::from_str("\"stalemate-other-victim\"").unwrap();
        assert_eq!(kind, ActionKind::Victim(VictimKind::StalemateOther));
        assert!(serde_json::from_str::<ActionKind>("\"resign\"").is_err());
    }
}
