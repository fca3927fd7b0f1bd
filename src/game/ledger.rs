use chrono::Utc;
use log::{debug, info};

use crate::error::{ClockError, ClockResult};
use crate::models::{
    BonusGrant, EliminationReason, EliminationRecord, LedgerEntry, LedgerEvent, LogLine, MatchState,
    Piece, ScoreKind, Seat, Standing, VictimKind, MAX_POINTS, STALEMATE_BONUS,
};

/// Append-only log of scoring and elimination events. Every entry can be undone.
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    entries: Vec<LedgerEntry>,
    next_id: u64,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Credits `points` to `seat`. `StalemateOther` instead credits the fixed
    /// bonus to every seat still in the game, as one entry.
    pub fn apply(&mut self, state: &mut MatchState, kind: ScoreKind, seat: Seat, points: i64) -> ClockResult<()> {
        check_points(points)?;
        let event = if kind == ScoreKind::StalemateOther {
            let bonus = BonusGrant {
                recipients: state.remaining(),
                points: STALEMATE_BONUS,
            };
            credit_bonus(state, &bonus);
            LedgerEvent::StalemateAll {
                declared_by: seat,
                bonus,
            }
        } else {
            state.player_mut(seat).score += points;
            LedgerEvent::Score {
                score_kind: kind,
                seat,
                points,
            }
        };
        self.push(event);
        Ok(())
    }

    pub fn apply_capture(
        &mut self,
        state: &mut MatchState,
        seat: Seat,
        piece: Piece,
        points: i64,
    ) -> ClockResult<()> {
        check_points(points)?;
        state.player_mut(seat).score += points;
        self.push(LedgerEvent::Capture { seat, piece, points });
        Ok(())
    }

    /// Returns `false` if the seat was already out.
    pub fn apply_elimination(&mut self, state: &mut MatchState, seat: Seat, reason: EliminationReason) -> bool {
        match state.eliminate(seat, reason) {
            Some(record) => {
                self.record_elimination(record);
                true
            }
            None => false,
        }
    }

    /// Logs an elimination the clock already carried out.
    pub fn record_elimination(&mut self, record: EliminationRecord) {
        self.push(LedgerEvent::Elimination(record));
    }

    /// Scores for `scorer` and knocks out `victim`. A stalemate caused by another player
    /// also credits the fixed bonus to everyone else still in the game.
    pub fn apply_victim_action(
        &mut self,
        state: &mut MatchState,
        kind: VictimKind,
        scorer: Seat,
        victim: Seat,
        points: i64,
    ) -> ClockResult<()> {
        if scorer == victim {
            return Err(ClockError::InvalidVictim(victim));
        }
        check_points(points)?;

        state.player_mut(scorer).score += points;

        let bonus = match kind {
            VictimKind::Checkmate => None,
            VictimKind::StalemateOther => {
                let recipients = state
                    .remaining()
                    .into_iter()
                    .filter(|seat| *seat != scorer && *seat != victim)
                    .collect();
                let bonus = BonusGrant {
                    recipients,
                    points: STALEMATE_BONUS,
                };
                credit_bonus(state, &bonus);
                Some(bonus)
            }
        };

        let reason = match kind {
            VictimKind::Checkmate => EliminationReason::Checkmated,
            VictimKind::StalemateOther => EliminationReason::Stalemated,
        };
        let elimination = state.eliminate(victim, reason);

        self.push(LedgerEvent::Victim {
            victim_kind: kind,
            scorer,
            victim,
            points,
            bonus,
            elimination,
        });
        Ok(())
    }

    /// Pops the newest entry and applies its inverse. `false` when there is nothing to undo.
    pub fn undo(&mut self, state: &mut MatchState) -> bool {
        let Some(entry) = self.entries.pop() else {
            debug!("Nothing to undo");
            return false;
        };

        match &entry.event {
            LedgerEvent::Score { seat, points, .. } | LedgerEvent::Capture { seat, points, .. } => {
                state.player_mut(*seat).score -= points;
            }
            LedgerEvent::StalemateAll { bonus, .. } => {
                debit_bonus(state, bonus);
            }
            LedgerEvent::Victim {
                scorer,
                points,
                bonus,
                elimination,
                ..
            } => {
                if let Some(record) = elimination {
                    state.reinstate(record);
                }
                if let Some(bonus) = bonus {
                    debit_bonus(state, bonus);
                }
                state.player_mut(*scorer).score -= points;
            }
            LedgerEvent::Elimination(record) => {
                state.reinstate(record);
            }
        }

        info!("Undid entry {}: {}", entry.id, entry.event.describe());
        true
    }

    /// Newest first, for the log panel.
    pub fn log_lines(&self, state: &MatchState) -> Vec<LogLine> {
        self.entries
            .iter()
            .rev()
            .map(|entry| {
                let seat = entry.event.seat();
                LogLine {
                    id: entry.id,
                    timestamp: entry.timestamp,
                    seat,
                    player_name: state.player(seat).name.clone(),
                    description: entry.event.describe(),
                    points: entry.event.points(),
                }
            })
            .collect()
    }

    fn push(&mut self, event: LedgerEvent) {
        self.next_id += 1;
        info!("Ledger entry {}: {} ({})", self.next_id, event.describe(), event.seat());
        self.entries.push(LedgerEntry {
            id: self.next_id,
            timestamp: Utc::now(),
            event,
        });
    }
}

/// Players by score, highest first; ties keep seat order.
pub fn standings(state: &MatchState) -> Vec<Standing> {
    let mut players: Vec<_> = state.players.iter().collect();
    players.sort_by(|a, b| b.score.cmp(&a.score));
    players
        .into_iter()
        .enumerate()
        .map(|(i, player)| Standing {
            rank: i + 1,
            seat: player.seat,
            name: player.name.clone(),
            score: player.score,
            time_ms: player.time_ms,
            eliminated: player.eliminated,
        })
        .collect()
}

/// Rejects a single action worth more than `MAX_POINTS` either way.
pub fn check_points(points: i64) -> ClockResult<()> {
    if !(-MAX_POINTS..=MAX_POINTS).contains(&points) {
        return Err(ClockError::InvalidPoints {
            points,
            max: MAX_POINTS,
        });
    }
    Ok(())
}

fn credit_bonus(state: &mut MatchState, bonus: &BonusGrant) {
    for seat in &bonus.recipients {
        state.player_mut(*seat).score += bonus.points;
    }
}

fn debit_bonus(state: &mut MatchState, bonus: &BonusGrant) {
    for seat in &bonus.recipients {
        state.player_mut(*seat).score -= bonus.points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchConfig, Phase};
    use proptest::prelude::*;

    fn started() -> MatchState {
        let mut state = MatchState::new(MatchConfig::default());
        state.tap(Seat::Red);
        state
    }

    fn scores(state: &MatchState) -> [i64; 4] {
        state.players.clone().map(|p| p.score)
    }

    fn flags(state: &MatchState) -> [bool; 4] {
        state.players.clone().map(|p| p.eliminated)
    }

    #[test]
    fn test_apply_and_undo_single_score() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        ledger.apply(&mut state, ScoreKind::Check, Seat::Blue, 1).unwrap();
        ledger.apply(&mut state, ScoreKind::Adjustment, Seat::Blue, -4).unwrap();
        assert_eq!(state.player(Seat::Blue).score, -3);
        assert!(ledger.undo(&mut state));
        assert_eq!(state.player(Seat::Blue).score, 1);
    }

    #[test]
    fn test_stalemate_other_is_one_bulk_entry() {
        let mut state = started();
        state.eliminate(Seat::Green, EliminationReason::Resigned);
        let mut ledger = ScoreLedger::new();
        ledger.apply(&mut state, ScoreKind::StalemateOther, Seat::Red, 999).unwrap();
        assert_eq!(scores(&state), [10, 10, 10, 0]);
        assert_eq!(ledger.entries().len(), 1);

        // a later elimination must not change what undo takes back
        state.eliminate(Seat::Blue, EliminationReason::Resigned);
        assert!(ledger.undo(&mut state));
        assert_eq!(scores(&state), [0, 0, 0, 0]);
    }

    #[test]
    fn test_checkmate_victim_undo() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        ledger
            .apply_victim_action(&mut state, VictimKind::Checkmate, Seat::Green, Seat::Yellow, 20)
            .unwrap();
        assert_eq!(state.player(Seat::Green).score, 20);
        assert!(state.player(Seat::Yellow).eliminated);

        assert!(ledger.undo(&mut state));
        assert_eq!(state.player(Seat::Green).score, 0);
        assert!(!state.player(Seat::Yellow).eliminated);
    }

    #[test]
    fn test_stalemate_victim_bonus_skips_scorer_and_victim() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        ledger
            .apply_victim_action(&mut state, VictimKind::StalemateOther, Seat::Red, Seat::Blue, 20)
            .unwrap();
        assert_eq!(scores(&state), [20, 0, 10, 10]);
        assert!(state.player(Seat::Blue).eliminated);
        assert_eq!(ledger.entries()[0].event.points(), Some(40));
    }

    #[test]
    fn test_self_victim_is_rejected_without_mutation() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        let result = ledger.apply_victim_action(&mut state, VictimKind::Checkmate, Seat::Red, Seat::Red, 20);
        assert_eq!(result, Err(ClockError::InvalidVictim(Seat::Red)));
        assert_eq!(scores(&state), [0; 4]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_mating_a_timed_out_king_keeps_it_out_on_undo() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        let record = state.tick(400_000).unwrap();
        ledger.record_elimination(record);
        ledger
            .apply_victim_action(&mut state, VictimKind::Checkmate, Seat::Blue, Seat::Red, 20)
            .unwrap();
        assert!(ledger.undo(&mut state));
        assert!(state.player(Seat::Red).eliminated);
        assert_eq!(state.player(Seat::Blue).score, 0);
    }

    #[test]
    fn test_elimination_undo_reopens_finished_match() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        assert!(ledger.apply_elimination(&mut state, Seat::Blue, EliminationReason::Resigned));
        assert!(ledger.apply_elimination(&mut state, Seat::Yellow, EliminationReason::Resigned));
        assert!(ledger.apply_elimination(&mut state, Seat::Green, EliminationReason::Timeout));
        assert!(!ledger.apply_elimination(&mut state, Seat::Green, EliminationReason::Timeout));
        assert_eq!(state.phase, Phase::Finished);

        assert!(ledger.undo(&mut state));
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.active, Some(Seat::Red));
        assert!(!state.player(Seat::Green).eliminated);
    }

    #[test]
    fn test_out_of_range_points_are_rejected_without_mutation() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        ledger.apply(&mut state, ScoreKind::Adjustment, Seat::Red, MAX_POINTS).unwrap();

        let too_big = ClockError::InvalidPoints {
            points: i64::MAX,
            max: MAX_POINTS,
        };
        assert_eq!(
            ledger.apply(&mut state, ScoreKind::Adjustment, Seat::Red, i64::MAX),
            Err(too_big.clone())
        );
        assert_eq!(
            ledger.apply_capture(&mut state, Seat::Red, Piece::Pawn, i64::MAX),
            Err(too_big.clone())
        );
        assert_eq!(
            ledger.apply_victim_action(&mut state, VictimKind::Checkmate, Seat::Red, Seat::Blue, i64::MAX),
            Err(too_big)
        );
        assert!(ledger
            .apply(&mut state, ScoreKind::Adjustment, Seat::Red, i64::MIN)
            .is_err());

        assert_eq!(scores(&state), [MAX_POINTS, 0, 0, 0]);
        assert!(!state.player(Seat::Blue).eliminated);
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn test_empty_undo_is_noop() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        assert!(!ledger.undo(&mut state));
        assert_eq!(scores(&state), [0; 4]);
    }

    #[test]
    fn test_standings_sorted_and_stable() {
        let mut state = started();
        state.player_mut(Seat::Blue).score = 5;
        state.player_mut(Seat::Green).score = 5;
        state.player_mut(Seat::Yellow).score = 12;
        let order: Vec<_> = standings(&state).iter().map(|s| s.seat).collect();
        assert_eq!(order, vec![Seat::Yellow, Seat::Blue, Seat::Green, Seat::Red]);
        assert_eq!(standings(&state)[0].rank, 1);
    }

    #[test]
    fn test_log_lines_newest_first() {
        let mut state = started();
        let mut ledger = ScoreLedger::new();
        ledger.apply_capture(&mut state, Seat::Red, Piece::Queen, 9).unwrap();
        ledger.apply(&mut state, ScoreKind::Check, Seat::Blue, 1).unwrap();
        let lines = ledger.log_lines(&state);
        assert_eq!(lines[0].description, "Check");
        assert_eq!(lines[0].player_name, "Blue");
        assert_eq!(lines[1].description, "Captured queen");
        assert_eq!(lines[1].points, Some(9));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Score(ScoreKind, usize, i64),
        Capture(usize, i64),
        Victim(bool, usize, usize, i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        let kind = prop_oneof![
            Just(ScoreKind::Check),
            Just(ScoreKind::Checkmate),
            Just(ScoreKind::Stalemate),
            Just(ScoreKind::StalemateOther),
            Just(ScoreKind::Adjustment),
        ];
        prop_oneof![
            (kind, 0..4usize, -20..40i64).prop_map(|(k, s, p)| Op::Score(k, s, p)),
            (0..4usize, 0..10i64).prop_map(|(s, p)| Op::Capture(s, p)),
            (any::<bool>(), 0..4usize, 0..4usize, 0..30i64).prop_map(|(c, s, v, p)| Op::Victim(c, s, v, p)),
        ]
    }

    proptest! {
        #[test]
        fn prop_undo_restores_scores_and_flags(ops in proptest::collection::vec(op(), 0..24)) {
            let mut state = started();
            let mut ledger = ScoreLedger::new();
            let before_scores = scores(&state);
            let before_flags = flags(&state);

            let mut applied = 0;
            for op in ops {
                match op {
                    Op::Score(kind, seat, points) => {
                        prop_assert!(ledger.apply(&mut state, kind, Seat::ALL[seat], points).is_ok());
                        applied += 1;
                    }
                    Op::Capture(seat, points) => {
                        prop_assert!(ledger.apply_capture(&mut state, Seat::ALL[seat], Piece::Pawn, points).is_ok());
                        applied += 1;
                    }
                    Op::Victim(checkmate, scorer, victim, points) => {
                        let kind = if checkmate { VictimKind::Checkmate } else { VictimKind::StalemateOther };
                        if ledger
                            .apply_victim_action(&mut state, kind, Seat::ALL[scorer], Seat::ALL[victim], points)
                            .is_ok()
                        {
                            applied += 1;
                        }
                    }
                }
            }

            for _ in 0..applied {
                prop_assert!(ledger.undo(&mut state));
            }
            prop_assert_eq!(scores(&state), before_scores);
            prop_assert_eq!(flags(&state), before_flags);
            prop_assert!(ledger.is_empty());
        }
    }
}
