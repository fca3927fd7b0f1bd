use log::{debug, info};

use crate::error::{ClockError, ClockResult};
use crate::game::ledger::{check_points, standings, ScoreLedger};
use crate::game::utils::{format_time, is_low_time};
use crate::models::{
    EliminationReason, GameMode, LedgerEntry, LogLine, MatchConfig, MatchSnapshot, MatchState,
    PendingVictimAction, Phase, Piece, PlayerView, ScoreKind, Seat, Standing, VictimKind,
};

/// One table's clock and score sheet behind a single command/query surface.
///
/// Commands that may be ignored return `bool` ("did anything change");
/// commands that can be rejected return `ClockResult` and leave state untouched on `Err`.
#[derive(Debug, Clone)]
pub struct Scorekeeper {
    config: MatchConfig,
    state: MatchState,
    ledger: ScoreLedger,
    selected: Option<Seat>,
    pending: Option<PendingVictimAction>,
}

impl Scorekeeper {
    pub fn new(config: MatchConfig) -> Self {
        Scorekeeper {
            state: MatchState::new(config.clone()),
            config,
            ledger: ScoreLedger::new(),
            selected: None,
            pending: None,
        }
    }

    /// Stores the setup for the next `start_match`.
    pub fn configure(
        &mut self,
        minutes: u64,
        increment_seconds: u64,
        mode: GameMode,
        names: Option<[String; 4]>,
    ) -> ClockResult<()> {
        let mut config = MatchConfig::new(minutes, increment_seconds, mode)?;
        if let Some(names) = names {
            config = config.with_names(names);
        }
        info!("Configured {} min + {} s, {}", minutes, increment_seconds, mode.label());
        self.config = config;
        Ok(())
    }

    pub fn start_match(&mut self) -> ClockResult<()> {
        self.state.start_match(self.config.clone())?;
        self.ledger.clear();
        self.selected = None;
        self.pending = None;
        Ok(())
    }

    pub fn tap_player(&mut self, seat: Seat) -> bool {
        self.state.tap(seat)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.state.toggle_pause()
    }

    /// Returns the seat whose flag fell, if any.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<Seat> {
        let record = self.state.tick(elapsed_ms)?;
        let seat = record.seat;
        self.ledger.record_elimination(record);
        Some(seat)
    }

    pub fn select_target(&mut self, seat: Seat) {
        debug!("Selected {} as action target", seat);
        self.selected = Some(seat);
    }

    pub fn score_action(&mut self, kind: ScoreKind, points: i64) -> ClockResult<()> {
        let seat = self.target()?;
        self.ledger.apply(&mut self.state, kind, seat, points)
    }

    /// `points` defaults to the piece's free-for-all value.
    pub fn score_capture(&mut self, piece: Piece, points: Option<i64>) -> ClockResult<()> {
        let seat = self.target()?;
        let points = points.unwrap_or_else(|| piece.default_points());
        self.ledger.apply_capture(&mut self.state, seat, piece, points)
    }

    /// The selected target scores, `victim` is knocked out.
    pub fn score_victim_action(&mut self, kind: VictimKind, victim: Seat, points: i64) -> ClockResult<()> {
        let scorer = self.target()?;
        self.ledger
            .apply_victim_action(&mut self.state, kind, scorer, victim, points)?;
        self.pending = None;
        Ok(())
    }

    /// First half of the victim flow: remember who scores and how much until a victim is picked.
    pub fn begin_victim_selection(&mut self, kind: VictimKind, points: i64) -> ClockResult<()> {
        let scorer = self.target()?;
        check_points(points)?;
        self.pending = Some(PendingVictimAction { scorer, kind, points });
        Ok(())
    }

    pub fn resolve_victim(&mut self, victim: Seat) -> ClockResult<()> {
        let pending = self.pending.ok_or(ClockError::NoPendingAction)?;
        self.ledger.apply_victim_action(
            &mut self.state,
            pending.kind,
            pending.scorer,
            victim,
            pending.points,
        )?;
        self.pending = None;
        Ok(())
    }

    pub fn cancel_victim_selection(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Eliminates the selected target. `Ok(false)` if it was already out.
    pub fn set_status(&mut self, reason: EliminationReason) -> ClockResult<bool> {
        let seat = self.target()?;
        Ok(self.ledger.apply_elimination(&mut self.state, seat, reason))
    }

    pub fn undo(&mut self) -> bool {
        self.ledger.undo(&mut self.state)
    }

    pub fn reset_clocks(&mut self) {
        self.state.reset_clocks();
    }

    pub fn reset_scores(&mut self) {
        for player in self.state.players.iter_mut() {
            player.score = 0;
        }
        self.ledger.clear();
        self.pending = None;
        info!("Scores reset");
    }

    pub fn finish_match(&mut self) -> bool {
        self.state.finish_match()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        self.ledger.entries()
    }

    pub fn log(&self) -> Vec<LogLine> {
        self.ledger.log_lines(&self.state)
    }

    pub fn standings(&self) -> Vec<Standing> {
        standings(&self.state)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let state = &self.state;
        let players = state
            .players
            .iter()
            .map(|player| PlayerView {
                seat: player.seat,
                name: player.name.clone(),
                time_ms: player.time_ms,
                time_display: format_time(player.time_ms),
                low_time: is_low_time(player.time_ms),
                score: player.score,
                eliminated: player.eliminated,
                active: state.active == Some(player.seat),
            })
            .collect();

        MatchSnapshot {
            phase: state.phase,
            mode: state.config.mode,
            mode_label: state.config.mode.label().to_string(),
            minutes: state.config.minutes,
            increment_seconds: state.config.increment_seconds,
            active: state.active,
            players,
            selected_target: self.selected,
            pending: self.pending,
            can_undo: !self.ledger.is_empty(),
        }
    }

    fn target(&self) -> ClockResult<Seat> {
        self.selected.ok_or(ClockError::InvalidTarget)
    }
}

impl Default for Scorekeeper {
    fn default() -> Self {
        Scorekeeper::new(MatchConfig::default())
    }
}
