use log::{debug, info};

use crate::error::ClockResult;
use crate::models::{EliminationReason, EliminationRecord, MatchConfig, MatchState, Phase, Seat};

/// Turn order and per-seat countdown.
impl MatchState {
    /// Full clocks, zero scores, nobody active until the first tap.
    pub fn start_match(&mut self, config: MatchConfig) -> ClockResult<()> {
        config.validate()?;
        info!(
            "Starting match: {} min + {} s ({})",
            config.minutes,
            config.increment_seconds,
            config.mode.label()
        );
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Returns `false` when the tap was ignored.
    pub fn tap(&mut self, seat: Seat) -> bool {
        if self.player(seat).eliminated {
            debug!("Ignoring tap on eliminated seat {}", seat);
            return false;
        }

        match self.phase {
            Phase::NotStarted => {
                self.phase = Phase::Running;
                self.active = Some(seat);
                self.turn += 1;
                info!("Clock started with {} on move", seat);
                true
            }
            Phase::Running if self.active == Some(seat) => {
                let increment = self.config.increment_ms();
                self.player_mut(seat).time_ms += increment;
                self.advance_turn();
                true
            }
            _ => {
                debug!("Ignoring tap on {} during {:?}", seat, self.phase);
                false
            }
        }
    }

    /// Charges `elapsed_ms` to the active seat. Returns the elimination when its flag falls.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<EliminationRecord> {
        if self.phase != Phase::Running {
            return None;
        }
        let seat = self.active?;

        let player = self.player_mut(seat);
        player.time_ms = player.time_ms.saturating_sub(elapsed_ms);
        if player.time_ms > 0 {
            return None;
        }

        info!("{} ran out of time", seat);
        self.eliminate(seat, EliminationReason::Timeout)
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                info!("Clock paused");
                true
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                info!("Clock resumed");
                true
            }
            _ => {
                debug!("Ignoring pause toggle during {:?}", self.phase);
                false
            }
        }
    }

    /// Knocks a seat out. `None` if it was already out.
    pub fn eliminate(&mut self, seat: Seat, reason: EliminationReason) -> Option<EliminationRecord> {
        if self.player(seat).eliminated {
            debug!("{} is already eliminated", seat);
            return None;
        }

        let previous_active = self.active;
        let previous_phase = self.phase;
        let turn_before = self.turn;

        self.player_mut(seat).eliminated = true;
        info!("Eliminated {} ({})", seat, reason.label());

        let advanced_to = if self.active == Some(seat) {
            self.advance_turn()
        } else {
            if self.remaining_count() <= 1 {
                self.finish();
            }
            None
        };

        Some(EliminationRecord {
            seat,
            reason,
            previous_active,
            previous_phase,
            advanced_to,
            finished_match: previous_phase != Phase::Finished && self.phase == Phase::Finished,
            clock_epoch: self.clock_epoch,
            turn_before,
            turn_after: self.turn,
        })
    }

    /// Reverses an elimination. Turn and phase are only restored if the move has not
    /// passed since; a record from before the last clock reset changes nothing.
    pub fn reinstate(&mut self, record: &EliminationRecord) {
        if record.clock_epoch != self.clock_epoch {
            debug!("Elimination of {} predates the last clock reset", record.seat);
            return;
        }
        self.player_mut(record.seat).eliminated = false;
        info!("Reinstated {}", record.seat);

        if self.turn != record.turn_after {
            return;
        }
        if record.finished_match {
            if self.phase != Phase::Finished {
                return;
            }
            self.phase = record.previous_phase;
        } else if record.advanced_to.is_none() || !matches!(self.phase, Phase::Running | Phase::Paused) {
            return;
        }
        self.active = record.previous_active;
        self.turn = record.turn_before;
    }

    pub fn finish_match(&mut self) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }
        self.finish();
        true
    }

    /// Full clocks, nobody eliminated. Scores are kept, earlier eliminations lose their hold on the turn.
    pub fn reset_clocks(&mut self) {
        self.clock_epoch += 1;
        let time_ms = self.config.starting_time_ms();
        for player in self.players.iter_mut() {
            player.time_ms = time_ms;
            player.eliminated = false;
        }
        self.active = None;
        self.phase = Phase::NotStarted;
        info!("Clocks reset to {} ms", time_ms);
    }

    /// Moves the turn to the next seat still in the game, finishing the match if fewer than two remain.
    fn advance_turn(&mut self) -> Option<Seat> {
        if self.remaining_count() <= 1 {
            self.finish();
            return None;
        }
        let current = self.active?;

        let mut next = current.next();
        let mut steps = 0;
        while self.player(next).eliminated && steps < Seat::ALL.len() {
            next = next.next();
            steps += 1;
        }

        self.active = Some(next);
        self.turn += 1;
        debug!("Turn passes from {} to {}", current, next);
        Some(next)
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.active = None;
        info!("Match finished");
    }
}
