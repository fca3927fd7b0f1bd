use log::{debug, info};
use std::time::Instant;

use crate::error::ClockResult;
use crate::game::{Scorekeeper, TickScheduler, Ticker};
use crate::models::{ActionKind, ClientMessage, Seat};

/// Runs one command for a session and keeps its tick task in step with the match.
///
/// Time up to `now` is charged first. Commands that halt the clock drop the task
/// before they run, so no stale tick lands on the new state. Afterwards a task
/// runs exactly while the match is running, whether or not the command succeeded.
pub fn dispatch<S>(
    keeper: &mut Scorekeeper,
    ticker: &mut Ticker<S::Handle>,
    scheduler: &mut S,
    msg: ClientMessage,
    now: Instant,
) -> ClockResult<bool>
where
    S: TickScheduler,
{
    charge_elapsed(keeper, ticker, now);
    if msg.halts_clock() {
        ticker.stop(scheduler);
    }

    let result = apply_command(keeper, msg);
    ticker.sync(keeper.is_running(), scheduler, now);
    result
}

/// Charges the active seat for the time since the last tick. Returns the seat whose flag fell.
pub fn charge_elapsed<H>(keeper: &mut Scorekeeper, ticker: &mut Ticker<H>, now: Instant) -> Option<Seat> {
    if !ticker.is_active() {
        return None;
    }
    let elapsed = ticker.lap(now);
    let flagged = keeper.tick(elapsed);
    if let Some(seat) = flagged {
        info!("{} flagged", seat);
    }
    flagged
}

/// Applies one client command to the session's scorekeeper.
///
/// `Ok(false)` means the command was a harmless no-op (pausing before the start,
/// tapping out of turn, undo on an empty ledger). On `Err` nothing was mutated.
pub fn apply_command(keeper: &mut Scorekeeper, msg: ClientMessage) -> ClockResult<bool> {
    let changed = match msg {
        ClientMessage::Configure {
            minutes,
            increment_seconds,
            mode,
            names,
        } => {
            keeper.configure(minutes, increment_seconds, mode, names)?;
            true
        }
        ClientMessage::StartMatch => {
            keeper.start_match()?;
            true
        }
        ClientMessage::TapPlayer { seat } => keeper.tap_player(seat),
        ClientMessage::TogglePause => keeper.toggle_pause(),
        ClientMessage::SelectTarget { seat } => {
            keeper.select_target(seat);
            true
        }
        ClientMessage::ScoreAction { kind, points } => {
            match kind {
                ActionKind::Score(kind) => keeper.score_action(kind, points)?,
                ActionKind::Victim(kind) => keeper.begin_victim_selection(kind, points)?,
            }
            true
        }
        ClientMessage::ScoreCapture { piece, points } => {
            keeper.score_capture(piece, points)?;
            true
        }
        ClientMessage::ScoreVictimAction { kind, victim, points } => {
            keeper.score_victim_action(kind, victim, points)?;
            true
        }
        ClientMessage::BeginVictimSelection { kind, points } => {
            keeper.begin_victim_selection(kind, points)?;
            true
        }
        ClientMessage::ResolveVictim { victim } => {
            keeper.resolve_victim(victim)?;
            true
        }
        ClientMessage::CancelVictimSelection => keeper.cancel_victim_selection(),
        ClientMessage::SetStatus { status } => keeper.set_status(status)?,
        ClientMessage::Undo => keeper.undo(),
        ClientMessage::ResetClocks => {
            keeper.reset_clocks();
            true
        }
        ClientMessage::ResetScores => {
            keeper.reset_scores();
            true
        }
        ClientMessage::FinishMatch => keeper.finish_match(),
        ClientMessage::Sync => false,
    };

    if changed {
        info!(
            "Command applied, phase is now {:?} with {} ledger entries",
            keeper.phase(),
            keeper.entries().len()
        );
    } else {
        debug!("Command left the match unchanged");
    }
    Ok(changed)
}
