use serde::{Deserialize, Serialize};

use crate::error::{ClockError, ClockResult};
use crate::models::{Player, Seat};

pub const MAX_MINUTES: u64 = 60;
pub const MAX_INCREMENT_SECONDS: u64 = 60;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    #[serde(rename = "ffa")]
    FreeForAll,
    #[serde(rename = "teams")]
    Teams,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::FreeForAll => "Free-for-All",
            GameMode::Teams => "Teams",
        }
    }
}

/// `NotStarted -> Running <-> Paused -> Finished`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Finished,
}

/// Time control and table setup for one match
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub minutes: u64,
    pub increment_seconds: u64,
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default = "default_names")]
    pub names: [String; 4],
}

fn default_names() -> [String; 4] {
    Seat::ALL.map(|seat| seat.default_name().to_string())
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            minutes: 5,
            increment_seconds: 0,
            mode: GameMode::FreeForAll,
            names: default_names(),
        }
    }
}

impl MatchConfig {
    pub fn new(minutes: u64, increment_seconds: u64, mode: GameMode) -> ClockResult<Self> {
        let config = MatchConfig {
            minutes,
            increment_seconds,
            mode,
            names: default_names(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClockResult<()> {
        if self.minutes == 0 || self.minutes > MAX_MINUTES {
            return Err(ClockError::InvalidConfig(format!(
                "minutes must be between 1 and {}, got {}",
                MAX_MINUTES, self.minutes
            )));
        }
        if self.increment_seconds > MAX_INCREMENT_SECONDS {
            return Err(ClockError::InvalidConfig(format!(
                "increment must be at most {} seconds, got {}",
                MAX_INCREMENT_SECONDS, self.increment_seconds
            )));
        }
        Ok(())
    }

    /// Replaces blank names with `Player N`.
    pub fn with_names(mut self, names: [String; 4]) -> Self {
        for (i, name) in names.into_iter().enumerate() {
            let trimmed = name.trim();
            self.names[i] = if trimmed.is_empty() {
                format!("Player {}", i + 1)
            } else {
                trimmed.to_string()
            };
        }
        self
    }

    pub fn starting_time_ms(&self) -> u64 {
        self.minutes * 60_000
    }

    pub fn increment_ms(&self) -> u64 {
        self.increment_seconds * 1000
    }
}

/// The single owned piece of mutable match state.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub config: MatchConfig,
    pub players: [Player; 4],
    pub active: Option<Seat>,
    pub phase: Phase,
    /// Bumped whenever the clocks are reset. Eliminations from an older epoch
    /// no longer own the turn or the phase.
    pub clock_epoch: u64,
    /// Bumped every time the move passes to another seat.
    pub turn: u64,
}

impl MatchState {
    pub fn new(config: MatchConfig) -> Self {
        let time_ms = config.starting_time_ms();
        let players = Seat::ALL.map(|seat| Player::new(seat, config.names[seat.index()].clone(), time_ms));
        MatchState {
            config,
            players,
            active: None,
            phase: Phase::NotStarted,
            clock_epoch: 0,
            turn: 0,
        }
    }

    /// Fresh players from the current config: full clocks, zero scores, nobody eliminated.
    pub fn reset(&mut self) {
        let clock_epoch = self.clock_epoch + 1;
        *self = MatchState::new(self.config.clone());
        self.clock_epoch = clock_epoch;
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat.index()]
    }

    pub fn remaining(&self) -> Vec<Seat> {
        Seat::ALL
            .into_iter()
            .filter(|seat| !self.player(*seat).eliminated)
            .collect()
    }

    pub fn remaining_count(&self) -> usize {
        self.players.iter().filter(|p| !p.eliminated).count()
    }
}
