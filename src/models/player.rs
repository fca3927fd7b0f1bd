use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed positions around the board, in turn order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Red,
    Blue,
    Yellow,
    Green,
}

impl Seat {
    pub const ALL: [Seat; 4] = [Seat::Red, Seat::Blue, Seat::Yellow, Seat::Green];

    pub fn index(self) -> usize {
        match self {
            Seat::Red => 0,
            Seat::Blue => 1,
            Seat::Yellow => 2,
            Seat::Green => 3,
        }
    }

    /// The seat after this one in the fixed rotation.
    pub fn next(self) -> Seat {
        Seat::ALL[(self.index() + 1) % Seat::ALL.len()]
    }

    pub fn default_name(self) -> &'static str {
        match self {
            Seat::Red => "Red",
            Seat::Blue => "Blue",
            Seat::Yellow => "Yellow",
            Seat::Green => "Green",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Seat::Red => "red",
            Seat::Blue => "blue",
            Seat::Yellow => "yellow",
            Seat::Green => "green",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clock and score for one seat. Reset, never destroyed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    pub time_ms: u64,
    pub score: i64,
    pub eliminated: bool,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>, time_ms: u64) -> Self {
        Player {
            seat,
            name: name.into(),
            time_ms,
            score: 0,
            eliminated: false,
        }
    }
}
