pub mod clock;
pub mod ledger;
pub mod scorekeeper;
pub mod ticker;
pub mod utils;

pub use scorekeeper::Scorekeeper;
pub use ticker::{TickScheduler, Ticker, TICK_INTERVAL};
