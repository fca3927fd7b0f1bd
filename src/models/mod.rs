pub mod app_state;
pub mod ledger;
pub mod match_state;
pub mod messages;
pub mod player;
pub mod snapshot;

// Re-export important types
pub use app_state::*;
pub use ledger::*;
pub use match_state::*;
pub use messages::*;
pub use player::*;
pub use snapshot::*;
