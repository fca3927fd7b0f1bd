pub mod commands;
pub mod handler;

pub use handler::{ws_index, ClockWebSocket};
