use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::ServerConfig;

/// Application state shared between connections.
///
/// Each session owns its own match; this only tracks which sessions are open.
pub struct AppState {
    pub config: ServerConfig,
    pub sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        AppState {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the number of open sessions afterwards.
    pub fn register(&self, id: String) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.insert(id, Utc::now());
        sessions.len()
    }

    pub fn unregister(&self, id: &str) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(id);
        sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn oldest_session(&self) -> Option<DateTime<Utc>> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.values().min().copied()
    }
}
