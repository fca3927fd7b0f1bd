use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ClockError, ClockResult};
use crate::models::{GameMode, MatchConfig};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Server settings, read from `FOURCLOCK_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub static_dir: PathBuf,
    /// What a fresh session's match is set up with before the client configures it.
    pub default_match: MatchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            default_match: MatchConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> ClockResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> ClockResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let bind = lookup("FOURCLOCK_BIND").unwrap_or(defaults.bind);
        if bind.trim().is_empty() {
            return Err(ClockError::InvalidConfig("FOURCLOCK_BIND is empty".to_string()));
        }

        let static_dir = lookup("FOURCLOCK_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let minutes = parse_var(&lookup, "FOURCLOCK_DEFAULT_MINUTES", defaults.default_match.minutes)?;
        let increment = parse_var(
            &lookup,
            "FOURCLOCK_DEFAULT_INCREMENT",
            defaults.default_match.increment_seconds,
        )?;
        let default_match = MatchConfig::new(minutes, increment, GameMode::FreeForAll)?;

        Ok(ServerConfig {
            bind,
            static_dir,
            default_match,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> ClockResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClockError::InvalidConfig(format!("{} is not a valid number: {:?}", key, raw))),
        None => Ok(default),
    }
}
