//! Shell configuration read from the environment.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::FRAME_MS;

pub const ENV_SEED: &str = "BLOCKFALL_SEED";
pub const ENV_FRAME_MS: &str = "BLOCKFALL_FRAME_MS";
pub const ENV_LOG_PATH: &str = "BLOCKFALL_LOG_PATH";
pub const ENV_CELL_WIDTH: &str = "BLOCKFALL_CELL_WIDTH";

const DEFAULT_CELL_WIDTH: u16 = 2;
const MAX_CELL_WIDTH: u16 = 4;

/// Game shell configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for the piece factory
    pub seed: u64,
    /// Frame cadence of the shell loop
    pub frame_ms: u32,
    /// JSON-lines event journal; `None` disables it
    pub log_path: Option<String>,
    /// Terminal columns per board cell
    pub cell_width: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: time_seed(),
            frame_ms: FRAME_MS,
            log_path: None,
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }
}

impl GameConfig {
    /// Create from environment variables.
    ///
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup(ENV_SEED)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(time_seed);

        let frame_ms = lookup(ENV_FRAME_MS)
            .and_then(|s| s.trim().parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(FRAME_MS);

        let log_path = lookup(ENV_LOG_PATH)
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let cell_width = lookup(ENV_CELL_WIDTH)
            .and_then(|s| s.trim().parse().ok())
            .filter(|w: &u16| (1..=MAX_CELL_WIDTH).contains(w))
            .unwrap_or(DEFAULT_CELL_WIDTH);

        Self {
            seed,
            frame_ms,
            log_path,
            cell_width,
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
