//! Configuration for the game-sync demo
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_core::GameType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use engine_config::{load_config, CentralConfig};

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_game() -> String {
    CENTRAL_CONFIG.demo.game.clone()
}

fn default_challenger() -> String {
    CENTRAL_CONFIG.demo.challenger.clone()
}

fn default_opponent() -> String {
    CENTRAL_CONFIG.demo.opponent.clone()
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.demo.seed
}

fn default_rounds() -> u32 {
    CENTRAL_CONFIG.demo.rounds
}

fn default_max_moves() -> u32 {
    CENTRAL_CONFIG.demo.max_moves
}

fn default_think_time() -> u64 {
    CENTRAL_CONFIG.demo.think_time_ms
}

fn default_poll_interval() -> u64 {
    CENTRAL_CONFIG.sync.poll_interval_ms
}

fn default_request_timeout() -> u64 {
    CENTRAL_CONFIG.sync.request_timeout_ms
}

fn default_notice_capacity() -> usize {
    CENTRAL_CONFIG.sync.notice_capacity
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "game-sync")]
#[command(about = "Plays a turn-based game between two clients over a shared game store")]
#[command(
    long_about = "Runs a complete match between two simulated players. Both clients talk to
an in-memory game store, poll it for the opponent's moves and pick random
legal moves when it is their turn.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Game to play (tictactoe, connect4)
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// Player who sends the challenge and moves first
    #[arg(long, default_value_t = default_challenger())]
    pub challenger: String,

    /// Player who accepts the challenge
    #[arg(long, default_value_t = default_opponent())]
    pub opponent: String,

    /// Seed for move selection
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Number of games to play, resetting the board in between
    #[arg(long, default_value_t = default_rounds())]
    pub rounds: u32,

    /// Stop when a single round reaches this many moves (0 for no limit)
    #[arg(long, default_value_t = default_max_moves())]
    pub max_moves: u32,

    /// Pause before each move in milliseconds
    #[arg(long, default_value_t = default_think_time())]
    pub think_time_ms: u64,

    /// Interval between polls of the game store in milliseconds
    #[arg(long, default_value_t = default_poll_interval())]
    pub poll_interval_ms: u64,

    /// Timeout for each call to the game store in milliseconds
    #[arg(long, default_value_t = default_request_timeout())]
    pub request_timeout_ms: u64,

    /// Notices buffered per client before new ones are dropped
    #[arg(long, default_value_t = default_notice_capacity())]
    pub notice_capacity: usize,

    /// Print the available games and exit
    #[arg(long)]
    pub list_games: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.game_type()?;

        if self.challenger.is_empty() {
            return Err(anyhow!("challenger cannot be empty"));
        }

        if self.opponent.is_empty() {
            return Err(anyhow!("opponent cannot be empty"));
        }

        if self.challenger == self.opponent {
            return Err(anyhow!("challenger and opponent must be different players"));
        }

        if self.rounds == 0 {
            return Err(anyhow!("rounds must be greater than 0"));
        }

        if self.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be greater than 0"));
        }

        if self.request_timeout_ms == 0 {
            return Err(anyhow!("request_timeout_ms must be greater than 0"));
        }

        if self.notice_capacity == 0 {
            return Err(anyhow!("notice_capacity must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn game_type(&self) -> Result<GameType> {
        self.game.parse().map_err(|e| anyhow!("{}", e))
    }

    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
