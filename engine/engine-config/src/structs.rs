//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_poll_interval() -> u64 {
    defaults::poll_interval_ms()
}
fn d_request_timeout() -> u64 {
    defaults::request_timeout_ms()
}
fn d_notice_capacity() -> usize {
    defaults::notice_capacity()
}
fn d_game() -> String {
    defaults::demo_game().into()
}
fn d_challenger() -> String {
    defaults::demo_challenger().into()
}
fn d_opponent() -> String {
    defaults::demo_opponent().into()
}
fn d_seed() -> u64 {
    defaults::demo_seed()
}
fn d_rounds() -> u32 {
    defaults::demo_rounds()
}
fn d_max_moves() -> u32 {
    defaults::demo_max_moves()
}
fn d_think_time() -> u64 {
    defaults::demo_think_time_ms()
}

// ============================================================================
// Config structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Remote state synchronization settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Refetch period while a game view is open
    #[serde(default = "d_poll_interval")]
    pub poll_interval_ms: u64,
    /// Upper bound on a single remote call
    #[serde(default = "d_request_timeout")]
    pub request_timeout_ms: u64,
    /// Pending notices buffered for the UI
    #[serde(default = "d_notice_capacity")]
    pub notice_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::poll_interval_ms(),
            request_timeout_ms: defaults::request_timeout_ms(),
            notice_capacity: defaults::notice_capacity(),
        }
    }
}

/// Command line match between two simulated clients
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    #[serde(default = "d_game")]
    pub game: String,
    #[serde(default = "d_challenger")]
    pub challenger: String,
    #[serde(default = "d_opponent")]
    pub opponent: String,
    #[serde(default = "d_seed")]
    pub seed: u64,
    #[serde(default = "d_rounds")]
    pub rounds: u32,
    #[serde(default = "d_max_moves")]
    pub max_moves: u32,
    #[serde(default = "d_think_time")]
    pub think_time_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            game: defaults::demo_game().into(),
            challenger: defaults::demo_challenger().into(),
            opponent: defaults::demo_opponent().into(),
            seed: defaults::demo_seed(),
            rounds: defaults::demo_rounds(),
            max_moves: defaults::demo_max_moves(),
            think_time_ms: defaults::demo_think_time_ms(),
        }
    }
}
