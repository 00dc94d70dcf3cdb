//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so every binary and test
//! sees the same values without touching the filesystem.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    sync: SyncDefaults,
    demo: DemoDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct SyncDefaults {
    poll_interval_ms: u64,
    request_timeout_ms: u64,
    notice_capacity: usize,
}

#[derive(Debug, Deserialize)]
struct DemoDefaults {
    game: String,
    challenger: String,
    opponent: String,
    seed: u64,
    rounds: u32,
    max_moves: u32,
    think_time_ms: u64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Sync
pub fn poll_interval_ms() -> u64 {
    DEFAULTS.sync.poll_interval_ms
}
pub fn request_timeout_ms() -> u64 {
    DEFAULTS.sync.request_timeout_ms
}
pub fn notice_capacity() -> usize {
    DEFAULTS.sync.notice_capacity
}

// Demo
pub fn demo_game() -> &'static str {
    &DEFAULTS.demo.game
}
pub fn demo_challenger() -> &'static str {
    &DEFAULTS.demo.challenger
}
pub fn demo_opponent() -> &'static str {
    &DEFAULTS.demo.opponent
}
pub fn demo_seed() -> u64 {
    DEFAULTS.demo.seed
}
pub fn demo_rounds() -> u32 {
    DEFAULTS.demo.rounds
}
pub fn demo_max_moves() -> u32 {
    DEFAULTS.demo.max_moves
}
pub fn demo_think_time_ms() -> u64 {
    DEFAULTS.demo.think_time_ms
}
