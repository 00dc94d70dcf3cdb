//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the workspace's binaries.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`NEXUS_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! NEXUS_<SECTION>_<KEY>=value
//!
//! Examples:
//!     NEXUS_COMMON_LOG_LEVEL=debug
//!     NEXUS_SYNC_POLL_INTERVAL_MS=1000
//!     NEXUS_DEMO_GAME=connect4
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
