//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "NEXUS_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from subdirectory)
    "/app/config.toml", // Docker container
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by NEXUS_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Docker container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_VAR,
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// An unreadable or unparsable file is logged and replaced by the built-in
/// defaults; environment overrides are applied either way.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, usize, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparsable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: NEXUS_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "NEXUS_COMMON_LOG_LEVEL");

    // Sync
    env_override!(
        config,
        sync.poll_interval_ms,
        "NEXUS_SYNC_POLL_INTERVAL_MS",
        parse
    );
    env_override!(
        config,
        sync.request_timeout_ms,
        "NEXUS_SYNC_REQUEST_TIMEOUT_MS",
        parse
    );
    env_override!(
        config,
        sync.notice_capacity,
        "NEXUS_SYNC_NOTICE_CAPACITY",
        parse
    );

    // Demo
    env_override!(config, demo.game, "NEXUS_DEMO_GAME");
    env_override!(config, demo.challenger, "NEXUS_DEMO_CHALLENGER");
    env_override!(config, demo.opponent, "NEXUS_DEMO_OPPONENT");
    env_override!(config, demo.seed, "NEXUS_DEMO_SEED", parse);
    env_override!(config, demo.rounds, "NEXUS_DEMO_ROUNDS", parse);
    env_override!(config, demo.max_moves, "NEXUS_DEMO_MAX_MOVES", parse);
    env_override!(
        config,
        demo.think_time_ms,
        "NEXUS_DEMO_THINK_TIME_MS",
        parse
    );

    config
}
