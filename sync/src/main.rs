//! game-sync - Two-player match over a shared game store
//!
//! Runs a complete match between two simulated clients:
//! 1. The challenger opens a challenge, the opponent accepts it
//! 2. Each client polls the store for the other side's moves
//! 3. Whoever holds the turn plays a seeded random legal move
//! 4. Finished rounds are recorded and the board is reset for the next one

use anyhow::Result;
use clap::Parser;
use game_sync::ViewScope;
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

mod config;
mod demo;

use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn print_games() {
    for metadata in engine_games::all_metadata() {
        println!(
            "{:<10} {} ({}x{} {} board, players {})",
            metadata.game_type.env_id(),
            metadata.display_name,
            metadata.board_width,
            metadata.board_height,
            metadata.layout,
            metadata.player_names.join(" vs ")
        );
        println!("           {}", metadata.description);
    }
}

/// Cancel `scope` once `signal` fires. If the signal cannot be listened
/// for the match keeps running.
fn spawn_shutdown<F>(scope: Arc<ViewScope>, signal: F) -> JoinHandle<()>
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = signal.await {
            error!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        info!("Shutdown signal received, stopping match...");
        scope.cancel();
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    if config.list_games {
        print_games();
        return Ok(());
    }

    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    // Setup graceful shutdown
    let scope = Arc::new(ViewScope::new());
    let shutdown_handle = spawn_shutdown(Arc::clone(&scope), signal::ctrl_c());

    let result = demo::run(&config, scope.token()).await;
    shutdown_handle.abort();

    match result {
        Ok(report) => {
            for (round, outcome) in report.rounds.iter().enumerate() {
                info!("Round {}: {}", round + 1, outcome);
            }
            info!(
                moves = report.moves,
                interrupted = report.interrupted,
                "Match finished"
            );
            Ok(())
        }
        Err(e) => {
            error!("Match failed: {:#}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_signal_cancels_match() {
        let scope = Arc::new(ViewScope::new());
        spawn_shutdown(Arc::clone(&scope), async { Ok(()) })
            .await
            .unwrap();
        assert!(scope.is_cancelled());
    }

    #[tokio::test]
    async fn failed_signal_listener_keeps_match_running() {
        let scope = Arc::new(ViewScope::new());
        spawn_shutdown(Arc::clone(&scope), async {
            Err(io::Error::new(io::ErrorKind::Other, "no signal handler"))
        })
        .await
        .unwrap();
        assert!(!scope.is_cancelled());
    }
}
