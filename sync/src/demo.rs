//! Two simulated players sharing one in-memory game store.
//!
//! Each player owns a client, a poller and a session, exactly as an
//! interactive front end would. A player only moves when its own session
//! says it holds the turn, so every move it sees from the other side
//! arrives through polling.

use anyhow::{anyhow, Result};
use game_sync::{
    CancelToken, ChannelSink, ClientError, GameClient, GameSnapshot, MemoryBackend, MoveOutcome,
    NotificationSink, PlayerId, PollHandle, Session, SessionAction, SyncScheduler, TracingSink,
    ViewScope,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;

/// How a single round ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundResult {
    Won(PlayerId),
    Draw,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundResult::Won(player) => write!(f, "won by {}", player),
            RoundResult::Draw => f.write_str("draw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchReport {
    pub rounds: Vec<RoundResult>,
    pub moves: u32,
    /// Stopped by the move limit or shutdown before all rounds finished
    pub interrupted: bool,
}

struct Contestant {
    id: PlayerId,
    opponent: PlayerId,
    client: GameClient,
    session: Session,
    poller: PollHandle,
}

impl Contestant {
    fn generation(&self) -> u64 {
        self.session.view().map(|v| v.generation).unwrap_or_default()
    }

    fn show(&mut self, snapshot: GameSnapshot) {
        let generation = self.generation();
        self.session = self.session.reduce(SessionAction::RecordFetched {
            generation,
            snapshot: Some(snapshot),
        });
    }
}

fn client_for(backend: &MemoryBackend, id: &PlayerId, config: &Config) -> GameClient {
    let (sink, mut notices) = ChannelSink::new(config.notice_capacity);
    let player = id.clone();
    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            debug!(%player, "Notice received");
            TracingSink.notify(notice);
        }
    });
    GameClient::new(
        Arc::new(backend.connect(id.clone())),
        Arc::new(sink),
        config.request_timeout(),
    )
}

fn open_view(
    id: PlayerId,
    opponent: PlayerId,
    client: GameClient,
    poll_interval: Duration,
    token: CancelToken,
) -> Contestant {
    let session = Session::new()
        .reduce(SessionAction::SignedIn(id.clone()))
        .reduce(SessionAction::OpponentSelected(opponent.clone()))
        .reduce(SessionAction::ViewOpened);
    let generation = session.view().map(|v| v.generation).unwrap_or_default();
    let poller =
        SyncScheduler::new(client.clone(), poll_interval).spawn(opponent.clone(), generation, token);

    Contestant {
        id,
        opponent,
        client,
        session,
        poller,
    }
}

/// Pick and play a random legal move. Returns false when nothing was played.
async fn take_turn(
    player: &mut Contestant,
    rng: &mut ChaCha20Rng,
    config: &Config,
    token: &CancelToken,
) -> Result<bool, ClientError> {
    let Some(snapshot) = player.session.snapshot() else {
        return Ok(false);
    };
    let legal = snapshot.state.legal_moves();
    let Some(&position) = legal.choose(rng) else {
        return Ok(false);
    };

    if token.run(tokio::time::sleep(config.think_time())).await.is_none() {
        return Err(ClientError::Cancelled);
    }

    match player.client.play(&player.opponent, position, token).await? {
        MoveOutcome::Applied(snapshot) => {
            info!(
                player = %player.id,
                position,
                "Move played\n{}",
                snapshot.state.render()
            );
            player.show(snapshot);
            Ok(true)
        }
        MoveOutcome::Ignored(reason) => {
            debug!(player = %player.id, position, %reason, "Move not played");
            Ok(false)
        }
    }
}

/// Result of the round shown to `player`, if it has ended
fn finished_round(player: &Contestant) -> Option<RoundResult> {
    let snapshot = player.session.snapshot()?;
    if !snapshot.state.is_done() {
        return None;
    }
    Some(match snapshot.winner_id() {
        Some(winner) => RoundResult::Won(winner.clone()),
        None => RoundResult::Draw,
    })
}

/// The per-round cap; zero disables it
fn at_move_limit(config: &Config, round_moves: u32) -> bool {
    config.max_moves > 0 && round_moves >= config.max_moves
}

/// Play the configured match until every round is finished, the move
/// limit is reached or `shutdown` fires
pub async fn run(config: &Config, shutdown: CancelToken) -> Result<MatchReport> {
    let game_type = config.game_type()?;
    let challenger_id = PlayerId::new(config.challenger.clone());
    let opponent_id = PlayerId::new(config.opponent.clone());

    let backend = MemoryBackend::new();
    let challenger_client = client_for(&backend, &challenger_id, config);
    let opponent_client = client_for(&backend, &opponent_id, config);

    let view = Arc::new(ViewScope::new());
    let watcher = {
        let view = Arc::clone(&view);
        tokio::spawn(async move {
            shutdown.cancelled().await;
            view.cancel();
        })
    };
    let token = view.token();

    let mut report = MatchReport::default();
    let outcome: Result<(), ClientError> = async {
        challenger_client
            .challenge(&opponent_id, game_type, &token)
            .await?;
        opponent_client.accept(&challenger_id, &token).await?;

        let mut challenger = open_view(
            challenger_id.clone(),
            opponent_id.clone(),
            challenger_client.clone(),
            config.poll_interval(),
            token.clone(),
        );
        let mut opponent = open_view(
            opponent_id.clone(),
            challenger_id.clone(),
            opponent_client.clone(),
            config.poll_interval(),
            token.clone(),
        );
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

        info!(
            %game_type,
            challenger = %challenger_id,
            opponent = %opponent_id,
            rounds = config.rounds,
            "Match started"
        );

        let result = play_rounds(
            &mut challenger,
            &mut opponent,
            &mut rng,
            config,
            &token,
            &mut report,
        )
        .await;

        challenger.session = challenger.session.reduce(SessionAction::ViewClosed);
        opponent.session = opponent.session.reduce(SessionAction::ViewClosed);
        view.cancel();
        challenger.poller.join().await;
        opponent.poller.join().await;
        result
    }
    .await;

    view.cancel();
    watcher.abort();

    match outcome {
        Ok(()) => Ok(report),
        Err(ClientError::Cancelled) => {
            info!("Match cancelled");
            report.interrupted = true;
            Ok(report)
        }
        Err(e) => Err(anyhow!("match aborted: {}", e)),
    }
}

async fn play_rounds(
    challenger: &mut Contestant,
    opponent: &mut Contestant,
    rng: &mut ChaCha20Rng,
    config: &Config,
    token: &CancelToken,
    report: &mut MatchReport,
) -> Result<(), ClientError> {
    let mut round_moves = 0;
    loop {
        if let Some(result) = finished_round(challenger) {
            info!(round = report.rounds.len() + 1, moves = round_moves, "Round {}", result);
            report.rounds.push(result);
            if report.rounds.len() >= config.rounds as usize {
                return Ok(());
            }
            let fresh = challenger.client.reset(&challenger.opponent, token).await?;
            challenger.show(fresh);
            round_moves = 0;
            continue;
        }

        let challenger_turn = challenger.session.is_my_turn();
        let opponent_turn = opponent.session.is_my_turn();
        if (challenger_turn || opponent_turn) && at_move_limit(config, round_moves) {
            warn!(moves = round_moves, "Move limit reached");
            report.interrupted = true;
            return Ok(());
        }

        let played = if challenger_turn {
            take_turn(challenger, rng, config, token).await?
        } else if opponent_turn {
            take_turn(opponent, rng, config, token).await?
        } else {
            false
        };
        if played {
            round_moves += 1;
            report.moves += 1;
            continue;
        }

        // Nothing to do until a poller reports
        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ClientError::Cancelled),
            Some(event) = challenger.poller.next_event() => {
                challenger.session = challenger.session.reduce(event.into());
            }
            Some(event) = opponent.poller.next_event() => {
                opponent.session = opponent.session.reduce(event.into());
            }
            else => return Err(ClientError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(game: &str, rounds: u32, max_moves: u32) -> Config {
        Config {
            log_level: "info".into(),
            game: game.into(),
            challenger: "alice".into(),
            opponent: "bob".into(),
            seed: 42,
            rounds,
            max_moves,
            think_time_ms: 0,
            poll_interval_ms: 500,
            request_timeout_ms: 1000,
            notice_capacity: 8,
            list_games: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_every_round() {
        let report = run(&config("tictactoe", 2, 0), CancelToken::never())
            .await
            .unwrap();

        assert_eq!(report.rounds.len(), 2);
        assert!(!report.interrupted);
        assert!(report.moves >= 10 && report.moves <= 18);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect4_match_finishes() {
        let report = run(&config("connect4", 1, 0), CancelToken::never())
            .await
            .unwrap();

        assert_eq!(report.rounds.len(), 1);
        assert!(report.moves >= 7 && report.moves <= 42);
        if let RoundResult::Won(winner) = &report.rounds[0] {
            assert!(winner.as_str() == "alice" || winner.as_str() == "bob");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_seed_same_match() {
        let first = run(&config("connect4", 1, 0), CancelToken::never())
            .await
            .unwrap();
        let second = run(&config("connect4", 1, 0), CancelToken::never())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_limit_interrupts() {
        let report = run(&config("connect4", 1, 3), CancelToken::never())
            .await
            .unwrap();

        assert_eq!(report.moves, 3);
        assert!(report.rounds.is_empty());
        assert!(report.interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_limit_counts_each_round() {
        // Every tic-tac-toe round ends within nine moves
        let report = run(&config("tictactoe", 3, 9), CancelToken::never())
            .await
            .unwrap();

        assert_eq!(report.rounds.len(), 3);
        assert!(!report.interrupted);
        assert!(report.moves > 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts() {
        let scope = ViewScope::new();
        scope.cancel();
        let report = run(&config("tictactoe", 1, 0), scope.token()).await.unwrap();

        assert!(report.interrupted);
        assert_eq!(report.moves, 0);
    }

    #[tokio::test]
    async fn test_rejects_unknown_game() {
        assert!(run(&config("go", 1, 0), CancelToken::never()).await.is_err());
    }
}
