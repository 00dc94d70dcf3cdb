//! Client-side orchestration of a game against one opponent.
//!
//! The remote store enforces nothing, so every rule lives here: a move is
//! written only when the caller holds the turn and the engine accepts it.
//! Each successful write invalidates and refetches the cached record so the
//! caller always reads its own write.

use crate::cache::{Cached, GameCache};
use crate::notify::{Notice, NotificationSink};
use crate::remote::{PlayerId, RemoteGameStore, TransportError};
use crate::scope::CancelToken;
use crate::snapshot::GameSnapshot;
use engine_core::{GameStatus, GameType};
use engine_games::AnyGameState;
use game_codec::CodecError;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("call cancelled")]
    Cancelled,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("no game with {0}")]
    NoActiveGame(PlayerId),
    #[error("game with {0} is still in progress")]
    GameInProgress(PlayerId),
}

/// Why a move was not sent to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoGame,
    NotParticipant,
    NotYourTurn,
    /// The stored state could not be decoded; reset the game first
    Corrupted,
    InvalidMove,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::NoGame => "no active game",
            Rejection::NotParticipant => "not a participant",
            Rejection::NotYourTurn => "not your turn",
            Rejection::Corrupted => "stored state is corrupted",
            Rejection::InvalidMove => "move rejected by the engine",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Ignored(Rejection),
    Applied(GameSnapshot),
}

#[derive(Clone)]
pub struct GameClient {
    store: Arc<dyn RemoteGameStore>,
    cache: GameCache,
    sink: Arc<dyn NotificationSink>,
    request_timeout: Duration,
    /// Corrupted payloads already reported, per opponent
    reported: Arc<Mutex<HashSet<(PlayerId, String)>>>,
}

impl GameClient {
    pub fn new(
        store: Arc<dyn RemoteGameStore>,
        sink: Arc<dyn NotificationSink>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache: GameCache::new(),
            sink,
            request_timeout,
            reported: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn caller(&self) -> &PlayerId {
        self.store.caller()
    }

    pub fn cache(&self) -> &GameCache {
        &self.cache
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.sink.notify(notice);
    }

    /// Run one remote call under the request timeout and the view's token
    async fn call<T, F>(&self, token: &CancelToken, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        let timeout = self.request_timeout;
        match token.run(tokio::time::timeout(timeout, fut)).await {
            None => Err(ClientError::Cancelled),
            Some(Err(_)) => Err(TransportError::Timeout(timeout).into()),
            Some(Ok(result)) => Ok(result?),
        }
    }

    /// Surface transport failures as an error notice
    fn report<T>(&self, action: &str, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(ClientError::Transport(e)) = &result {
            warn!(caller = %self.caller(), action, error = %e, "Remote call failed");
            self.notify(Notice::error(format!("Could not {}: {}", action, e)));
        }
        result
    }

    pub async fn challenge(
        &self,
        opponent: &PlayerId,
        game_type: GameType,
        token: &CancelToken,
    ) -> Result<(), ClientError> {
        let result = self
            .call(token, self.store.create_challenge(opponent, game_type))
            .await;
        self.report("send challenge", result)?;
        self.cache.invalidate(opponent).await;
        info!(caller = %self.caller(), %opponent, %game_type, "Challenge sent");
        Ok(())
    }

    pub async fn accept(&self, challenger: &PlayerId, token: &CancelToken) -> Result<(), ClientError> {
        let result = self.call(token, self.store.accept_challenge(challenger)).await;
        self.report("accept challenge", result)?;
        self.cache.invalidate(challenger).await;
        info!(caller = %self.caller(), %challenger, "Challenge accepted");
        Ok(())
    }

    /// Fetch the record from the store and update the cache.
    ///
    /// When a newer fetch already landed in the cache that result is
    /// returned instead. Failures are returned without a notice; the poller
    /// decides how to surface them.
    pub async fn refresh(
        &self,
        opponent: &PlayerId,
        token: &CancelToken,
    ) -> Result<Option<GameSnapshot>, ClientError> {
        let ticket = self.cache.ticket();
        let record = self.call(token, self.store.query_state(opponent)).await?;

        if !self.cache.put(opponent, record.clone(), ticket).await {
            debug!(%opponent, ticket, "Discarding out-of-order fetch");
        }
        let entry = self.cache.get(opponent).await.unwrap_or(Cached {
            record,
            revision: ticket,
            stale: false,
        });
        match self.decode(opponent, entry) {
            Some(snapshot) => Ok(Some(self.settle_winner(opponent, snapshot, token).await?)),
            None => Ok(None),
        }
    }

    /// Record the caller as winner when the stored state says so but the
    /// record does not, as left behind by a view closed mid-move
    async fn settle_winner(
        &self,
        opponent: &PlayerId,
        mut snapshot: GameSnapshot,
        token: &CancelToken,
    ) -> Result<GameSnapshot, ClientError> {
        if snapshot.record.winner.is_some() || snapshot.winner_id() != Some(self.caller()) {
            return Ok(snapshot);
        }
        let winner = self.caller().clone();
        match self.call(token, self.store.set_winner(opponent, &winner)).await {
            Ok(()) => {
                info!(%winner, %opponent, "Recorded missing winner");
                self.cache.invalidate(opponent).await;
                snapshot.record.winner = Some(winner);
            }
            Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
            Err(e) => debug!(%opponent, error = %e, "Winner still unrecorded"),
        }
        Ok(snapshot)
    }

    /// Read-through view of the game with `opponent`
    pub async fn snapshot(
        &self,
        opponent: &PlayerId,
        token: &CancelToken,
    ) -> Result<Option<GameSnapshot>, ClientError> {
        match self.cache.get(opponent).await {
            Some(entry) if !entry.stale => Ok(self.decode(opponent, entry)),
            _ => {
                let result = self.refresh(opponent, token).await;
                self.report("load game", result)
            }
        }
    }

    fn decode(&self, opponent: &PlayerId, entry: Cached) -> Option<GameSnapshot> {
        let snapshot = GameSnapshot::from_record(entry.record?, entry.revision);
        let mut reported = self.reported.lock().unwrap_or_else(PoisonError::into_inner);
        if !snapshot.corrupted {
            reported.retain(|(player, _)| player != opponent);
        } else {
            let key = (opponent.clone(), snapshot.record.state.clone());
            if reported.insert(key) {
                self.notify(Notice::warning(format!(
                    "The game with {} could not be read and was shown from the start",
                    opponent
                )));
            }
        }
        Some(snapshot)
    }

    /// Play `position` in the game with `opponent`
    pub async fn play(
        &self,
        opponent: &PlayerId,
        position: usize,
        token: &CancelToken,
    ) -> Result<MoveOutcome, ClientError> {
        let Some(snapshot) = self.snapshot(opponent, token).await? else {
            return Ok(self.ignore(opponent, position, Rejection::NoGame));
        };
        let Some(seat) = snapshot.seat_of(self.caller()) else {
            return Ok(self.ignore(opponent, position, Rejection::NotParticipant));
        };
        if snapshot.corrupted {
            return Ok(self.ignore(opponent, position, Rejection::Corrupted));
        }
        if !snapshot.state.is_done() && snapshot.state.current_seat() != seat {
            return Ok(self.ignore(opponent, position, Rejection::NotYourTurn));
        }
        let Some(next) = snapshot.state.try_move(position) else {
            return Ok(self.ignore(opponent, position, Rejection::InvalidMove));
        };

        let payload = game_codec::serialize(&next)?;
        let result = self
            .call(token, self.store.update_state(opponent, payload.clone()))
            .await;
        self.report("send move", result)?;
        debug!(caller = %self.caller(), %opponent, position, "Move written");

        if next.status() == GameStatus::Won {
            let winner = snapshot.record.player_at(seat).clone();
            let result = self
                .call(token, self.store.set_winner(opponent, &winner))
                .await;
            // The winning state is already stored. If the winner is not,
            // the next refresh by this caller records it.
            if matches!(result, Err(ClientError::Cancelled)) {
                return Err(ClientError::Cancelled);
            }
            let _ = self.report("record winner", result);
            info!(%winner, %opponent, "Game won");
        }

        self.cache.invalidate(opponent).await;
        match self.snapshot(opponent, token).await {
            Ok(Some(fresh)) => Ok(MoveOutcome::Applied(fresh)),
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            // The write went through; fall back to what was written
            Ok(None) | Err(_) => {
                let mut record = snapshot.record.clone();
                record.state = payload;
                record.current_turn = opponent.clone();
                Ok(MoveOutcome::Applied(GameSnapshot {
                    record,
                    state: next,
                    corrupted: false,
                    revision: snapshot.revision,
                }))
            }
        }
    }

    fn ignore(&self, opponent: &PlayerId, position: usize, reason: Rejection) -> MoveOutcome {
        debug!(caller = %self.caller(), %opponent, position, %reason, "Move ignored");
        MoveOutcome::Ignored(reason)
    }

    /// Start the game with `opponent` over from a fresh board.
    ///
    /// Only a finished or corrupted game can be reset. The check runs
    /// against a fresh fetch so a game the other side already restarted is
    /// not wiped.
    pub async fn reset(
        &self,
        opponent: &PlayerId,
        token: &CancelToken,
    ) -> Result<GameSnapshot, ClientError> {
        let result = self.refresh(opponent, token).await;
        let snapshot = self
            .report("load game", result)?
            .ok_or_else(|| ClientError::NoActiveGame(opponent.clone()))?;
        if !snapshot.state.is_done() && !snapshot.corrupted {
            debug!(caller = %self.caller(), %opponent, "Reset refused mid-game");
            return Err(ClientError::GameInProgress(opponent.clone()));
        }

        let fresh = AnyGameState::create_initial(snapshot.record.game_type);
        let payload = game_codec::serialize(&fresh)?;
        let result = self
            .call(token, self.store.update_state(opponent, payload))
            .await;
        self.report("reset game", result)?;
        info!(caller = %self.caller(), %opponent, "Game reset");

        self.cache.invalidate(opponent).await;
        self.snapshot(opponent, token)
            .await?
            .ok_or_else(|| ClientError::NoActiveGame(opponent.clone()))
    }
}
