//! In-process remote game store.
//!
//! `MemoryBackend` holds every record and challenge; `connect` hands out a
//! handle bound to one caller, the way the identity layer binds a principal
//! to each remote call. Faults can be injected to exercise transport
//! failure handling.

use crate::remote::{Challenge, PlayerId, RemoteGameRecord, RemoteGameStore, TransportError};
use async_trait::async_trait;
use engine_core::GameType;
use engine_games::AnyGameState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// Games are shared by both participants regardless of who asks
type PairKey = (PlayerId, PlayerId);

fn pair_key(a: &PlayerId, b: &PlayerId) -> PairKey {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

#[derive(Debug, Default)]
struct Faults {
    offline: bool,
    fail_next: u32,
    latency: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    games: HashMap<PairKey, RemoteGameRecord>,
    /// Keyed by (challenger, opponent)
    challenges: HashMap<PairKey, GameType>,
    faults: Faults,
    calls: u64,
}

/// Shared in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle whose calls are made as `caller`
    pub fn connect(&self, caller: impl Into<PlayerId>) -> MemoryStore {
        MemoryStore {
            backend: self.clone(),
            caller: caller.into(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every call fail until switched back
    pub fn set_offline(&self, offline: bool) {
        self.lock().faults.offline = offline;
    }

    /// Fail the next `count` calls
    pub fn fail_next(&self, count: u32) {
        self.lock().faults.fail_next = count;
    }

    /// Delay applied to every call before it is served
    pub fn set_latency(&self, latency: Duration) {
        self.lock().faults.latency = latency;
    }

    /// Calls received so far, failed ones included
    pub fn calls(&self) -> u64 {
        self.lock().calls
    }

    /// Record between two players, bypassing fault injection
    pub fn record(&self, a: &PlayerId, b: &PlayerId) -> Option<RemoteGameRecord> {
        self.lock().games.get(&pair_key(a, b)).cloned()
    }

    pub fn pending_challenges(&self) -> Vec<Challenge> {
        let mut pending: Vec<Challenge> = self
            .lock()
            .challenges
            .iter()
            .map(|((challenger, opponent), game_type)| Challenge {
                challenger: challenger.clone(),
                opponent: opponent.clone(),
                game_type: *game_type,
            })
            .collect();
        pending.sort_by(|a, b| (&a.challenger, &a.opponent).cmp(&(&b.challenger, &b.opponent)));
        pending
    }

    /// Count the call, wait out the configured latency and apply faults
    async fn enter(&self) -> Result<(), TransportError> {
        let latency = {
            let mut inner = self.lock();
            inner.calls += 1;
            inner.faults.latency
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut inner = self.lock();
        if inner.faults.offline {
            return Err(TransportError::Unavailable("store is offline".to_string()));
        }
        if inner.faults.fail_next > 0 {
            inner.faults.fail_next -= 1;
            return Err(TransportError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

/// Caller-bound handle to a [`MemoryBackend`]
#[derive(Debug, Clone)]
pub struct MemoryStore {
    backend: MemoryBackend,
    caller: PlayerId,
}

impl MemoryStore {
    pub fn backend(&self) -> &MemoryBackend {
        &self.backend
    }

    fn no_game(&self, opponent: &PlayerId) -> TransportError {
        TransportError::Rejected(format!("no game between {} and {}", self.caller, opponent))
    }
}

#[async_trait]
impl RemoteGameStore for MemoryStore {
    fn caller(&self) -> &PlayerId {
        &self.caller
    }

    async fn create_challenge(
        &self,
        opponent: &PlayerId,
        game_type: GameType,
    ) -> Result<(), TransportError> {
        self.backend.enter().await?;
        if *opponent == self.caller {
            return Err(TransportError::Rejected(
                "cannot challenge yourself".to_string(),
            ));
        }

        self.backend
            .lock()
            .challenges
            .insert((self.caller.clone(), opponent.clone()), game_type);
        debug!(challenger = %self.caller, %opponent, %game_type, "Challenge created");
        Ok(())
    }

    async fn accept_challenge(&self, challenger: &PlayerId) -> Result<(), TransportError> {
        self.backend.enter().await?;

        let mut inner = self.backend.lock();
        let game_type = inner
            .challenges
            .remove(&(challenger.clone(), self.caller.clone()))
            .ok_or_else(|| {
                TransportError::Rejected(format!("no pending challenge from {}", challenger))
            })?;

        let state = game_codec::serialize(&AnyGameState::create_initial(game_type))
            .map_err(|e| TransportError::Rejected(e.to_string()))?;
        let record = RemoteGameRecord {
            game_type,
            state,
            current_turn: challenger.clone(),
            player1: challenger.clone(),
            player2: self.caller.clone(),
            winner: None,
        };
        inner.games.insert(pair_key(challenger, &self.caller), record);

        info!(%challenger, opponent = %self.caller, %game_type, "Challenge accepted");
        Ok(())
    }

    async fn query_state(
        &self,
        opponent: &PlayerId,
    ) -> Result<Option<RemoteGameRecord>, TransportError> {
        self.backend.enter().await?;
        Ok(self.backend.record(&self.caller, opponent))
    }

    async fn update_state(
        &self,
        opponent: &PlayerId,
        state: String,
    ) -> Result<(), TransportError> {
        self.backend.enter().await?;

        let mut inner = self.backend.lock();
        let record = inner
            .games
            .get_mut(&pair_key(&self.caller, opponent))
            .ok_or_else(|| self.no_game(opponent))?;

        // Bookkeeping only: nothing checks that the caller held the turn
        record.state = state;
        record.current_turn = opponent.clone();
        debug!(caller = %self.caller, %opponent, "Game state overwritten");
        Ok(())
    }

    async fn set_winner(
        &self,
        opponent: &PlayerId,
        winner: &PlayerId,
    ) -> Result<(), TransportError> {
        self.backend.enter().await?;

        let mut inner = self.backend.lock();
        let record = inner
            .games
            .get_mut(&pair_key(&self.caller, opponent))
            .ok_or_else(|| self.no_game(opponent))?;
        record.winner = Some(winner.clone());
        debug!(caller = %self.caller, %opponent, %winner, "Winner recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (PlayerId, PlayerId) {
        (PlayerId::from("alice"), PlayerId::from("bob"))
    }

    async fn started(backend: &MemoryBackend, game_type: GameType) -> (MemoryStore, MemoryStore) {
        let (alice_id, bob_id) = ids();
        let alice = backend.connect(alice_id.clone());
        let bob = backend.connect(bob_id.clone());
        alice.create_challenge(&bob_id, game_type).await.unwrap();
        bob.accept_challenge(&alice_id).await.unwrap();
        (alice, bob)
    }

    #[tokio::test]
    async fn test_accept_seeds_initial_record() {
        let backend = MemoryBackend::new();
        let (alice, bob) = started(&backend, GameType::ConnectFour).await;
        let (alice_id, bob_id) = ids();

        let record = alice.query_state(&bob_id).await.unwrap().unwrap();
        assert_eq!(record.game_type, GameType::ConnectFour);
        assert_eq!(record.player1, alice_id);
        assert_eq!(record.player2, bob_id);
        assert_eq!(record.current_turn, alice_id);
        assert_eq!(record.winner, None);
        assert_eq!(
            game_codec::deserialize(GameType::ConnectFour, &record.state).unwrap(),
            AnyGameState::create_initial(GameType::ConnectFour)
        );

        // Both participants see the same record
        assert_eq!(bob.query_state(&alice_id).await.unwrap(), Some(record));
        assert!(backend.pending_challenges().is_empty());
    }

    #[tokio::test]
    async fn test_pending_challenge_listing() {
        let backend = MemoryBackend::new();
        let (alice_id, bob_id) = ids();
        let alice = backend.connect(alice_id.clone());
        alice
            .create_challenge(&bob_id, GameType::TicTacToe)
            .await
            .unwrap();

        assert_eq!(
            backend.pending_challenges(),
            vec![Challenge {
                challenger: alice_id.clone(),
                opponent: bob_id.clone(),
                game_type: GameType::TicTacToe,
            }]
        );
        assert_eq!(alice.query_state(&bob_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_accept_requires_pending_challenge() {
        let backend = MemoryBackend::new();
        let (alice_id, bob_id) = ids();
        let bob = backend.connect(bob_id);

        let err = bob.accept_challenge(&alice_id).await.unwrap_err();
        assert!(matches!(err, TransportError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_challenge_is_consumed_on_accept() {
        let backend = MemoryBackend::new();
        let (_alice, bob) = started(&backend, GameType::TicTacToe).await;
        let (alice_id, _) = ids();
        assert!(bob.accept_challenge(&alice_id).await.is_err());
    }

    #[tokio::test]
    async fn test_cannot_challenge_self() {
        let backend = MemoryBackend::new();
        let alice = backend.connect("alice");
        let err = alice
            .create_challenge(&"alice".into(), GameType::TicTacToe)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_and_passes_turn() {
        let backend = MemoryBackend::new();
        let (alice, bob) = started(&backend, GameType::TicTacToe).await;
        let (alice_id, bob_id) = ids();

        alice
            .update_state(&bob_id, "anything".to_string())
            .await
            .unwrap();
        let record = backend.record(&alice_id, &bob_id).unwrap();
        assert_eq!(record.state, "anything");
        assert_eq!(record.current_turn, bob_id);

        // No turn check: alice may write again
        alice
            .update_state(&bob_id, "again".to_string())
            .await
            .unwrap();
        assert_eq!(backend.record(&bob_id, &alice_id).unwrap().state, "again");

        bob.set_winner(&alice_id, &alice_id).await.unwrap();
        assert_eq!(
            backend.record(&alice_id, &bob_id).unwrap().winner,
            Some(alice_id)
        );
    }

    #[tokio::test]
    async fn test_update_without_game_is_rejected() {
        let backend = MemoryBackend::new();
        let alice = backend.connect("alice");
        let err = alice
            .update_state(&"bob".into(), String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_fail_next_then_recover() {
        let backend = MemoryBackend::new();
        let alice = backend.connect("alice");
        backend.fail_next(2);

        for _ in 0..2 {
            assert!(matches!(
                alice.query_state(&"bob".into()).await,
                Err(TransportError::Unavailable(_))
            ));
        }
        assert_eq!(alice.query_state(&"bob".into()).await, Ok(None));
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_offline_switch() {
        let backend = MemoryBackend::new();
        let alice = backend.connect("alice");

        backend.set_offline(true);
        assert!(alice.query_state(&"bob".into()).await.is_err());
        backend.set_offline(false);
        assert!(alice.query_state(&"bob".into()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let backend = MemoryBackend::new();
        let alice = backend.connect("alice");
        backend.set_latency(Duration::from_secs(3));

        let start = tokio::time::Instant::now();
        alice.query_state(&"bob".into()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
