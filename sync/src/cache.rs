//! Client-side cache of remote game records, keyed by opponent.
//!
//! Every fetch takes a ticket before it is issued. A result is stored only
//! when its ticket is newer than the revision already held, so a slow
//! response can never overwrite a fresher one. Invalidation marks an entry
//! stale without dropping it.

use crate::remote::{PlayerId, RemoteGameRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached {
    pub record: Option<RemoteGameRecord>,
    /// Ticket of the fetch that produced this entry
    pub revision: u64,
    pub stale: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GameCache {
    entries: Arc<RwLock<HashMap<PlayerId, Cached>>>,
    tickets: Arc<AtomicU64>,
}

impl GameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a revision for a fetch about to be issued
    pub fn ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub async fn get(&self, opponent: &PlayerId) -> Option<Cached> {
        self.entries.read().await.get(opponent).cloned()
    }

    /// Store a fetched record. Returns false when a newer result is held.
    pub async fn put(
        &self,
        opponent: &PlayerId,
        record: Option<RemoteGameRecord>,
        ticket: u64,
    ) -> bool {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.get(opponent) {
            if existing.revision >= ticket {
                return false;
            }
        }
        entries.insert(
            opponent.clone(),
            Cached {
                record,
                revision: ticket,
                stale: false,
            },
        );
        true
    }

    pub async fn invalidate(&self, opponent: &PlayerId) {
        if let Some(entry) = self.entries.write().await.get_mut(opponent) {
            entry.stale = true;
        }
    }

    pub async fn remove(&self, opponent: &PlayerId) {
        self.entries.write().await.remove(opponent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::GameType;

    fn record(state: &str) -> RemoteGameRecord {
        RemoteGameRecord {
            game_type: GameType::TicTacToe,
            state: state.to_string(),
            current_turn: "alice".into(),
            player1: "alice".into(),
            player2: "bob".into(),
            winner: None,
        }
    }

    #[tokio::test]
    async fn test_tickets_increase() {
        let cache = GameCache::new();
        let a = cache.ticket();
        let b = cache.clone().ticket();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_older_result_does_not_overwrite_newer() {
        let cache = GameCache::new();
        let bob = PlayerId::from("bob");
        let slow = cache.ticket();
        let fast = cache.ticket();

        assert!(cache.put(&bob, Some(record("new")), fast).await);
        assert!(!cache.put(&bob, Some(record("old")), slow).await);

        let cached = cache.get(&bob).await.unwrap();
        assert_eq!(cached.record.unwrap().state, "new");
        assert_eq!(cached.revision, fast);
    }

    #[tokio::test]
    async fn test_invalidate_keeps_entry() {
        let cache = GameCache::new();
        let bob = PlayerId::from("bob");
        cache.invalidate(&bob).await;
        assert_eq!(cache.get(&bob).await, None);

        let ticket = cache.ticket();
        cache.put(&bob, None, ticket).await;
        cache.invalidate(&bob).await;
        let cached = cache.get(&bob).await.unwrap();
        assert!(cached.stale);
        assert_eq!(cached.record, None);

        // A fresh fetch clears the flag
        let ticket = cache.ticket();
        cache.put(&bob, Some(record("s")), ticket).await;
        assert!(!cache.get(&bob).await.unwrap().stale);

        cache.remove(&bob).await;
        assert_eq!(cache.get(&bob).await, None);
    }
}
