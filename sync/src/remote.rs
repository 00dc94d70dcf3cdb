//! Boundary to the remote game store.
//!
//! The store keeps one record per pair of players and never interprets the
//! `state` payload. Every call is scoped to the caller whose identity the
//! store handle was bound to.

use async_trait::async_trait;
use engine_core::{GameType, Seat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque principal identifying a player
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Shared game record as stored remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteGameRecord {
    pub game_type: GameType,
    /// Codec output, opaque to the store
    pub state: String,
    pub current_turn: PlayerId,
    /// Holds the first seat and opens the game
    pub player1: PlayerId,
    pub player2: PlayerId,
    #[serde(default)]
    pub winner: Option<PlayerId>,
}

impl RemoteGameRecord {
    /// Seat held by `player`, `None` for outsiders
    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        if *player == self.player1 {
            Some(Seat::First)
        } else if *player == self.player2 {
            Some(Seat::Second)
        } else {
            None
        }
    }

    pub fn player_at(&self, seat: Seat) -> &PlayerId {
        match seat {
            Seat::First => &self.player1,
            Seat::Second => &self.player2,
        }
    }

    /// The participant facing `player`
    pub fn other_player(&self, player: &PlayerId) -> Option<&PlayerId> {
        self.seat_of(player).map(|seat| self.player_at(seat.other()))
    }
}

/// Pending proposal to play a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub challenger: PlayerId,
    pub opponent: PlayerId,
    pub game_type: GameType,
}

/// Failures reaching or using the remote store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("remote store rejected the call: {0}")]
    Rejected(String),
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

/// Caller-scoped client of the remote game store.
///
/// The store performs no rule checks: `update_state` overwrites the record
/// unconditionally. Turn order and move legality are enforced by callers.
#[async_trait]
pub trait RemoteGameStore: Send + Sync {
    /// Identity every call is made as
    fn caller(&self) -> &PlayerId;

    /// Open a challenge against `opponent`
    async fn create_challenge(
        &self,
        opponent: &PlayerId,
        game_type: GameType,
    ) -> Result<(), TransportError>;

    /// Accept the pending challenge from `challenger`, creating a fresh game
    /// with the challenger in the first seat
    async fn accept_challenge(&self, challenger: &PlayerId) -> Result<(), TransportError>;

    /// Record of the game between the caller and `opponent`
    async fn query_state(
        &self,
        opponent: &PlayerId,
    ) -> Result<Option<RemoteGameRecord>, TransportError>;

    /// Replace the serialized state of the game with `opponent`
    async fn update_state(&self, opponent: &PlayerId, state: String)
        -> Result<(), TransportError>;

    async fn set_winner(&self, opponent: &PlayerId, winner: &PlayerId)
        -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RemoteGameRecord {
        RemoteGameRecord {
            game_type: GameType::ConnectFour,
            state: "{}".to_string(),
            current_turn: "alice".into(),
            player1: "alice".into(),
            player2: "bob".into(),
            winner: None,
        }
    }

    #[test]
    fn test_seats() {
        let record = record();
        assert_eq!(record.seat_of(&"alice".into()), Some(Seat::First));
        assert_eq!(record.seat_of(&"bob".into()), Some(Seat::Second));
        assert_eq!(record.seat_of(&"carol".into()), None);
        assert_eq!(record.player_at(Seat::Second).as_str(), "bob");
        assert_eq!(
            record.other_player(&"bob".into()),
            Some(&PlayerId::from("alice"))
        );
        assert_eq!(record.other_player(&"carol".into()), None);
    }

    #[test]
    fn test_record_wire_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["gameType"], "ConnectFour");
        assert_eq!(json["currentTurn"], "alice");
        assert_eq!(json["player1"], "alice");
        assert!(json["winner"].is_null());

        let parsed: RemoteGameRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record());
    }

    #[test]
    fn test_missing_winner_defaults_to_none() {
        let json = r#"{"gameType":"TicTacToe","state":"","currentTurn":"a","player1":"a","player2":"b"}"#;
        let parsed: RemoteGameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.winner, None);
    }
}
