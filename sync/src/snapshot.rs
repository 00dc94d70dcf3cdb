//! Decoded view of a remote game record.

use crate::remote::{PlayerId, RemoteGameRecord};
use engine_core::{GameStatus, Seat};
use engine_games::AnyGameState;
use tracing::warn;

/// A remote record together with its decoded state.
///
/// A payload that fails to decode is replaced by a fresh initial state for
/// the record's game type and the snapshot is flagged `corrupted`. Callers
/// must not write such a state back without an explicit reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub record: RemoteGameRecord,
    pub state: AnyGameState,
    pub corrupted: bool,
    /// Cache revision the record was read at
    pub revision: u64,
}

impl GameSnapshot {
    pub fn from_record(record: RemoteGameRecord, revision: u64) -> Self {
        match game_codec::deserialize(record.game_type, &record.state) {
            Ok(state) => Self {
                record,
                state,
                corrupted: false,
                revision,
            },
            Err(e) => {
                warn!(
                    game = %record.game_type,
                    player1 = %record.player1,
                    player2 = %record.player2,
                    error = %e,
                    "Substituting initial state for corrupted record"
                );
                Self {
                    state: AnyGameState::create_initial(record.game_type),
                    record,
                    corrupted: true,
                    revision,
                }
            }
        }
    }

    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        self.record.seat_of(player)
    }

    /// Whether the decoded state has `player` to move
    pub fn is_turn_of(&self, player: &PlayerId) -> bool {
        !self.state.is_done() && self.seat_of(player) == Some(self.state.current_seat())
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Winner according to the decoded state
    pub fn winner_id(&self) -> Option<&PlayerId> {
        self.state
            .winner_seat()
            .map(|seat| self.record.player_at(seat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::GameType;

    fn record(state: String) -> RemoteGameRecord {
        RemoteGameRecord {
            game_type: GameType::TicTacToe,
            state,
            current_turn: "alice".into(),
            player1: "alice".into(),
            player2: "bob".into(),
            winner: None,
        }
    }

    #[test]
    fn test_decodes_valid_record() {
        let state = AnyGameState::create_initial(GameType::TicTacToe).apply_move(4);
        let snapshot = GameSnapshot::from_record(record(game_codec::serialize(&state).unwrap()), 3);

        assert!(!snapshot.corrupted);
        assert_eq!(snapshot.state, state);
        assert_eq!(snapshot.revision, 3);
        assert!(snapshot.is_turn_of(&"bob".into()));
        assert!(!snapshot.is_turn_of(&"alice".into()));
        assert!(!snapshot.is_turn_of(&"carol".into()));
    }

    #[test]
    fn test_corrupted_record_gets_initial_state() {
        let snapshot = GameSnapshot::from_record(record("not json".to_string()), 1);

        assert!(snapshot.corrupted);
        assert_eq!(
            snapshot.state,
            AnyGameState::create_initial(GameType::TicTacToe)
        );
        assert_eq!(snapshot.record.state, "not json");
    }

    #[test]
    fn test_winner_comes_from_state() {
        let state = [0, 3, 1, 4, 2]
            .iter()
            .fold(AnyGameState::create_initial(GameType::TicTacToe), |s, &m| {
                s.apply_move(m)
            });
        let snapshot = GameSnapshot::from_record(record(game_codec::serialize(&state).unwrap()), 1);

        assert_eq!(snapshot.status(), GameStatus::Won);
        assert_eq!(snapshot.winner_id(), Some(&PlayerId::from("alice")));
        assert!(!snapshot.is_turn_of(&"bob".into()));
    }
}
