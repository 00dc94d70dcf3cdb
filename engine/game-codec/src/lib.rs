//! Wire codec for game states
//!
//! States travel through the remote store as opaque JSON strings:
//!
//! ```text
//! {"board":[...],"currentPlayer":"X","status":"playing","winner":null,"moveHistory":[4]}
//! ```
//!
//! Encoding is lossless and deterministic. Decoding is strict: a payload
//! must parse, have the exact shape of the game's state and satisfy every
//! invariant checked by [`Game::validate`]. Anything else is reported as a
//! [`CodecError`] and never reaches an engine.

use engine_core::{Game, GameType, StateError};
use engine_games::AnyGameState;
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use serde_json::error::Category;
use thiserror::Error;
use tracing::warn;

/// Errors produced while encoding or decoding a game state payload
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("payload is not valid JSON: {0}")]
    Unparsable(String),
    #[error("payload does not describe a {game} state: {reason}")]
    Malformed { game: GameType, reason: String },
    #[error("decoded state is inconsistent: {0}")]
    Inconsistent(#[from] StateError),
    #[error("failed to encode game state: {0}")]
    Encode(String),
}

impl CodecError {
    fn from_json(game: GameType, err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => CodecError::Malformed {
                game,
                reason: err.to_string(),
            },
            Category::Syntax | Category::Eof | Category::Io => {
                CodecError::Unparsable(err.to_string())
            }
        }
    }
}

/// Encode a single engine's state
pub fn encode<G: Game>(state: &G::State) -> Result<String, CodecError> {
    serde_json::to_string(state).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode and validate a single engine's state
pub fn decode<G: Game>(payload: &str) -> Result<G::State, CodecError> {
    let result = serde_json::from_str::<G::State>(payload)
        .map_err(|e| CodecError::from_json(G::GAME_TYPE, e))
        .and_then(|state| {
            G::validate(&state)?;
            Ok(state)
        });

    if let Err(ref err) = result {
        let game = G::GAME_TYPE;
        warn!(%game, error = %err, "Rejected game state payload");
    }
    result
}

/// Encode a state of any game type
pub fn serialize(state: &AnyGameState) -> Result<String, CodecError> {
    match state {
        AnyGameState::TicTacToe(s) => encode::<TicTacToe>(s),
        AnyGameState::ConnectFour(s) => encode::<Connect4>(s),
    }
}

/// Decode a payload as a state of `game_type`
pub fn deserialize(game_type: GameType, payload: &str) -> Result<AnyGameState, CodecError> {
    match game_type {
        GameType::TicTacToe => decode::<TicTacToe>(payload).map(AnyGameState::TicTacToe),
        GameType::ConnectFour => decode::<Connect4>(payload).map(AnyGameState::ConnectFour),
    }
}

pub fn serialize_tictactoe(state: &games_tictactoe::State) -> Result<String, CodecError> {
    encode::<TicTacToe>(state)
}

pub fn deserialize_tictactoe(payload: &str) -> Result<games_tictactoe::State, CodecError> {
    decode::<TicTacToe>(payload)
}

pub fn serialize_connect4(state: &games_connect4::State) -> Result<String, CodecError> {
    encode::<Connect4>(state)
}

pub fn deserialize_connect4(payload: &str) -> Result<games_connect4::State, CodecError> {
    decode::<Connect4>(payload)
}
