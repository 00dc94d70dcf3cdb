//! Typed Game trait providing the pure transition interface for engines
//!
//! Engines are stateless: every operation takes a state value and returns a
//! new one. A rejected move never touches the caller's state.

use crate::metadata::GameMetadata;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game families understood by the remote game record.
///
/// Serialized with the exact variant names (`"TicTacToe"`, `"ConnectFour"`)
/// expected by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    TicTacToe,
    ConnectFour,
}

impl GameType {
    /// Every supported game type
    pub const ALL: [GameType; 2] = [GameType::TicTacToe, GameType::ConnectFour];

    /// Short identifier used on the command line and in config files
    pub fn env_id(&self) -> &'static str {
        match self {
            GameType::TicTacToe => "tictactoe",
            GameType::ConnectFour => "connect4",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_id())
    }
}

/// Returned when parsing an unrecognised game identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game '{0}', expected one of: tictactoe, connect4")]
pub struct UnknownGame(pub String);

impl FromStr for GameType {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tictactoe" | "tic-tac-toe" => Ok(GameType::TicTacToe),
            "connect4" | "connectfour" | "connect-four" => Ok(GameType::ConnectFour),
            _ => Err(UnknownGame(s.to_string())),
        }
    }
}

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Draw,
}

impl GameStatus {
    /// Terminal states accept no further moves
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// Seat of a participant. The first seat always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

/// A player's mark on the board (X/O, Red/Yellow)
pub trait Side: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    fn seat(self) -> Seat;

    fn from_seat(seat: Seat) -> Self;

    /// Single character used when rendering boards as text
    fn symbol(self) -> char;

    fn opponent(self) -> Self {
        Self::from_seat(self.seat().other())
    }
}

/// Main trait for game implementations
///
/// # Type Parameters
///
/// * `State` - Immutable game state value, serializable for the wire codec
/// * `Side` - Mark owned by each seat
///
/// Positions are plain indices whose meaning is game specific (cell index
/// for grid games, column index for drop games).
pub trait Game: Send + Sync + fmt::Debug + 'static {
    /// Game state type - a self-contained value, cloned on every transition
    type State: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Mark type placed on the board
    type Side: Side;

    /// Remote identifier of this game
    const GAME_TYPE: GameType;

    /// Get game metadata for UI and configuration
    fn metadata() -> GameMetadata;

    /// Fresh game: empty board, first seat to move, empty history
    fn create_initial() -> Self::State;

    /// Attempt a move, returning `None` when it is not allowed.
    fn try_move(state: &Self::State, position: usize) -> Option<Self::State>;

    /// Apply a move, returning an unchanged copy of `state` when the move is
    /// rejected.
    fn apply_move(state: &Self::State, position: usize) -> Self::State {
        Self::try_move(state, position).unwrap_or_else(|| state.clone())
    }

    /// Positions that `try_move` would currently accept
    fn legal_moves(state: &Self::State) -> Vec<usize>;

    fn status(state: &Self::State) -> GameStatus;

    fn current_player(state: &Self::State) -> Self::Side;

    fn winner(state: &Self::State) -> Option<Self::Side>;

    fn move_history(state: &Self::State) -> &[usize];

    /// Check every structural invariant of a state that was not produced by
    /// this engine (e.g. decoded from a remote payload).
    fn validate(state: &Self::State) -> Result<(), StateError>;
}

/// Invariant violations detected by `Game::validate`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("status {status:?} is inconsistent with winner presence ({has_winner})")]
    WinnerMismatch { status: GameStatus, has_winner: bool },
    #[error("winner is not the player who made the last move")]
    WrongWinner,
    #[error("move history has {history} entries but {occupied} cells are occupied")]
    HistoryMismatch { history: usize, occupied: usize },
    #[error("move index {index} out of range (limit {limit})")]
    MoveOutOfRange { index: usize, limit: usize },
    #[error("move history entry {index} does not reference a distinct occupied cell")]
    HistoryOccupancy { index: usize },
    #[error("mark counts {first}/{second} do not match the player to move")]
    TurnMismatch { first: usize, second: usize },
    #[error("status {status:?} is inconsistent with {empty} empty cells")]
    StatusMismatch { status: GameStatus, empty: usize },
    #[error("column {column} has a disc above an empty cell")]
    FloatingDisc { column: usize },
    #[error("column {column} holds {height} discs but history drops {history} there")]
    ColumnMismatch {
        column: usize,
        height: usize,
        history: usize,
    },
}
