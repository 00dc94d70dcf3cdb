//! Type-dispatched game state over every available engine
//!
//! Remote records carry their game type next to an opaque payload, so the
//! sync layer never knows statically which engine it is driving. This crate
//! provides the single place where a [`GameType`] is mapped to an engine.
//!
//! # Usage
//!
//! ```rust
//! use engine_games::AnyGameState;
//! use engine_core::{GameStatus, GameType, Seat};
//!
//! let state = AnyGameState::create_initial(GameType::ConnectFour).apply_move(3);
//! assert_eq!(state.status(), GameStatus::Playing);
//! assert_eq!(state.current_seat(), Seat::Second);
//! ```

use engine_core::{Game, GameMetadata, GameStatus, GameType, Seat, Side, StateError};
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;

pub use games_connect4::State as ConnectFourState;
pub use games_tictactoe::State as TicTacToeState;

/// Run `$body` with `$g` bound to the engine type and `$s` to the inner state
macro_rules! dispatch {
    ($state:expr, |$g:ident, $s:ident| $body:expr) => {
        match $state {
            AnyGameState::TicTacToe($s) => {
                type $g = TicTacToe;
                $body
            }
            AnyGameState::ConnectFour($s) => {
                type $g = Connect4;
                $body
            }
        }
    };
}

/// Game state tagged with its game type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyGameState {
    TicTacToe(TicTacToeState),
    ConnectFour(ConnectFourState),
}

impl AnyGameState {
    /// Fresh game of the given type
    pub fn create_initial(game_type: GameType) -> Self {
        match game_type {
            GameType::TicTacToe => AnyGameState::TicTacToe(TicTacToe::create_initial()),
            GameType::ConnectFour => AnyGameState::ConnectFour(Connect4::create_initial()),
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            AnyGameState::TicTacToe(_) => GameType::TicTacToe,
            AnyGameState::ConnectFour(_) => GameType::ConnectFour,
        }
    }

    /// Attempt a move, `None` when the engine rejects it
    pub fn try_move(&self, position: usize) -> Option<Self> {
        match self {
            AnyGameState::TicTacToe(s) => TicTacToe::try_move(s, position).map(Self::TicTacToe),
            AnyGameState::ConnectFour(s) => Connect4::try_move(s, position).map(Self::ConnectFour),
        }
    }

    /// Apply a move, returning an unchanged copy when it is rejected
    pub fn apply_move(&self, position: usize) -> Self {
        self.try_move(position).unwrap_or_else(|| self.clone())
    }

    pub fn status(&self) -> GameStatus {
        dispatch!(self, |G, s| G::status(s))
    }

    pub fn is_done(&self) -> bool {
        self.status().is_terminal()
    }

    /// Seat of the player to move
    pub fn current_seat(&self) -> Seat {
        dispatch!(self, |G, s| G::current_player(s).seat())
    }

    pub fn winner_seat(&self) -> Option<Seat> {
        dispatch!(self, |G, s| G::winner(s).map(Side::seat))
    }

    pub fn move_history(&self) -> &[usize] {
        dispatch!(self, |G, s| G::move_history(s))
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        dispatch!(self, |G, s| G::legal_moves(s))
    }

    pub fn validate(&self) -> Result<(), StateError> {
        dispatch!(self, |G, s| G::validate(s))
    }

    /// Text rendering of the board
    pub fn render(&self) -> String {
        dispatch!(self, |_G, s| s.render())
    }

    pub fn metadata(&self) -> GameMetadata {
        metadata(self.game_type())
    }
}

impl From<TicTacToeState> for AnyGameState {
    fn from(state: TicTacToeState) -> Self {
        AnyGameState::TicTacToe(state)
    }
}

impl From<ConnectFourState> for AnyGameState {
    fn from(state: ConnectFourState) -> Self {
        AnyGameState::ConnectFour(state)
    }
}

/// Metadata for a single game type
pub fn metadata(game_type: GameType) -> GameMetadata {
    match game_type {
        GameType::TicTacToe => TicTacToe::metadata(),
        GameType::ConnectFour => Connect4::metadata(),
    }
}

/// Metadata for every available game, in `GameType::ALL` order
pub fn all_metadata() -> Vec<GameMetadata> {
    GameType::ALL.into_iter().map(metadata).collect()
}
