//! Tic-Tac-Toe engine
//!
//! Pure state transitions for the classic 3x3 game. X always opens.
//!
//! # Board Layout
//!
//! Cells are stored in row-major order:
//! ```text
//! [0][1][2]
//! [3][4][5]
//! [6][7][8]
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::{Player, State};
//! use engine_core::GameStatus;
//!
//! let state = State::new()
//!     .apply_move(0) // X
//!     .apply_move(4) // O
//!     .apply_move(1) // X
//!     .apply_move(5) // O
//!     .apply_move(2); // X completes the top row
//!
//! assert_eq!(state.status(), GameStatus::Won);
//! assert_eq!(state.winner(), Some(Player::X));
//! ```

use engine_core::game_utils::{render_rows, validate_common};
use engine_core::{Game, GameMetadata, GameStatus, GameType, Seat, Side, StateError};
use serde::{Deserialize, Serialize};

/// Number of cells on the board
pub const BOARD_SIZE: usize = 9;

/// The 8 lines that win the game: rows, columns, diagonals
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Tic-Tac-Toe marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Side for Player {
    fn seat(self) -> Seat {
        match self {
            Player::X => Seat::First,
            Player::O => Seat::Second,
        }
    }

    fn from_seat(seat: Seat) -> Self {
        match seat {
            Seat::First => Player::X,
            Seat::Second => Player::O,
        }
    }

    fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

/// A board cell: empty or owned by a player
pub type Cell = Option<Player>;

/// Tic-Tac-Toe game state
///
/// Represents the complete state of a game including the board, player to
/// move, outcome and the ordered list of filled cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    board: [Cell; BOARD_SIZE],
    current_player: Player,
    status: GameStatus,
    winner: Option<Player>,
    move_history: Vec<usize>,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [None; BOARD_SIZE],
            current_player: Player::X, // X goes first
            status: GameStatus::Playing,
            winner: None,
            move_history: Vec::new(),
        }
    }

    pub fn board(&self) -> &[Cell; BOARD_SIZE] {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn move_history(&self) -> &[usize] {
        &self.move_history
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_done() {
            return Vec::new();
        }

        (0..BOARD_SIZE)
            .filter(|&pos| self.board[pos].is_none())
            .collect()
    }

    /// Place the current player's mark at `position`.
    ///
    /// Returns `None` when the game is over, the index is off the board or
    /// the cell is taken.
    pub fn try_move(&self, position: usize) -> Option<State> {
        if self.is_done() || position >= BOARD_SIZE || self.board[position].is_some() {
            return None;
        }

        let mut next = self.clone();
        next.board[position] = Some(self.current_player);
        next.move_history.push(position);
        next.current_player = self.current_player.opponent();

        if let Some(winner) = next.winner_through(position) {
            next.status = GameStatus::Won;
            next.winner = Some(winner);
        } else if next.board.iter().all(Option::is_some) {
            next.status = GameStatus::Draw;
        }

        Some(next)
    }

    /// Place a mark, returning an unchanged copy when the move is invalid
    pub fn apply_move(&self, position: usize) -> State {
        self.try_move(position).unwrap_or_else(|| self.clone())
    }

    /// Owner of a completed line passing through `position`, if any.
    ///
    /// Only lines containing the given cell are inspected, so a win can only
    /// be registered by the move that completes it.
    fn winner_through(&self, position: usize) -> Option<Player> {
        let owner = self.board[position]?;
        LINES
            .iter()
            .filter(|line| line.contains(&position))
            .any(|line| line.iter().all(|&cell| self.board[cell] == Some(owner)))
            .then_some(owner)
    }

    /// Check every invariant of a state that did not come from `try_move`
    pub fn validate(&self) -> Result<(), StateError> {
        validate_common(
            self.board.iter().copied(),
            self.current_player,
            self.status,
            self.winner,
            self.move_history.len(),
        )?;

        let mut seen = [false; BOARD_SIZE];
        for &index in &self.move_history {
            if index >= BOARD_SIZE {
                return Err(StateError::MoveOutOfRange {
                    index,
                    limit: BOARD_SIZE,
                });
            }
            if seen[index] || self.board[index].is_none() {
                return Err(StateError::HistoryOccupancy { index });
            }
            seen[index] = true;
        }

        Ok(())
    }

    /// Text rendering, one row per line
    pub fn render(&self) -> String {
        render_rows(self.board.chunks(3))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Tic-Tac-Toe engine
#[derive(Debug, Default)]
pub struct TicTacToe;

impl Game for TicTacToe {
    type State = State;
    type Side = Player;

    const GAME_TYPE: GameType = GameType::TicTacToe;

    fn metadata() -> GameMetadata {
        GameMetadata::new(GameType::TicTacToe, "Tic-Tac-Toe")
            .with_board(3, 3)
            .with_actions(BOARD_SIZE)
            .with_players([("X", 'X'), ("O", 'O')])
            .with_description("Classic 3x3 grid game. Get three in a row to win!")
    }

    fn create_initial() -> State {
        State::new()
    }

    fn try_move(state: &State, position: usize) -> Option<State> {
        state.try_move(position)
    }

    fn legal_moves(state: &State) -> Vec<usize> {
        state.legal_moves()
    }

    fn status(state: &State) -> GameStatus {
        state.status
    }

    fn current_player(state: &State) -> Player {
        state.current_player
    }

    fn winner(state: &State) -> Option<Player> {
        state.winner
    }

    fn move_history(state: &State) -> &[usize] {
        &state.move_history
    }

    fn validate(state: &State) -> Result<(), StateError> {
        state.validate()
    }
}

#[cfg(test)]
mod tests;
