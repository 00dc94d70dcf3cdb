//! Connect Four engine
//!
//! Two players drop coloured discs into a 7-column, 6-row vertically
//! suspended grid. The first to form a horizontal, vertical or diagonal line
//! of four discs wins. Red always opens.
//!
//! # Board Layout
//!
//! The board is a list of rows with row 0 at the **top**, matching the wire
//! format. A dropped disc settles in the lowest empty row of its column:
//! ```text
//! Row 0: [.][.][.][.][.][.][.]  <- Top
//! Row 1: [.][.][.][.][.][.][.]
//! Row 2: [.][.][.][.][.][.][.]
//! Row 3: [.][.][.][.][.][.][.]
//! Row 4: [.][.][.][.][.][.][.]
//! Row 5: [.][.][.][.][.][.][.]  <- Bottom
//!         0  1  2  3  4  5  6
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::{Disc, State};
//!
//! let state = State::new().apply_move(3);
//! assert_eq!(state.board()[5][3], Some(Disc::Red));
//! assert_eq!(state.current_player(), Disc::Yellow);
//! ```

use engine_core::game_utils::{longest_run, render_rows, validate_common};
use engine_core::{
    BoardLayout, Game, GameMetadata, GameStatus, GameType, Seat, Side, StateError,
};
use serde::{Deserialize, Serialize};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Discs in a line needed to win
pub const CONNECT: usize = 4;

/// Disc colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disc {
    Red,
    Yellow,
}

impl Side for Disc {
    fn seat(self) -> Seat {
        match self {
            Disc::Red => Seat::First,
            Disc::Yellow => Seat::Second,
        }
    }

    fn from_seat(seat: Seat) -> Self {
        match seat {
            Seat::First => Disc::Red,
            Seat::Second => Disc::Yellow,
        }
    }

    fn symbol(self) -> char {
        match self {
            Disc::Red => 'R',
            Disc::Yellow => 'Y',
        }
    }
}

pub type Cell = Option<Disc>;
pub type Board = [[Cell; COLS]; ROWS];

/// Connect Four game state
///
/// `move_history` records the column of every accepted drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    board: Board,
    current_player: Disc,
    status: GameStatus,
    winner: Option<Disc>,
    move_history: Vec<usize>,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [[None; COLS]; ROWS],
            current_player: Disc::Red, // Red goes first
            status: GameStatus::Playing,
            winner: None,
            move_history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Disc {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Disc> {
        self.winner
    }

    pub fn move_history(&self) -> &[usize] {
        &self.move_history
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    /// A column is full once its top cell is occupied
    pub fn is_column_full(&self, column: usize) -> bool {
        self.board[0][column].is_some()
    }

    /// Get legal moves (columns that are not full)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_done() {
            return Vec::new();
        }

        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Lowest empty row in `column`, if any
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.board[row][column].is_none())
    }

    /// Drop the current player's disc into `column`.
    ///
    /// Returns `None` when the game is over, the column is off the board or
    /// the column is full.
    pub fn try_move(&self, column: usize) -> Option<State> {
        if self.is_done() || column >= COLS {
            return None;
        }
        let row = self.landing_row(column)?;

        let mut next = self.clone();
        next.board[row][column] = Some(self.current_player);
        next.move_history.push(column);
        next.current_player = self.current_player.opponent();

        if next.wins_at(row, column) {
            next.status = GameStatus::Won;
            next.winner = Some(self.current_player);
        } else if (0..COLS).all(|col| next.is_column_full(col)) {
            next.status = GameStatus::Draw;
        }

        Some(next)
    }

    /// Drop a disc, returning an unchanged copy when the move is invalid
    pub fn apply_move(&self, column: usize) -> State {
        self.try_move(column).unwrap_or_else(|| self.clone())
    }

    /// Does the disc at `(row, col)` complete a line of four or more?
    fn wins_at(&self, row: usize, col: usize) -> bool {
        let Some(owner) = self.board[row][col] else {
            return false;
        };
        longest_run(ROWS, COLS, row, col, |r, c| self.board[r][c] == Some(owner)) >= CONNECT
    }

    /// Check every invariant of a state that did not come from `try_move`
    pub fn validate(&self) -> Result<(), StateError> {
        validate_common(
            self.board.iter().flatten().copied(),
            self.current_player,
            self.status,
            self.winner,
            self.move_history.len(),
        )?;

        let mut drops = [0usize; COLS];
        for &column in &self.move_history {
            if column >= COLS {
                return Err(StateError::MoveOutOfRange {
                    index: column,
                    limit: COLS,
                });
            }
            drops[column] += 1;
        }

        for (column, &history) in drops.iter().enumerate() {
            // Discs rest on the bottom or on another disc
            if (1..ROWS).any(|row| {
                self.board[row - 1][column].is_some() && self.board[row][column].is_none()
            }) {
                return Err(StateError::FloatingDisc { column });
            }

            let height = (0..ROWS)
                .filter(|&row| self.board[row][column].is_some())
                .count();
            if height != history {
                return Err(StateError::ColumnMismatch {
                    column,
                    height,
                    history,
                });
            }
        }

        Ok(())
    }

    /// Text rendering, top row first
    pub fn render(&self) -> String {
        render_rows(self.board.iter().map(|row| &row[..]))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Connect Four engine
#[derive(Debug, Default)]
pub struct Connect4;

impl Game for Connect4 {
    type State = State;
    type Side = Disc;

    const GAME_TYPE: GameType = GameType::ConnectFour;

    fn metadata() -> GameMetadata {
        GameMetadata::new(GameType::ConnectFour, "Connect Four")
            .with_board(COLS, ROWS)
            .with_actions(COLS)
            .with_players([("Red", 'R'), ("Yellow", 'Y')])
            .with_description("Drop discs and connect four in a row to win!")
            .with_layout(BoardLayout::DropColumn)
    }

    fn create_initial() -> State {
        State::new()
    }

    fn try_move(state: &State, column: usize) -> Option<State> {
        state.try_move(column)
    }

    fn legal_moves(state: &State) -> Vec<usize> {
        state.legal_moves()
    }

    fn status(state: &State) -> GameStatus {
        state.status
    }

    fn current_player(state: &State) -> Disc {
        state.current_player
    }

    fn winner(state: &State) -> Option<Disc> {
        state.winner
    }

    fn move_history(state: &State) -> &[usize] {
        &state.move_history
    }

    fn validate(state: &State) -> Result<(), StateError> {
        state.validate()
    }
}
