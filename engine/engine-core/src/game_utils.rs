//! Shared utilities for two-player board game implementations
//!
//! This module provides common functionality used across multiple game
//! implementations to reduce code duplication and ensure consistent behavior.

use crate::typed::{GameStatus, Seat, Side, StateError};

/// Scan directions as `(row_step, col_step)`: horizontal, vertical and the
/// two diagonals. Each axis is walked both ways from the origin cell.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Length of the contiguous run through `(row, col)` along `axis`.
///
/// `owned(row, col)` reports whether a cell belongs to the same player as the
/// origin. The origin itself is always counted.
///
/// # Example
/// ```
/// use engine_core::game_utils::run_length;
///
/// // A 1x5 strip with cells 1..=3 owned
/// let owned = |_r: usize, c: usize| (1..=3).contains(&c);
/// assert_eq!(run_length(1, 5, 0, 2, (0, 1), owned), 3);
/// ```
pub fn run_length<F>(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    axis: (isize, isize),
    owned: F,
) -> usize
where
    F: Fn(usize, usize) -> bool,
{
    let (dr, dc) = axis;
    let mut count = 1;

    for sign in [1isize, -1] {
        let (mut r, mut c) = (row as isize + dr * sign, col as isize + dc * sign);
        while r >= 0 && r < rows as isize && c >= 0 && c < cols as isize {
            if !owned(r as usize, c as usize) {
                break;
            }
            count += 1;
            r += dr * sign;
            c += dc * sign;
        }
    }

    count
}

/// Longest run through `(row, col)` across all four axes.
pub fn longest_run<F>(rows: usize, cols: usize, row: usize, col: usize, owned: F) -> usize
where
    F: Fn(usize, usize) -> bool,
{
    AXES.iter()
        .map(|&axis| run_length(rows, cols, row, col, axis, &owned))
        .max()
        .unwrap_or(1)
}

/// Validate the invariants every two-player placement game shares.
///
/// * `winner` is present iff `status` is `Won`, and is the player who moved last
/// * occupied cells match the move history length
/// * mark counts agree with the player to move
/// * `Draw` means a full board, `Playing` means at least one empty cell
pub fn validate_common<S: Side>(
    cells: impl IntoIterator<Item = Option<S>>,
    current: S,
    status: GameStatus,
    winner: Option<S>,
    history_len: usize,
) -> Result<(), StateError> {
    let (mut first, mut second, mut empty) = (0usize, 0usize, 0usize);
    for cell in cells {
        match cell.map(S::seat) {
            Some(Seat::First) => first += 1,
            Some(Seat::Second) => second += 1,
            None => empty += 1,
        }
    }

    match (status, winner) {
        (GameStatus::Won, Some(_)) | (GameStatus::Playing | GameStatus::Draw, None) => {}
        (status, winner) => {
            return Err(StateError::WinnerMismatch {
                status,
                has_winner: winner.is_some(),
            })
        }
    }

    let occupied = first + second;
    if occupied != history_len {
        return Err(StateError::HistoryMismatch {
            history: history_len,
            occupied,
        });
    }

    let balanced = match current.seat() {
        Seat::First => first == second,
        Seat::Second => first == second + 1,
    };
    if !balanced {
        return Err(StateError::TurnMismatch { first, second });
    }

    let status_ok = match status {
        GameStatus::Playing => empty > 0,
        GameStatus::Draw => empty == 0,
        GameStatus::Won => occupied > 0,
    };
    if !status_ok {
        return Err(StateError::StatusMismatch { status, empty });
    }

    // The player to move is always the one who did not make the last move
    if let Some(winner) = winner {
        if winner != current.opponent() {
            return Err(StateError::WrongWinner);
        }
    }

    Ok(())
}

/// Render board rows as text, one line per row, `.` for empty cells.
pub fn render_rows<'a, S: Side + 'a>(rows: impl IntoIterator<Item = &'a [Option<S>]>) -> String {
    rows.into_iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.map(S::symbol).unwrap_or('.').to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
