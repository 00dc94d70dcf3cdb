//! Display-oriented description of a game.
//!
//! Front ends and the command line use this to present a game without
//! knowing its rules.

use crate::typed::GameType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How moves map onto the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardLayout {
    /// A move names the cell it fills
    #[default]
    Grid,
    /// A move names a column and the piece falls to the lowest free row
    DropColumn,
}

impl fmt::Display for BoardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardLayout::Grid => f.write_str("grid"),
            BoardLayout::DropColumn => f.write_str("drop_column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub game_type: GameType,
    /// e.g. "Tic-Tac-Toe", "Connect Four"
    pub display_name: String,
    pub board_width: usize,
    pub board_height: usize,
    /// Number of distinct move positions
    pub num_actions: usize,
    /// First seat first
    pub player_names: Vec<String>,
    pub player_symbols: Vec<char>,
    pub description: String,
    pub layout: BoardLayout,
}

impl GameMetadata {
    pub fn new(game_type: GameType, display_name: impl Into<String>) -> Self {
        Self {
            game_type,
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            num_actions: 0,
            player_names: Vec::new(),
            player_symbols: Vec::new(),
            description: String::new(),
            layout: BoardLayout::Grid,
        }
    }

    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    pub fn with_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    /// Name and symbol for each seat, first seat first
    pub fn with_players<'a>(mut self, players: impl IntoIterator<Item = (&'a str, char)>) -> Self {
        let (names, symbols): (Vec<String>, Vec<char>) = players
            .into_iter()
            .map(|(name, symbol)| (name.to_string(), symbol))
            .unzip();
        self.player_names = names;
        self.player_symbols = symbols;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_layout(mut self, layout: BoardLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn env_id(&self) -> &'static str {
        self.game_type.env_id()
    }

    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let meta = GameMetadata::new(GameType::TicTacToe, "Tic-Tac-Toe")
            .with_board(3, 3)
            .with_actions(9)
            .with_players([("X", 'X'), ("O", 'O')])
            .with_description("Get three in a row to win!");

        assert_eq!(meta.env_id(), "tictactoe");
        assert_eq!(meta.board_size(), 9);
        assert_eq!(meta.num_actions, 9);
        assert_eq!(meta.player_names, vec!["X", "O"]);
        assert_eq!(meta.player_symbols, vec!['X', 'O']);
        assert_eq!(meta.layout, BoardLayout::Grid);
    }

    #[test]
    fn test_layout_wire_names() {
        let meta = GameMetadata::new(GameType::ConnectFour, "Connect Four")
            .with_board(7, 6)
            .with_layout(BoardLayout::DropColumn);

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["layout"], "drop_column");
        assert_eq!(json["game_type"], "ConnectFour");

        let parsed: GameMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, meta);
        assert_eq!(BoardLayout::DropColumn.to_string(), "drop_column");
    }
}
