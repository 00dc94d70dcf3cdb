//! Core traits and types for the turn-based game engines
//!
//! This crate provides the vocabulary shared by every game:
//! - `Game`: Typed trait exposing pure state transitions
//! - `GameType`, `GameStatus`, `Seat`, `Side`: identifiers used on the wire
//!   and by the synchronization layer
//! - `StateError`: invariant violations found when validating foreign states
//! - `GameMetadata`: display-oriented description of a game
//! - `game_utils`: line scanning, shared validation and board rendering

pub mod game_utils;
pub mod metadata;
pub mod typed;

// Re-export main types for convenience
pub use metadata::{BoardLayout, GameMetadata};
pub use typed::{Game, GameStatus, GameType, Seat, Side, StateError, UnknownGame};
