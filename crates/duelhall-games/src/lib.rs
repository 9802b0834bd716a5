//! The game variants hosted by Duelhall.
//!
//! Each module implements [`GameRules`](duelhall_session::GameRules) for
//! one game. [`VariantState`] wraps all five so the server can hold any of
//! them behind a single type, picked by [`GameKind`](duelhall_protocol::GameKind).
//!
//! | Game | Module | Turn model |
//! |---|---|---|
//! | Wordle | [`wordle`] | alternating guesses at one shared secret |
//! | Chess | [`chess`] | alternating, White first |
//! | Snake & Ladder | [`snake_ladder`] | alternating die rolls |
//! | Tic-tac-toe | [`tictactoe`] | alternating, X first |
//! | Rock-paper-scissors | [`rps`] | simultaneous, best of three |
//!
//! Game logic is synchronous and never touches a socket: every method
//! returns the messages to send, and the session actor delivers them.

pub mod chess;
pub mod rps;
pub mod snake_ladder;
pub mod tictactoe;
pub mod wordle;

mod variant;

pub use chess::{Chess, MoveError};
pub use rps::RockPaperScissors;
pub use snake_ladder::SnakeLadder;
pub use tictactoe::TicTacToe;
pub use variant::VariantState;
pub use wordle::Wordle;

use duelhall_protocol::{PlayerSlot, Recipient, ServerMessage};
use duelhall_session::Outbound;

/// Addresses a message to one player.
pub(crate) fn to(slot: PlayerSlot, msg: ServerMessage) -> Outbound {
    (Recipient::Player(slot), msg)
}

/// Addresses a message to both players.
pub(crate) fn all(msg: ServerMessage) -> Outbound {
    (Recipient::All, msg)
}
