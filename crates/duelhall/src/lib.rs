//! # Duelhall
//!
//! A TCP server that pairs clients into two-player, turn-based games.
//!
//! Clients connect, receive `SELECT_GAME`, and answer with `GAME:<kind>`.
//! The first two clients that ask for the same kind are matched into a
//! session, which runs the game to completion over a line-oriented text
//! protocol. Five games are hosted: Wordle, Chess, Snake & Ladder,
//! Tic-tac-toe, and Rock-paper-scissors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use duelhall::prelude::*;
//!
//! # async fn demo() -> Result<(), DuelhallError> {
//! let server = DuelhallServer::builder()
//!     .bind("0.0.0.0:8081")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! ## Layers
//!
//! | Crate | Concern |
//! |---|---|
//! | `duelhall-transport` | line-framed TCP connections |
//! | `duelhall-protocol` | wire messages and the line codec |
//! | `duelhall-lobby` | waiting queue and pairing |
//! | `duelhall-session` | per-match actor and the `GameRules` contract |
//! | `duelhall-games` | the five games |

mod error;
mod handler;
mod server;

pub use error::DuelhallError;
pub use server::{DuelhallServer, DuelhallServerBuilder, ServerConfig};

pub use duelhall_games as games;
pub use duelhall_lobby as lobby;
pub use duelhall_protocol as protocol;
pub use duelhall_session as session;
pub use duelhall_transport as transport;

/// Common imports for running a server or writing a game.
pub mod prelude {
    pub use crate::{DuelhallError, DuelhallServer, DuelhallServerBuilder, ServerConfig};
    pub use duelhall_games::VariantState;
    pub use duelhall_protocol::{
        ClientMessage, Codec, GameKind, LineCodec, PlayerSlot, Recipient, ServerMessage, SessionId,
    };
    pub use duelhall_session::{GameRules, Outbound, SessionConfig};
}
