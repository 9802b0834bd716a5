//! Lobby management for Duelhall.
//!
//! This crate answers one question for the server: "what is this
//! connection doing right now?" It tracks every connection's
//! [`Membership`] and pairs connections that asked for the same game,
//! oldest first ([`Matchmaker`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)  ← owns the Matchmaker, spawns a session per Pairing
//!     ↕
//! Lobby (this crate)  ← membership and the FIFO waiting queue
//!     ↕
//! Protocol / Transport (below)  ← GameKind, SessionId, ConnectionId
//! ```

mod error;
mod matchmaker;
mod membership;

pub use error::LobbyError;
pub use matchmaker::Matchmaker;
pub use membership::{Membership, Pairing, Selection, WaitingEntry};
