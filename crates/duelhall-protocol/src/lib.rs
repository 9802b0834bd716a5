//! Wire protocol for Duelhall.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`GameKind`], [`PlayerSlot`], [`SessionId`], [`Recipient`])
//!   are the identities and addresses every layer shares.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]) are the vocabulary
//!   that travels on the wire.
//! - **Codec** ([`Codec`] trait, [`LineCodec`]) turns those messages into
//!   bytes and back.
//! - **Errors** ([`ProtocolError`]) describe what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw lines) and the lobby and
//! session layers. It doesn't know about sockets or games.
//!
//! ```text
//! Transport (lines) → Protocol (ClientMessage) → Lobby / Session
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod message;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{Codec, LineCodec};
pub use error::ProtocolError;
pub use message::{BoardCell, ClientMessage, Marker, ServerMessage};
pub use types::{GameKind, PlayerSlot, Recipient, SessionId};
