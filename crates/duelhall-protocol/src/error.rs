//! Error types for the protocol layer.
//!
//! Each crate in Duelhall defines its own error enum. When you see a
//! `ProtocolError`, the problem is in turning bytes into messages, not in
//! networking or in game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The frame is not valid text, or is otherwise unusable.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A `GAME:<kind>` request named a game this server doesn't host.
    #[error("unknown game kind '{0}'")]
    UnknownGameKind(String),
}
