//! Error types for the lobby layer.

use duelhall_protocol::SessionId;
use duelhall_transport::ConnectionId;

/// Errors that can occur while a connection picks a game.
///
/// Every variant leaves the matchmaker unchanged, so the server can report
/// the error to the client and carry on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The client asked for a game this server doesn't host.
    #[error("unknown game '{0}'")]
    UnknownGame(String),

    /// The connection was never registered (or was already removed).
    #[error("connection {0} is not registered")]
    NotRegistered(ConnectionId),

    /// `register` was called twice for the same connection.
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),

    /// The connection is playing and can't re-enter matchmaking.
    #[error("connection {conn} is already in session {session_id}")]
    AlreadyInSession {
        conn: ConnectionId,
        session_id: SessionId,
    },
}
