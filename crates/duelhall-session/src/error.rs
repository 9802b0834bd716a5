//! Error types for the session layer.

use duelhall_protocol::SessionId;

/// Errors that can occur when talking to a session actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session with this ID is tracked.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session's command channel is closed: the actor has stopped.
    #[error("session {0} is unavailable")]
    Unavailable(SessionId),

    /// The session's command channel is full. The command was dropped.
    #[error("session {0} is busy")]
    Busy(SessionId),
}
