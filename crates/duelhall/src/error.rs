//! Unified error type for the Duelhall server.

use duelhall_lobby::LobbyError;
use duelhall_protocol::ProtocolError;
use duelhall_session::SessionError;
use duelhall_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls,
/// so `?` converts errors from the layer crates automatically.
#[derive(Debug, thiserror::Error)]
pub enum DuelhallError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (undecodable frame, unknown game kind).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A matchmaking error (unknown game, connection not registered).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A session-level error (not found, ended, command channel full).
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use duelhall_protocol::SessionId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let duelhall_err: DuelhallError = err.into();
        assert!(matches!(duelhall_err, DuelhallError::Transport(_)));
        assert!(duelhall_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::UnknownGameKind("CHECKERS".into());
        let duelhall_err: DuelhallError = err.into();
        assert!(matches!(duelhall_err, DuelhallError::Protocol(_)));
    }

    #[test]
    fn test_from_lobby_error() {
        let err = LobbyError::UnknownGame("CHECKERS".into());
        let duelhall_err: DuelhallError = err.into();
        assert!(matches!(duelhall_err, DuelhallError::Lobby(_)));
        assert!(duelhall_err.to_string().contains("CHECKERS"));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Busy(SessionId(3));
        let duelhall_err: DuelhallError = err.into();
        assert!(matches!(duelhall_err, DuelhallError::Session(_)));
    }
}
