//! Session manager: spawns session actors and routes commands to them.

use std::collections::HashMap;
use std::sync::Arc;

use duelhall_protocol::{ClientMessage, Codec, PlayerSlot, SessionId};
use duelhall_transport::Connection;
use tokio::sync::mpsc;

use crate::session::spawn_session;
use crate::{GameRules, SessionConfig, SessionEnded, SessionError, SessionHandle};

/// Tracks every running session by ID.
///
/// Owned by the server's multiplexer task. All routing is non-blocking
/// (`try_send`), so a session that stops reading its channel can't stall
/// the caller.
pub struct SessionManager<K> {
    /// Running sessions, keyed by session ID.
    sessions: HashMap<SessionId, SessionHandle>,

    config: SessionConfig,
    codec: K,

    /// Cloned into every actor; the receiving end belongs to the server.
    ended: mpsc::UnboundedSender<SessionEnded>,
}

impl<K: Codec + Clone> SessionManager<K> {
    /// Creates a new, empty session manager.
    ///
    /// Every session it spawns reports on `ended` when it stops.
    pub fn new(
        config: SessionConfig,
        codec: K,
        ended: mpsc::UnboundedSender<SessionEnded>,
    ) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
            codec,
            ended,
        }
    }

    /// Spawns a session actor for a matched pair and starts tracking it.
    pub fn start<G, C>(&mut self, session_id: SessionId, game: G, players: [Arc<C>; 2])
    where
        G: GameRules + Sync,
        C: Connection,
    {
        let handle = spawn_session(
            session_id,
            game,
            players,
            self.codec.clone(),
            &self.config,
            self.ended.clone(),
        );
        tracing::info!(%session_id, kind = %handle.kind(), "session spawned");
        self.sessions.insert(session_id, handle);
    }

    /// Routes a player's message to their session.
    pub fn route(
        &self,
        session_id: SessionId,
        slot: PlayerSlot,
        msg: ClientMessage,
    ) -> Result<(), SessionError> {
        self.handle(session_id)?.try_send_message(slot, msg)
    }

    /// Tells a session that one of its players disconnected.
    pub fn disconnect(&self, session_id: SessionId, slot: PlayerSlot) -> Result<(), SessionError> {
        self.handle(session_id)?.notify_disconnect(slot)
    }

    /// Stops tracking a session (after it reported `SessionEnded`).
    pub fn remove(&mut self, session_id: SessionId) -> Option<SessionHandle> {
        self.sessions.remove(&session_id)
    }

    /// Asks every running session to stop.
    pub async fn shutdown_all(&mut self) {
        for (session_id, handle) in self.sessions.drain() {
            if let Err(e) = handle.shutdown().await {
                tracing::debug!(%session_id, error = %e, "session already stopped");
            }
        }
    }

    /// Number of tracked sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no sessions are tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn handle(&self, session_id: SessionId) -> Result<&SessionHandle, SessionError> {
        self.sessions
            .get(&session_id)
            .ok_or(SessionError::NotFound(session_id))
    }
}
