//! The matchmaker: who is connected, who is waiting, and who gets paired.
//!
//! # Concurrency note
//!
//! `Matchmaker` is NOT thread-safe by itself. It uses a plain `HashMap` and
//! `VecDeque`, and is owned by the server's multiplexer task, which is the
//! only place connections are registered, queued, or released. No lock is
//! needed because no other task ever touches it.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use duelhall_protocol::{GameKind, PlayerSlot, SessionId};
use duelhall_transport::ConnectionId;

use crate::{LobbyError, Membership, Pairing, Selection, WaitingEntry};

/// Counter for generating unique session IDs.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Pairs connections that asked for the same game, first come first served.
///
/// ## Lifecycle
///
/// ```text
/// register() ──→ select_game() ──→ [Waiting] ──→ select_game() by a peer ──→ [InSession]
///                                       │                                         │
///                                       ▼                                         ▼
///                                   remove()                                 release()
/// ```
#[derive(Debug, Default)]
pub struct Matchmaker {
    /// Every known connection and where it stands.
    members: HashMap<ConnectionId, Membership>,

    /// Waiting connections in arrival order. Kept in sync with `members`:
    /// a connection has an entry here iff its membership is `Waiting`.
    queue: VecDeque<WaitingEntry>,
}

impl Matchmaker {
    /// Creates an empty matchmaker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly accepted connection as `Unassigned`.
    ///
    /// # Errors
    /// Returns [`LobbyError::AlreadyRegistered`] if the ID is already known.
    pub fn register(&mut self, conn: ConnectionId) -> Result<(), LobbyError> {
        if self.members.contains_key(&conn) {
            return Err(LobbyError::AlreadyRegistered(conn));
        }
        self.members.insert(conn, Membership::Unassigned);
        tracing::debug!(%conn, "connection registered");
        Ok(())
    }

    /// Handles a `GAME:<kind>` request.
    ///
    /// The connection is appended to the back of the queue under `kind`,
    /// then the queue is scanned front to back for the first *other*
    /// connection waiting for the same game. If one is found, both leave
    /// the queue and become `InSession` under a fresh [`SessionId`], with
    /// the earlier arrival as player one.
    ///
    /// A connection that is already waiting loses its old place and goes
    /// to the back under the new kind.
    ///
    /// # Errors
    /// - [`LobbyError::UnknownGame`]: `kind` isn't one of the hosted games.
    ///   The connection's membership is left as it was.
    /// - [`LobbyError::NotRegistered`]: unknown connection.
    /// - [`LobbyError::AlreadyInSession`]: the connection is playing.
    pub fn select_game(
        &mut self,
        conn: ConnectionId,
        kind: &str,
    ) -> Result<Selection, LobbyError> {
        let membership = *self
            .members
            .get(&conn)
            .ok_or(LobbyError::NotRegistered(conn))?;

        if let Membership::InSession { session_id, .. } = membership {
            return Err(LobbyError::AlreadyInSession { conn, session_id });
        }

        let kind: GameKind = kind
            .parse()
            .map_err(|_| LobbyError::UnknownGame(kind.trim().to_string()))?;

        if matches!(membership, Membership::Waiting(_)) {
            self.dequeue(conn);
        }
        self.members.insert(conn, Membership::Waiting(kind));
        self.queue.push_back(WaitingEntry { conn, kind });
        tracing::info!(%conn, %kind, "waiting for a partner");

        let partner = self
            .queue
            .iter()
            .find(|entry| entry.kind == kind && entry.conn != conn)
            .map(|entry| entry.conn);

        let Some(partner) = partner else {
            return Ok(Selection::Waiting(kind));
        };

        self.dequeue(partner);
        self.dequeue(conn);

        let session_id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        let players = [partner, conn];
        for (conn, slot) in players.into_iter().zip(PlayerSlot::BOTH) {
            self.members
                .insert(conn, Membership::InSession { session_id, slot });
        }

        tracing::info!(%session_id, %kind, p1 = %partner, p2 = %conn, "players matched");
        Ok(Selection::Matched(Pairing {
            session_id,
            kind,
            players,
        }))
    }

    /// Forgets a connection entirely (it disconnected).
    ///
    /// Deletes exactly its membership and, if it was waiting, its one
    /// queue entry. The relative order of everyone else is untouched.
    /// Returns the membership it had, so the caller can notify a session.
    pub fn remove(&mut self, conn: ConnectionId) -> Option<Membership> {
        let membership = self.members.remove(&conn)?;
        if matches!(membership, Membership::Waiting(_)) {
            self.dequeue(conn);
        }
        tracing::debug!(%conn, ?membership, "connection removed");
        Some(membership)
    }

    /// Drops both memberships of an ended session.
    ///
    /// Returns the connections that were still seated in it (a player who
    /// already disconnected was removed earlier and isn't listed).
    pub fn release(&mut self, session_id: SessionId) -> Vec<ConnectionId> {
        let mut released: Vec<ConnectionId> = self
            .members
            .iter()
            .filter(|(_, m)| m.session().is_some_and(|(id, _)| id == session_id))
            .map(|(conn, _)| *conn)
            .collect();
        released.sort();

        for conn in &released {
            self.members.remove(conn);
        }
        tracing::debug!(%session_id, count = released.len(), "session released");
        released
    }

    /// Returns where a connection currently stands.
    pub fn membership(&self, conn: ConnectionId) -> Option<Membership> {
        self.members.get(&conn).copied()
    }

    /// Iterates over waiting connections in arrival order.
    pub fn waiting(&self) -> impl Iterator<Item = &WaitingEntry> {
        self.queue.iter()
    }

    /// Number of connections waiting for a partner.
    pub fn waiting_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of known connections in any state.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no connections are known.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Removes `conn`'s queue entry, matching by identity.
    fn dequeue(&mut self, conn: ConnectionId) {
        if let Some(pos) = self.queue.iter().position(|entry| entry.conn == conn) {
            self.queue.remove(pos);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
