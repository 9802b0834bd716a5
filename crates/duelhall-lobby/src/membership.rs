//! Membership types: where a connection currently stands.
//!
//! Every accepted connection is in exactly one of three places:
//!
//! ```text
//!   Unassigned ──(GAME:<kind>)──→ Waiting(kind) ──(partner found)──→ InSession
//!                                     │    ↑
//!                                     └────┘ (GAME:<other kind>)
//! ```
//!
//! A connection leaves all three by disconnecting, or (from `InSession`)
//! when its session ends.

use duelhall_protocol::{GameKind, PlayerSlot, SessionId};
use duelhall_transport::ConnectionId;

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// The matchmaker's record of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// Connected, hasn't picked a game yet.
    Unassigned,

    /// Queued for a partner who wants the same game.
    Waiting(GameKind),

    /// Seated in a running session.
    InSession {
        session_id: SessionId,
        slot: PlayerSlot,
    },
}

impl Membership {
    /// Returns the session this connection plays in, if any.
    pub fn session(&self) -> Option<(SessionId, PlayerSlot)> {
        match *self {
            Self::InSession { session_id, slot } => Some((session_id, slot)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Queue entries and match results
// ---------------------------------------------------------------------------

/// One slot in the waiting queue. Order of entries is arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitingEntry {
    pub conn: ConnectionId,
    pub kind: GameKind,
}

/// Two connections matched for a game.
///
/// `players[0]` queued first and becomes [`PlayerSlot::One`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub session_id: SessionId,
    pub kind: GameKind,
    pub players: [ConnectionId; 2],
}

/// The outcome of a successful [`select_game`](crate::Matchmaker::select_game).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Queued; no partner yet.
    Waiting(GameKind),

    /// A partner was waiting; start a session.
    Matched(Pairing),
}
