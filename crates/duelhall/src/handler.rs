//! Per-connection reader task.
//!
//! Each accepted connection gets its own Tokio task running
//! [`read_loop`]. The task owns nothing but the read side: it decodes
//! lines and forwards them to the multiplexer, which decides what they
//! mean. Writes happen elsewhere (the multiplexer while the client is in
//! the lobby, the session actor once it is playing).
//!
//! The flow is:
//!   1. `recv()` one line
//!   2. decode it into a [`ClientMessage`]
//!   3. forward it as [`ConnectionEvent::Message`]
//!   4. on EOF, read error, or an oversized line, forward
//!      [`ConnectionEvent::Closed`] and stop

use std::sync::Arc;

use duelhall_protocol::{ClientMessage, Codec};
use duelhall_transport::{Connection, ConnectionId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What a reader task reports to the multiplexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConnectionEvent {
    /// One decoded line from the client.
    Message { id: ConnectionId, msg: ClientMessage },

    /// The client is gone. Always the last event for a connection.
    Closed { id: ConnectionId },
}

/// Spawns the reader task for `conn`.
///
/// The returned handle lets the multiplexer abort the task once the
/// connection's session has ended.
pub(crate) fn spawn_reader<C, K>(
    conn: Arc<C>,
    codec: K,
    events: mpsc::Sender<ConnectionEvent>,
) -> JoinHandle<()>
where
    C: Connection,
    K: Codec,
{
    tokio::spawn(read_loop(conn, codec, events))
}

async fn read_loop<C, K>(conn: Arc<C>, codec: K, events: mpsc::Sender<ConnectionEvent>)
where
    C: Connection,
    K: Codec,
{
    let id = conn.id();
    tracing::debug!(conn_id = %id, "reader started");

    loop {
        let frame = match conn.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::info!(conn_id = %id, "connection closed by client");
                break;
            }
            Err(e) => {
                tracing::debug!(conn_id = %id, error = %e, "recv failed");
                break;
            }
        };

        let msg = match codec.decode(&frame) {
            Ok(msg) => msg,
            Err(e) => {
                // Not valid UTF-8: pass it on as text so the game can
                // re-prompt instead of silently dropping the turn.
                tracing::debug!(conn_id = %id, error = %e, "undecodable frame");
                ClientMessage::Text(String::from_utf8_lossy(&frame).trim().to_string())
            }
        };

        // Bounded channel: a slow multiplexer stalls only this reader.
        if events.send(ConnectionEvent::Message { id, msg }).await.is_err() {
            tracing::debug!(conn_id = %id, "multiplexer gone, reader stopping");
            return;
        }
    }

    let _ = events.send(ConnectionEvent::Closed { id }).await;
}
