//! `DuelhallServer` builder and the multiplexer loop.
//!
//! This is the entry point for running a Duelhall server. It ties
//! together all the layers: transport → protocol → lobby → session.
//!
//! One task runs [`DuelhallServer::run`] and owns all lobby state, so the
//! matchmaker needs no lock. It waits on three sources at once:
//!
//! ```text
//!   listener ──accept──┐
//!   reader tasks ──────┼──→ run() ──→ Matchmaker / SessionManager
//!   session actors ────┘   (SessionEnded)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use duelhall_games::VariantState;
use duelhall_lobby::{Matchmaker, Membership, Selection};
use duelhall_protocol::{ClientMessage, Codec, LineCodec, ServerMessage};
use duelhall_session::{SessionConfig, SessionEnded, SessionError, SessionManager};
use duelhall_transport::{
    Connection, ConnectionId, DEFAULT_MAX_FRAME_LEN, TcpConnection, TcpTransport, Transport,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::DuelhallError;
use crate::handler::{ConnectionEvent, spawn_reader};

/// Upper bound on a write made by the multiplexer task.
///
/// Every other client waits while one of these is pending, so a client
/// that stops reading holds everyone up for at most this long.
const MUX_WRITE_TIMEOUT: Duration = Duration::from_millis(250);

/// How long shutdown waits for sessions to report that they stopped.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Server-wide settings.
///
/// Every field has a default, so a config file only needs the fields it
/// changes:
///
/// ```json
/// { "bind_addr": "127.0.0.1:9000", "session": { "turn_timeout_secs": 60 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub bind_addr: String,

    /// Longest line accepted from a client, in bytes.
    pub max_frame_len: usize,

    /// Capacity of the channel from reader tasks to the multiplexer.
    pub event_buffer: usize,

    /// Settings handed to every session actor.
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            event_buffer: 256,
            session: SessionConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a Duelhall server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), duelhall::DuelhallError> {
/// use duelhall::prelude::*;
///
/// let server = DuelhallServer::builder()
///     .bind("127.0.0.1:8081")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DuelhallServerBuilder {
    config: ServerConfig,
}

impl DuelhallServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Binds the listener.
    ///
    /// Uses `LineCodec` over `TcpTransport`. A bind failure is returned as
    /// [`DuelhallError::Transport`].
    pub async fn build(self) -> Result<DuelhallServer, DuelhallError> {
        let transport = TcpTransport::bind(&self.config.bind_addr)
            .await?
            .with_max_frame_len(self.config.max_frame_len);

        Ok(DuelhallServer {
            transport,
            config: self.config,
        })
    }
}

impl Default for DuelhallServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// DuelhallServer
// ---------------------------------------------------------------------------

/// A bound Duelhall server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DuelhallServer {
    transport: TcpTransport,
    config: ServerConfig,
}

impl DuelhallServer {
    /// Creates a new builder.
    pub fn builder() -> DuelhallServerBuilder {
        DuelhallServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The configuration the server was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs the multiplexer loop until the process is terminated.
    ///
    /// Accepts connections, forwards their lines to the matchmaker or to
    /// their session, and cleans up after sessions end.
    pub async fn run(self) -> Result<(), DuelhallError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the multiplexer loop until `shutdown` resolves.
    ///
    /// On shutdown every running session is stopped and every remaining
    /// client is disconnected before this returns.
    ///
    /// ```rust,no_run
    /// # async fn demo() -> Result<(), duelhall::DuelhallError> {
    /// use duelhall::prelude::*;
    ///
    /// let server = DuelhallServer::builder().build().await?;
    /// server
    ///     .run_until(async {
    ///         let _ = tokio::signal::ctrl_c().await;
    ///     })
    ///     .await
    /// # }
    /// ```
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), DuelhallError>
    where
        F: Future<Output = ()>,
    {
        let (events_tx, mut events_rx) = mpsc::channel(self.config.event_buffer.max(1));
        let (ended_tx, mut ended_rx) = mpsc::unbounded_channel();

        let mut mux = Multiplexer {
            clients: HashMap::new(),
            matchmaker: Matchmaker::new(),
            sessions: SessionManager::new(self.config.session.clone(), LineCodec, ended_tx),
            codec: LineCodec,
            events: events_tx,
        };
        let mut transport = self.transport;

        tracing::info!(addr = %self.config.bind_addr, "Duelhall server running");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = transport.accept() => match accepted {
                    Ok(conn) => mux.on_accept(conn).await,
                    Err(e) => tracing::error!(error = %e, "accept failed"),
                },
                Some(event) = events_rx.recv() => {
                    if let Err(e) = mux.on_event(event).await {
                        tracing::debug!(error = %e, "event handling failed");
                    }
                }
                Some(ended) = ended_rx.recv() => mux.on_session_ended(ended),
            }
        }

        tracing::info!("Duelhall server shutting down");
        mux.shutdown(&mut ended_rx).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Multiplexer state
// ---------------------------------------------------------------------------

/// A connected client as seen by the multiplexer.
struct Client {
    conn: Arc<TcpConnection>,
    reader: JoinHandle<()>,
}

/// Everything the multiplexer task owns.
struct Multiplexer {
    clients: HashMap<ConnectionId, Client>,
    matchmaker: Matchmaker,
    sessions: SessionManager<LineCodec>,
    codec: LineCodec,
    /// Cloned into every reader task.
    events: mpsc::Sender<ConnectionEvent>,
}

impl Multiplexer {
    async fn on_accept(&mut self, conn: TcpConnection) {
        let conn = Arc::new(conn);
        let id = conn.id();
        tracing::info!(conn_id = %id, peer = %conn.peer_addr(), "client connected");

        if let Err(e) = self.matchmaker.register(id) {
            tracing::warn!(conn_id = %id, error = %e, "duplicate connection id");
            return;
        }
        let reader = spawn_reader(Arc::clone(&conn), self.codec, self.events.clone());
        self.clients.insert(id, Client { conn, reader });

        self.reply(id, &ServerMessage::SelectGame).await;
    }

    async fn on_event(&mut self, event: ConnectionEvent) -> Result<(), DuelhallError> {
        match event {
            ConnectionEvent::Message { id, msg } => self.on_message(id, msg).await,
            ConnectionEvent::Closed { id } => {
                self.on_closed(id);
                Ok(())
            }
        }
    }

    async fn on_message(&mut self, id: ConnectionId, msg: ClientMessage) -> Result<(), DuelhallError> {
        let Some(membership) = self.matchmaker.membership(id) else {
            tracing::debug!(conn_id = %id, "message from released connection");
            return Ok(());
        };

        if let Membership::InSession { session_id, slot } = membership {
            return match self.sessions.route(session_id, slot, msg) {
                Ok(()) => Ok(()),
                Err(SessionError::Busy(_)) => {
                    tracing::warn!(conn_id = %id, %session_id, "session busy, message dropped");
                    self.notify(id, &ServerMessage::Error("Server busy, try again".into()))
                        .await;
                    Ok(())
                }
                Err(e) => Err(e.into()),
            };
        }

        match msg {
            ClientMessage::SelectGame(kind) => self.on_select(id, &kind).await,
            ClientMessage::Quit => {
                tracing::info!(conn_id = %id, "client quit from lobby");
                self.drop_client(id).await;
                Ok(())
            }
            other => {
                tracing::debug!(conn_id = %id, ?other, "message before game selection");
                self.reply(
                    id,
                    &ServerMessage::Error("Select a game first with GAME:<kind>".into()),
                )
                .await;
                Ok(())
            }
        }
    }

    async fn on_select(&mut self, id: ConnectionId, kind: &str) -> Result<(), DuelhallError> {
        let selection = match self.matchmaker.select_game(id, kind) {
            Ok(selection) => selection,
            Err(e) => {
                self.reply(id, &ServerMessage::Error(e.to_string())).await;
                return Err(e.into());
            }
        };

        // WAITING goes out before the session can write START.
        self.reply(id, &ServerMessage::Waiting).await;

        let Selection::Matched(pairing) = selection else {
            tracing::info!(conn_id = %id, kind, "client waiting");
            return Ok(());
        };

        let players = pairing
            .players
            .map(|conn_id| self.clients.get(&conn_id).map(|c| Arc::clone(&c.conn)));
        let [Some(first), Some(second)] = players else {
            // Only possible if a reply failed and dropped one of the pair.
            tracing::debug!(session_id = %pairing.session_id, "paired client vanished");
            for conn_id in self.matchmaker.release(pairing.session_id) {
                self.drop_client(conn_id).await;
            }
            return Ok(());
        };

        tracing::info!(
            session_id = %pairing.session_id,
            kind = %pairing.kind,
            player_one = %pairing.players[0],
            player_two = %pairing.players[1],
            "players matched"
        );
        self.sessions
            .start(pairing.session_id, VariantState::new(pairing.kind), [first, second]);
        Ok(())
    }

    /// The reader for `id` hit EOF or an error.
    fn on_closed(&mut self, id: ConnectionId) {
        match self.matchmaker.membership(id) {
            Some(Membership::InSession { session_id, slot }) => {
                tracing::info!(conn_id = %id, %session_id, %slot, "player disconnected");
                if let Err(e) = self.sessions.disconnect(session_id, slot) {
                    tracing::debug!(%session_id, error = %e, "session already gone");
                }
                // The session's SessionEnded releases this connection.
            }
            Some(_) => {
                tracing::info!(conn_id = %id, "client left the lobby");
                self.matchmaker.remove(id);
                self.clients.remove(&id);
            }
            None => {
                self.clients.remove(&id);
            }
        }
    }

    fn on_session_ended(&mut self, ended: SessionEnded) {
        let SessionEnded {
            session_id,
            kind,
            outcome,
        } = ended;
        self.sessions.remove(session_id);
        tracing::info!(
            %session_id,
            %kind,
            ?outcome,
            active = self.sessions.len(),
            "session ended"
        );

        for id in self.matchmaker.release(session_id) {
            if let Some(client) = self.clients.remove(&id) {
                client.reader.abort();
            }
        }
    }

    /// Sends one lobby message. A client that can't take it is dropped.
    async fn reply(&mut self, id: ConnectionId, msg: &ServerMessage) {
        if !self.send_bounded(id, msg).await {
            self.drop_client(id).await;
        }
    }

    /// Sends one message to a player whose connection belongs to a session.
    /// A failed write is left for the session to notice.
    async fn notify(&self, id: ConnectionId, msg: &ServerMessage) {
        self.send_bounded(id, msg).await;
    }

    /// Writes `msg` within [`MUX_WRITE_TIMEOUT`]. Returns `false` if the
    /// client is gone or the write failed or timed out.
    async fn send_bounded(&self, id: ConnectionId, msg: &ServerMessage) -> bool {
        let Some(client) = self.clients.get(&id) else {
            return false;
        };
        let bytes = self.codec.encode(msg);

        match tokio::time::timeout(MUX_WRITE_TIMEOUT, client.conn.send(&bytes)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::debug!(conn_id = %id, error = %e, "write failed");
                false
            }
            Err(_) => {
                tracing::debug!(conn_id = %id, "write timed out");
                false
            }
        }
    }

    /// Forgets a lobby client and closes its socket.
    async fn drop_client(&mut self, id: ConnectionId) {
        self.matchmaker.remove(id);
        if let Some(client) = self.clients.remove(&id) {
            client.close().await;
        }
    }

    /// Stops every session, waits briefly for them to report, then
    /// disconnects whoever is left.
    async fn shutdown(&mut self, ended: &mut mpsc::UnboundedReceiver<SessionEnded>) {
        let running = self.sessions.len();
        if !self.sessions.is_empty() {
            tracing::info!(sessions = running, "stopping sessions");
        }

        // Each stopped session reports exactly once, including any whose
        // report was already queued.
        let reported = tokio::time::timeout(SHUTDOWN_GRACE, async {
            self.sessions.shutdown_all().await;
            for _ in 0..running {
                match ended.recv().await {
                    Some(report) => self.on_session_ended(report),
                    None => break,
                }
            }
        })
        .await;
        if reported.is_err() {
            tracing::warn!("sessions did not stop in time");
        }

        for (_, client) in self.clients.drain() {
            client.close().await;
        }
    }
}

impl Client {
    /// Stops the reader and shuts the socket down.
    async fn close(self) {
        self.reader.abort();
        if let Ok(Err(e)) = tokio::time::timeout(MUX_WRITE_TIMEOUT, self.conn.close()).await {
            tracing::debug!(conn_id = %self.conn.id(), error = %e, "close failed");
        }
    }
}
