//! Session actor: an isolated Tokio task that owns one running game.
//!
//! Each matched pair of connections gets its own task. The task owns the
//! game state exclusively and performs every write to both connections.
//! The outside world talks to it through an mpsc channel, so one slow or
//! silent session never blocks another, or the server's accept loop.

use std::sync::Arc;
use std::time::Duration;

use duelhall_protocol::{
    ClientMessage, Codec, GameKind, PlayerSlot, Recipient, ServerMessage, SessionId,
};
use duelhall_transport::Connection;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::{GameRules, Outbound, SessionConfig, SessionEnded, SessionError, SessionOutcome};

/// Commands sent to a session actor through its channel.
pub(crate) enum SessionCommand {
    /// A line from one of the two players.
    Message { slot: PlayerSlot, msg: ClientMessage },

    /// A player's connection closed or broke.
    Disconnected { slot: PlayerSlot },

    /// Stop the session without notifying the players.
    Shutdown,
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Handle to a running session actor. Used to send commands to it.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    kind: GameKind,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Returns the session's unique ID.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns which game the session plays.
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Forwards a player's message without waiting.
    ///
    /// # Errors
    /// - [`SessionError::Busy`]: the channel is full; the message is dropped.
    /// - [`SessionError::Unavailable`]: the actor has stopped.
    pub fn try_send_message(
        &self,
        slot: PlayerSlot,
        msg: ClientMessage,
    ) -> Result<(), SessionError> {
        self.sender
            .try_send(SessionCommand::Message { slot, msg })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SessionError::Busy(self.session_id),
                mpsc::error::TrySendError::Closed(_) => {
                    SessionError::Unavailable(self.session_id)
                }
            })
    }

    /// Tells the session a player's connection is gone.
    ///
    /// Never blocks the caller. If the channel is momentarily full, the
    /// notice is delivered from a helper task instead of being dropped.
    ///
    /// # Errors
    /// Returns [`SessionError::Unavailable`] if the actor has stopped.
    pub fn notify_disconnect(&self, slot: PlayerSlot) -> Result<(), SessionError> {
        match self.sender.try_send(SessionCommand::Disconnected { slot }) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(cmd)) => {
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let _ = sender.send(cmd).await;
                });
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(SessionError::Unavailable(self.session_id))
            }
        }
    }

    /// Tells the session to stop.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }
}

// ---------------------------------------------------------------------------
// SessionActor
// ---------------------------------------------------------------------------

/// The internal session actor state. Runs inside a Tokio task.
struct SessionActor<G, C, K> {
    session_id: SessionId,
    game: G,
    /// Indexed by `PlayerSlot::index()`.
    players: [Arc<C>; 2],
    codec: K,
    turn_timeout: Option<Duration>,
    receiver: mpsc::Receiver<SessionCommand>,
    ended: mpsc::UnboundedSender<SessionEnded>,
}

impl<G, C, K> SessionActor<G, C, K>
where
    G: GameRules + Sync,
    C: Connection,
    K: Codec,
{
    /// Runs the game to the end, closes both connections, and reports.
    async fn run(mut self) {
        let kind = self.game.kind();
        tracing::info!(session_id = %self.session_id, %kind, "session started");

        let outcome = self.play().await;

        self.receiver.close();
        for conn in &self.players {
            if let Err(e) = conn.close().await {
                tracing::debug!(session_id = %self.session_id, error = %e, "close failed");
            }
        }

        tracing::info!(session_id = %self.session_id, ?outcome, "session ended");
        let _ = self.ended.send(SessionEnded {
            session_id: self.session_id,
            kind,
            outcome,
        });
    }

    async fn play(&mut self) -> SessionOutcome {
        let kind = self.game.kind();
        for slot in PlayerSlot::BOTH {
            let greeting = vec![
                (Recipient::Player(slot), ServerMessage::Start(kind)),
                (Recipient::Player(slot), ServerMessage::Assigned(slot)),
            ];
            if let Err(gone) = self.dispatch(greeting).await {
                return self.abandon(gone).await;
            }
        }

        let opening = self.game.start();
        if let Err(gone) = self.dispatch(opening).await {
            return self.abandon(gone).await;
        }
        if self.game.is_finished() {
            return SessionOutcome::Finished;
        }

        let mut deadline = self.next_deadline();
        loop {
            let cmd = tokio::select! {
                cmd = self.receiver.recv() => cmd,
                _ = expire(deadline) => {
                    tracing::info!(session_id = %self.session_id, "turn timed out");
                    let _ = self
                        .dispatch(vec![(
                            Recipient::All,
                            ServerMessage::GameOver("Turn timed out".into()),
                        )])
                        .await;
                    return SessionOutcome::TimedOut;
                }
            };

            match cmd {
                Some(SessionCommand::Message { slot, msg }) => {
                    let accepted = self.game.accepts_from(slot);
                    if let Some(outcome) = self.handle_message(slot, msg).await {
                        return outcome;
                    }
                    if accepted {
                        deadline = self.next_deadline();
                    }
                }
                Some(SessionCommand::Disconnected { slot }) => {
                    return self.abandon(slot).await;
                }
                Some(SessionCommand::Shutdown) | None => {
                    tracing::info!(session_id = %self.session_id, "session shutting down");
                    return SessionOutcome::Shutdown;
                }
            }
        }
    }

    /// Applies one player message. Returns `Some` when the session is over.
    async fn handle_message(
        &mut self,
        slot: PlayerSlot,
        msg: ClientMessage,
    ) -> Option<SessionOutcome> {
        if msg == ClientMessage::Quit {
            tracing::info!(session_id = %self.session_id, %slot, "player quit");
            return Some(self.abandon(slot).await);
        }

        if !self.game.accepts_from(slot) {
            tracing::debug!(session_id = %self.session_id, %slot, "message out of turn");
            let reject = vec![(
                Recipient::Player(slot),
                ServerMessage::Error("Not your turn".into()),
            )];
            if let Err(gone) = self.dispatch(reject).await {
                return Some(self.abandon(gone).await);
            }
            return None;
        }

        tracing::debug!(session_id = %self.session_id, %slot, ?msg, "applying move");
        let out = self.game.handle_message(slot, msg);
        if let Err(gone) = self.dispatch(out).await {
            return Some(self.abandon(gone).await);
        }

        if self.game.is_finished() {
            return Some(SessionOutcome::Finished);
        }
        None
    }

    /// Ends the session because `gone` left; tells the other player.
    async fn abandon(&mut self, gone: PlayerSlot) -> SessionOutcome {
        tracing::info!(session_id = %self.session_id, slot = %gone, "player left the session");
        let notice = ServerMessage::GameOver(format!("{gone} disconnected"));
        let _ = self.send_to(gone.other(), &notice).await;
        SessionOutcome::PlayerLeft(gone)
    }

    /// Delivers outbound messages in order. Stops at the first failed
    /// write and reports which player could not be reached.
    async fn dispatch(&mut self, msgs: Vec<Outbound>) -> Result<(), PlayerSlot> {
        for (recipient, msg) in msgs {
            for slot in PlayerSlot::BOTH {
                if recipient.includes(slot) {
                    self.send_to(slot, &msg).await?;
                }
            }
        }
        Ok(())
    }

    async fn send_to(&self, slot: PlayerSlot, msg: &ServerMessage) -> Result<(), PlayerSlot> {
        let bytes = self.codec.encode(msg);
        self.players[slot.index()].send(&bytes).await.map_err(|e| {
            tracing::warn!(session_id = %self.session_id, %slot, error = %e, "write failed");
            slot
        })
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.turn_timeout.map(|limit| Instant::now() + limit)
    }
}

/// Resolves at `deadline`, or never when there is none.
async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Spawns a new session actor task and returns a handle to it.
///
/// `players[0]` becomes [`PlayerSlot::One`]. When the session ends, both
/// connections are closed and a [`SessionEnded`] is sent on `ended`.
pub fn spawn_session<G, C, K>(
    session_id: SessionId,
    game: G,
    players: [Arc<C>; 2],
    codec: K,
    config: &SessionConfig,
    ended: mpsc::UnboundedSender<SessionEnded>,
) -> SessionHandle
where
    G: GameRules + Sync,
    C: Connection,
    K: Codec,
{
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));
    let kind = game.kind();

    let actor = SessionActor {
        session_id,
        game,
        players,
        codec,
        turn_timeout: config.turn_timeout(),
        receiver: rx,
        ended,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        kind,
        sender: tx,
    }
}
