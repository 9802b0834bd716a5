//! Session configuration and end-of-session outcomes.

use std::time::Duration;

use duelhall_protocol::{GameKind, PlayerSlot, SessionId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every session actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long (in seconds) a session waits for the next move before it
    /// ends with `GAME_OVER:Turn timed out`.
    ///
    /// Default: `None`. A silent player then stalls only their own
    /// session, never the rest of the server.
    pub turn_timeout_secs: Option<u64>,

    /// Capacity of each session's command channel. When it is full, new
    /// moves for that session are dropped rather than blocking the server.
    pub channel_size: usize,
}

impl SessionConfig {
    /// The turn timeout as a `Duration`, if enabled.
    pub fn turn_timeout(&self) -> Option<Duration> {
        self.turn_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            turn_timeout_secs: None,
            channel_size: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionEnded
// ---------------------------------------------------------------------------

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The game reached a terminal position.
    Finished,

    /// A player quit, disconnected, or could not be written to.
    PlayerLeft(PlayerSlot),

    /// The turn timeout expired.
    TimedOut,

    /// The session was told to stop, or every handle was dropped.
    Shutdown,
}

/// Sent by a session actor after it has closed both connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnded {
    pub session_id: SessionId,
    pub kind: GameKind,
    pub outcome: SessionOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default_has_no_timeout() {
        let config = SessionConfig::default();
        assert_eq!(config.turn_timeout(), None);
        assert_eq!(config.channel_size, 64);
    }

    #[test]
    fn test_session_config_partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "turn_timeout_secs": 90 }"#).unwrap();
        assert_eq!(config.turn_timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.channel_size, 64);
    }
}
