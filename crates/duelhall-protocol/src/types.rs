//! Identity and addressing types shared by every layer.
//!
//! These are the small value types that show up everywhere: which game a
//! client asked for ([`GameKind`]), which seat a player occupies in a
//! session ([`PlayerSlot`]), which session a message belongs to
//! ([`SessionId`]), and who a server message is addressed to
//! ([`Recipient`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// GameKind
// ---------------------------------------------------------------------------

/// The five game variants a client can request with `GAME:<kind>`.
///
/// The wire identifiers are the SCREAMING_SNAKE_CASE names below. Note the
/// singular `ROCK_PAPER_SCISSOR`: that's what existing clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "WORDLE")]
    Wordle,
    #[serde(rename = "CHESS")]
    Chess,
    #[serde(rename = "SNAKE_LADDER")]
    SnakeLadder,
    #[serde(rename = "TIC_TAC_TOE")]
    TicTacToe,
    #[serde(rename = "ROCK_PAPER_SCISSOR")]
    RockPaperScissors,
}

impl GameKind {
    /// Every game the server hosts, in menu order.
    pub const ALL: [GameKind; 5] = [
        Self::Wordle,
        Self::Chess,
        Self::SnakeLadder,
        Self::TicTacToe,
        Self::RockPaperScissors,
    ];

    /// The identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wordle => "WORDLE",
            Self::Chess => "CHESS",
            Self::SnakeLadder => "SNAKE_LADDER",
            Self::TicTacToe => "TIC_TAC_TOE",
            Self::RockPaperScissors => "ROCK_PAPER_SCISSOR",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = ProtocolError;

    /// Parses a wire identifier. Surrounding whitespace and letter case
    /// are ignored; anything else must match exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProtocolError::UnknownGameKind(wanted.to_string()))
    }
}

// ---------------------------------------------------------------------------
// PlayerSlot
// ---------------------------------------------------------------------------

/// A seat in a two-player session.
///
/// `One` is always the player who queued first. Games map slots onto
/// their own roles (White/Black, X/O) but the slot itself is what the
/// session actor routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    /// Both slots, in turn order.
    pub const BOTH: [PlayerSlot; 2] = [Self::One, Self::Two];

    /// Zero-based index, for indexing `[T; 2]` arrays.
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// One-based player number, as shown to users.
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// The opposing seat.
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// `PlayerSlot::Two.to_string()` is `"Player 2"`.
impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// A unique identifier for a session (one matched game between two
/// connections).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Specifies who should receive a server message.
///
/// Game rules return `(Recipient, ServerMessage)` pairs; the session actor
/// turns each one into a unicast or a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Both players in the session.
    All,

    /// One specific player.
    Player(PlayerSlot),
}

impl Recipient {
    /// Returns `true` if `slot` should receive a message addressed this way.
    pub fn includes(self, slot: PlayerSlot) -> bool {
        match self {
            Self::All => true,
            Self::Player(target) => target == slot,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
