//! The message vocabulary: what clients send and what the server answers.
//!
//! Every message is one line of text. Clients send a handful of fixed
//! shapes (`GAME:<kind>`, `MOVE:<piece> <dest>`, `ROLL`, `<row> <col>`,
//! free text), which [`ClientMessage::parse`] classifies. The server sends
//! [`ServerMessage`]s, whose [`Display`](std::fmt::Display) impl *is* the
//! wire format.

use std::fmt;

use crate::types::{GameKind, PlayerSlot};

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// A line received from a client, classified by shape.
///
/// Parsing never fails: anything that doesn't match a structured shape is
/// kept as [`ClientMessage::Text`] and the game decides whether it means
/// something (a Wordle guess, an RPS choice) or deserves a re-prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// `GAME:<kind>`. The kind is kept raw so the lobby can report
    /// unknown names back to the client verbatim.
    SelectGame(String),

    /// `MOVE:<piece> <dest>`, e.g. `MOVE:P5W e4`.
    Move { piece: String, dest: String },

    /// `ROLL`.
    Roll,

    /// Two whitespace-separated integers, e.g. `1 2`.
    Place { row: i64, col: i64 },

    /// A line that is exactly `exit`: the client is leaving. Longer lines
    /// such as `exits` stay [`Text`](Self::Text).
    Quit,

    /// Anything else, trimmed.
    Text(String),
}

impl ClientMessage {
    /// Classifies one line of client input.
    ///
    /// ```rust
    /// use duelhall_protocol::ClientMessage;
    ///
    /// assert_eq!(ClientMessage::parse("ROLL"), ClientMessage::Roll);
    /// assert_eq!(
    ///     ClientMessage::parse("0 2"),
    ///     ClientMessage::Place { row: 0, col: 2 }
    /// );
    /// ```
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line == "exit" {
            return Self::Quit;
        }
        if let Some(kind) = line.strip_prefix("GAME:") {
            return Self::SelectGame(kind.trim().to_string());
        }
        if let Some(rest) = line.strip_prefix("MOVE:") {
            let mut parts = rest.split_whitespace();
            if let (Some(piece), Some(dest), None) = (parts.next(), parts.next(), parts.next()) {
                return Self::Move {
                    piece: piece.to_string(),
                    dest: dest.to_string(),
                };
            }
            return Self::Text(line.to_string());
        }
        if line.eq_ignore_ascii_case("ROLL") {
            return Self::Roll;
        }

        let mut parts = line.split_whitespace();
        if let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) {
            if let (Ok(row), Ok(col)) = (a.parse::<i64>(), b.parse::<i64>()) {
                return Self::Place { row, col };
            }
        }

        Self::Text(line.to_string())
    }
}

// ---------------------------------------------------------------------------
// Snake & ladder board cells
// ---------------------------------------------------------------------------

/// What sits at the start of a snake & ladder square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Plain,
    Snake,
    Ladder,
}

impl Marker {
    fn as_char(self) -> char {
        match self {
            Self::Plain => ' ',
            Self::Snake => 'S',
            Self::Ladder => 'L',
        }
    }
}

/// One token of a `BOARD:` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCell {
    pub square: u32,
    pub marker: Marker,
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// A line the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `SELECT_GAME`: greeting sent on accept.
    SelectGame,

    /// `WAITING`: queued for a partner.
    Waiting,

    /// `START:<kind>`: a session formed.
    Start(GameKind),

    /// `Connected as Player N. Game starting...`
    Assigned(PlayerSlot),

    /// `TURN`: the recipient may act.
    Turn,

    /// `MOVE:Player N (W) moved <piece> to <dest>`
    Moved {
        player: PlayerSlot,
        side: char,
        piece: String,
        dest: String,
    },

    /// `BOARD_UPDATE`: chess board art follows.
    BoardUpdate,

    /// `BOARD:1L,2 ,...`: the snake & ladder layout.
    Board(Vec<BoardCell>),

    /// `POSITIONS:P1=<n>,P2=<n>`
    Positions([u32; 2]),

    /// `ROLLED:P<i>=<n>`
    Rolled { player: PlayerSlot, value: u32 },

    /// `SNAKE:P<i>=<from>-<to>`
    Snake {
        player: PlayerSlot,
        from: u32,
        to: u32,
    },

    /// `LADDER:P<i>=<from>-<to>`
    Ladder {
        player: PlayerSlot,
        from: u32,
        to: u32,
    },

    /// `WINNER:<text>`: session over with a winner.
    Winner(String),

    /// `GAME_OVER:<text>`: session over without one (draw, disconnect,
    /// timeout).
    GameOver(String),

    /// `ERROR:<text>`
    Error(String),

    /// Free text: prompts, feedback, board art. May span several lines.
    Text(String),
}

impl ServerMessage {
    /// Shorthand for [`ServerMessage::Text`].
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectGame => f.write_str("SELECT_GAME"),
            Self::Waiting => f.write_str("WAITING"),
            Self::Start(kind) => write!(f, "START:{kind}"),
            Self::Assigned(slot) => write!(f, "Connected as {slot}. Game starting..."),
            Self::Turn => f.write_str("TURN"),
            Self::Moved {
                player,
                side,
                piece,
                dest,
            } => write!(f, "MOVE:{player} ({side}) moved {piece} to {dest}"),
            Self::BoardUpdate => f.write_str("BOARD_UPDATE"),
            Self::Board(cells) => {
                f.write_str("BOARD:")?;
                for (i, cell) in cells.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}{}", cell.square, cell.marker.as_char())?;
                }
                Ok(())
            }
            Self::Positions([p1, p2]) => write!(f, "POSITIONS:P1={p1},P2={p2}"),
            Self::Rolled { player, value } => write!(f, "ROLLED:P{}={value}", player.number()),
            Self::Snake { player, from, to } => {
                write!(f, "SNAKE:P{}={from}-{to}", player.number())
            }
            Self::Ladder { player, from, to } => {
                write!(f, "LADDER:P{}={from}-{to}", player.number())
            }
            Self::Winner(text) => write!(f, "WINNER:{text}"),
            Self::GameOver(text) => write!(f, "GAME_OVER:{text}"),
            Self::Error(text) => write!(f, "ERROR:{text}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // ClientMessage::parse
    // =====================================================================

    #[test]
    fn test_parse_select_game_keeps_raw_kind() {
        assert_eq!(
            ClientMessage::parse("GAME:CHECKERS"),
            ClientMessage::SelectGame("CHECKERS".into())
        );
    }

    #[test]
    fn test_parse_move_splits_piece_and_dest() {
        assert_eq!(
            ClientMessage::parse("MOVE:P5W e4\r"),
            ClientMessage::Move {
                piece: "P5W".into(),
                dest: "e4".into()
            }
        );
    }

    #[test]
    fn test_parse_move_missing_dest_is_text() {
        assert_eq!(
            ClientMessage::parse("MOVE:P5W"),
            ClientMessage::Text("MOVE:P5W".into())
        );
    }

    #[test]
    fn test_parse_roll_is_case_insensitive() {
        assert_eq!(ClientMessage::parse("roll"), ClientMessage::Roll);
    }

    #[test]
    fn test_parse_two_integers_is_place() {
        assert_eq!(
            ClientMessage::parse(" 3 -1 "),
            ClientMessage::Place { row: 3, col: -1 }
        );
    }

    #[test]
    fn test_parse_exit_is_quit() {
        assert_eq!(ClientMessage::parse("exit\n"), ClientMessage::Quit);
    }

    #[test]
    fn test_parse_exit_requires_whole_line() {
        // "EXITS" is a valid Wordle guess.
        assert_eq!(ClientMessage::parse("exits"), ClientMessage::Text("exits".into()));
        assert_eq!(
            ClientMessage::parse("exit now"),
            ClientMessage::Text("exit now".into())
        );
    }

    #[test]
    fn test_parse_anything_else_is_trimmed_text() {
        assert_eq!(
            ClientMessage::parse("  apple "),
            ClientMessage::Text("apple".into())
        );
        assert_eq!(
            ClientMessage::parse("1 2 3"),
            ClientMessage::Text("1 2 3".into())
        );
    }

    // =====================================================================
    // ServerMessage display
    // =====================================================================

    #[test]
    fn test_display_session_setup_lines() {
        assert_eq!(ServerMessage::SelectGame.to_string(), "SELECT_GAME");
        assert_eq!(
            ServerMessage::Start(GameKind::SnakeLadder).to_string(),
            "START:SNAKE_LADDER"
        );
        assert_eq!(
            ServerMessage::Assigned(PlayerSlot::Two).to_string(),
            "Connected as Player 2. Game starting..."
        );
    }

    #[test]
    fn test_display_chess_move() {
        let msg = ServerMessage::Moved {
            player: PlayerSlot::One,
            side: 'W',
            piece: "P5W".into(),
            dest: "e4".into(),
        };
        assert_eq!(msg.to_string(), "MOVE:Player 1 (W) moved P5W to e4");
    }

    #[test]
    fn test_display_board_joins_cells_with_commas() {
        let msg = ServerMessage::Board(vec![
            BoardCell { square: 1, marker: Marker::Ladder },
            BoardCell { square: 2, marker: Marker::Plain },
            BoardCell { square: 16, marker: Marker::Snake },
        ]);
        assert_eq!(msg.to_string(), "BOARD:1L,2 ,16S");
    }

    #[test]
    fn test_display_snake_ladder_events() {
        assert_eq!(
            ServerMessage::Positions([38, 0]).to_string(),
            "POSITIONS:P1=38,P2=0"
        );
        assert_eq!(
            ServerMessage::Rolled { player: PlayerSlot::Two, value: 6 }.to_string(),
            "ROLLED:P2=6"
        );
        assert_eq!(
            ServerMessage::Snake { player: PlayerSlot::One, from: 16, to: 6 }.to_string(),
            "SNAKE:P1=16-6"
        );
    }
}
