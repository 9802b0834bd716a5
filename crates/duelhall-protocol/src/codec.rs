//! Codec trait and the line codec.
//!
//! A "codec" (coder/decoder) converts between messages and raw bytes. The
//! session actor and the server are generic over [`Codec`], so the byte
//! format can change without touching game code. The only implementation
//! today is [`LineCodec`]: UTF-8 text, one message per `\n`-terminated line.

use crate::{ClientMessage, ProtocolError, ServerMessage};

/// Converts server messages to bytes and client frames to messages.
///
/// `Send + Sync + 'static` because a codec lives inside spawned tasks for
/// as long as a session runs.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a server message, including its frame terminator.
    fn encode(&self, msg: &ServerMessage) -> Vec<u8>;

    /// Parses one inbound frame (terminator already stripped).
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] if the frame can't be read
    /// as a message at all.
    fn decode(&self, frame: &[u8]) -> Result<ClientMessage, ProtocolError>;
}

// ---------------------------------------------------------------------------
// LineCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] for newline-terminated UTF-8 text.
///
/// ## Example
///
/// ```rust
/// use duelhall_protocol::{ClientMessage, Codec, LineCodec, ServerMessage};
///
/// let codec = LineCodec;
/// assert_eq!(codec.encode(&ServerMessage::Turn), b"TURN\n");
/// assert_eq!(codec.decode(b"ROLL").unwrap(), ClientMessage::Roll);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCodec;

impl Codec for LineCodec {
    fn encode(&self, msg: &ServerMessage) -> Vec<u8> {
        let mut out = msg.to_string().into_bytes();
        // Multi-line text already carries its inner newlines; every
        // message still ends with exactly one terminator.
        if out.last() != Some(&b'\n') {
            out.push(b'\n');
        }
        out
    }

    fn decode(&self, frame: &[u8]) -> Result<ClientMessage, ProtocolError> {
        let text = std::str::from_utf8(frame)
            .map_err(|e| ProtocolError::InvalidMessage(e.to_string()))?;
        Ok(ClientMessage::parse(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerSlot;

    #[test]
    fn test_encode_appends_newline() {
        let bytes = LineCodec.encode(&ServerMessage::Winner("Player 1".into()));
        assert_eq!(bytes, b"WINNER:Player 1\n");
    }

    #[test]
    fn test_encode_multiline_text_ends_with_single_newline() {
        let bytes = LineCodec.encode(&ServerMessage::text(" X | O | X\n---+---+---\n"));
        assert_eq!(bytes, b" X | O | X\n---+---+---\n");
    }

    #[test]
    fn test_encode_assigned() {
        let bytes = LineCodec.encode(&ServerMessage::Assigned(PlayerSlot::One));
        assert_eq!(bytes, b"Connected as Player 1. Game starting...\n");
    }

    #[test]
    fn test_decode_invalid_utf8_is_error() {
        let result = LineCodec.decode(&[0xff, 0xfe]);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_decode_classifies_line() {
        assert_eq!(
            LineCodec.decode(b"GAME:WORDLE").unwrap(),
            ClientMessage::SelectGame("WORDLE".into())
        );
    }
}
