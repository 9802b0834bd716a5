//! The `GameRules` trait: the contract every game variant fulfils.
//!
//! The session actor owns one `GameRules` value and drives it. The actor
//! handles everything that is the same for every game (greeting, turn
//! gating, quitting, disconnects, writes); the rules only decide what a
//! move means and what to tell whom.

use duelhall_protocol::{ClientMessage, GameKind, PlayerSlot, Recipient, ServerMessage};

/// A message the rules want delivered, and to whom.
pub type Outbound = (Recipient, ServerMessage);

/// The rules of one two-player game.
///
/// All methods are synchronous: game logic never awaits. The actor calls
/// them in this order:
///
/// ```text
/// start() ──→ [ accepts_from(slot)? ──→ handle_message(slot, msg) ──→ is_finished()? ]*
/// ```
///
/// Messages from a player for whom [`accepts_from`](Self::accepts_from)
/// returns `false` never reach [`handle_message`](Self::handle_message);
/// the actor answers them with `ERROR:Not your turn`. `exit` never reaches
/// the rules either.
pub trait GameRules: Send + 'static {
    /// Which game this is.
    fn kind(&self) -> GameKind;

    /// Initializes the game and returns the opening messages (banners,
    /// boards, the first `TURN`).
    fn start(&mut self) -> Vec<Outbound>;

    /// Returns `true` if `slot` may act right now.
    fn accepts_from(&self, slot: PlayerSlot) -> bool;

    /// Applies one message from a player that is allowed to act.
    ///
    /// Invalid input is answered here (usually a re-prompt to the sender)
    /// and must leave the turn where it was.
    fn handle_message(&mut self, slot: PlayerSlot, msg: ClientMessage) -> Vec<Outbound>;

    /// Returns `true` once the game reached a terminal position.
    fn is_finished(&self) -> bool;
}
