use duelhall_protocol::{ClientMessage, GameKind, PlayerSlot};
use duelhall_session::{GameRules, Outbound};

use crate::{Chess, RockPaperScissors, SnakeLadder, TicTacToe, Wordle};

/// Any one of the hosted games.
///
/// The server starts sessions with this type so that a single
/// `SessionManager` can run every variant.
#[derive(Debug, Clone)]
pub enum VariantState {
    Wordle(Wordle),
    Chess(Chess),
    SnakeLadder(SnakeLadder),
    TicTacToe(TicTacToe),
    RockPaperScissors(RockPaperScissors),
}

impl VariantState {
    /// Fresh state for `kind`.
    pub fn new(kind: GameKind) -> Self {
        match kind {
            GameKind::Wordle => Self::Wordle(Wordle::new()),
            GameKind::Chess => Self::Chess(Chess::new()),
            GameKind::SnakeLadder => Self::SnakeLadder(SnakeLadder::new()),
            GameKind::TicTacToe => Self::TicTacToe(TicTacToe::new()),
            GameKind::RockPaperScissors => Self::RockPaperScissors(RockPaperScissors::new()),
        }
    }

    fn rules(&self) -> &dyn GameRules {
        match self {
            Self::Wordle(g) => g,
            Self::Chess(g) => g,
            Self::SnakeLadder(g) => g,
            Self::TicTacToe(g) => g,
            Self::RockPaperScissors(g) => g,
        }
    }

    fn rules_mut(&mut self) -> &mut dyn GameRules {
        match self {
            Self::Wordle(g) => g,
            Self::Chess(g) => g,
            Self::SnakeLadder(g) => g,
            Self::TicTacToe(g) => g,
            Self::RockPaperScissors(g) => g,
        }
    }
}

impl GameRules for VariantState {
    fn kind(&self) -> GameKind {
        self.rules().kind()
    }

    fn start(&mut self) -> Vec<Outbound> {
        self.rules_mut().start()
    }

    fn accepts_from(&self, slot: PlayerSlot) -> bool {
        self.rules().accepts_from(slot)
    }

    fn handle_message(&mut self, slot: PlayerSlot, msg: ClientMessage) -> Vec<Outbound> {
        self.rules_mut().handle_message(slot, msg)
    }

    fn is_finished(&self) -> bool {
        self.rules().is_finished()
    }
}
