//! Chess: labelled pieces, basic movement rules, win by taking the king.
//!
//! Player one plays White and moves first. Moves name a piece by its
//! label and a destination square: `MOVE:P5W e4`. There is no check,
//! castling, en passant, or promotion; the game ends when a king is
//! captured.

mod board;

pub use board::{Board, MoveError, MoveOutcome, Piece, PieceKind, Side, Square};

use duelhall_protocol::{ClientMessage, GameKind, PlayerSlot, ServerMessage};
use duelhall_session::{GameRules, Outbound};

use crate::{all, to};

/// State of one chess match.
#[derive(Debug, Clone)]
pub struct Chess {
    board: Board,
    turn: Side,
    finished: bool,
}

impl Chess {
    /// A match from the standard starting position.
    pub fn new() -> Self {
        Self::with_board(Board::standard(), Side::White)
    }

    /// A match from an arbitrary position with `turn` to move.
    pub fn with_board(board: Board, turn: Side) -> Self {
        Self {
            board,
            turn,
            finished: false,
        }
    }

    /// The current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    fn slot_of(side: Side) -> PlayerSlot {
        match side {
            Side::White => PlayerSlot::One,
            Side::Black => PlayerSlot::Two,
        }
    }

    fn side_of(slot: PlayerSlot) -> Side {
        match slot {
            PlayerSlot::One => Side::White,
            PlayerSlot::Two => Side::Black,
        }
    }

    fn winner(side: Side, how: &str) -> ServerMessage {
        ServerMessage::Winner(format!("{} ({}) by {how}!", Self::slot_of(side), side.letter()))
    }
}

impl Default for Chess {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRules for Chess {
    fn kind(&self) -> GameKind {
        GameKind::Chess
    }

    fn start(&mut self) -> Vec<Outbound> {
        vec![
            all(ServerMessage::text("CHESS GAME STARTED!")),
            all(ServerMessage::Text(self.board.render())),
            to(Self::slot_of(self.turn), ServerMessage::Turn),
        ]
    }

    fn accepts_from(&self, slot: PlayerSlot) -> bool {
        !self.finished && Self::side_of(slot) == self.turn
    }

    fn handle_message(&mut self, slot: PlayerSlot, msg: ClientMessage) -> Vec<Outbound> {
        let side = Self::side_of(slot);
        let ClientMessage::Move { piece, dest } = msg else {
            return vec![
                to(
                    slot,
                    ServerMessage::text("Send moves as MOVE:<piece> <square>, e.g. MOVE:P5W e4"),
                ),
                to(slot, ServerMessage::Turn),
            ];
        };

        let outcome = match self.board.apply(side, &piece, &dest) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(%slot, %piece, %dest, error = %e, "illegal chess move");
                return vec![
                    to(slot, ServerMessage::Text(e.to_string())),
                    to(slot, ServerMessage::Turn),
                ];
            }
        };

        let feedback = match outcome {
            MoveOutcome::CapturedKing { by: PieceKind::Pawn } => {
                "Move successful: Pawn captured King!"
            }
            MoveOutcome::CapturedKing { .. } => "Move successful: King captured!",
            MoveOutcome::Moved => "Move successful",
        };

        let mut out = vec![
            to(slot, ServerMessage::text(feedback)),
            all(ServerMessage::Moved {
                player: slot,
                side: side.letter(),
                piece,
                dest,
            }),
            all(ServerMessage::BoardUpdate),
            all(ServerMessage::Text(self.board.render())),
        ];

        match outcome {
            MoveOutcome::CapturedKing { by: PieceKind::Pawn } => {
                self.finished = true;
                out.push(all(Self::winner(side, "pawn capturing king")));
            }
            MoveOutcome::CapturedKing { .. } => {
                self.finished = true;
                out.push(all(Self::winner(side, "capturing king")));
            }
            MoveOutcome::Moved => {
                if let Some(lost) = self.board.missing_king() {
                    self.finished = true;
                    out.push(all(Self::winner(lost.opposite(), "capturing king")));
                } else {
                    self.turn = side.opposite();
                    out.push(to(Self::slot_of(self.turn), ServerMessage::Turn));
                }
            }
        }
        out
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duelhall_protocol::Recipient;

    fn mv(piece: &str, dest: &str) -> ClientMessage {
        ClientMessage::Move {
            piece: piece.into(),
            dest: dest.into(),
        }
    }

    #[test]
    fn test_start_sends_board_and_turn_to_white() {
        let mut game = Chess::new();
        let out = game.start();

        assert_eq!(out.last(), Some(&to(PlayerSlot::One, ServerMessage::Turn)));
        assert!(game.accepts_from(PlayerSlot::One));
        assert!(!game.accepts_from(PlayerSlot::Two));
    }

    #[test]
    fn test_legal_move_announced_and_turn_passes() {
        let mut game = Chess::new();
        let out = game.handle_message(PlayerSlot::One, mv("P5W", "e4"));

        assert!(out.contains(&all(ServerMessage::Moved {
            player: PlayerSlot::One,
            side: 'W',
            piece: "P5W".into(),
            dest: "e4".into(),
        })));
        assert!(out.contains(&all(ServerMessage::BoardUpdate)));
        assert_eq!(out.last(), Some(&to(PlayerSlot::Two, ServerMessage::Turn)));
        assert!(game.accepts_from(PlayerSlot::Two));
    }

    #[test]
    fn test_illegal_move_keeps_turn_with_feedback() {
        let mut game = Chess::new();
        let out = game.handle_message(PlayerSlot::One, mv("R1W", "a2"));

        assert_eq!(
            out,
            vec![
                to(
                    PlayerSlot::One,
                    ServerMessage::text("Invalid move! Cannot capture your own piece.")
                ),
                to(PlayerSlot::One, ServerMessage::Turn),
            ]
        );
        assert!(game.accepts_from(PlayerSlot::One));
    }

    #[test]
    fn test_moving_opponents_piece_is_not_found() {
        let mut game = Chess::new();
        let out = game.handle_message(PlayerSlot::One, mv("P5B", "e5"));
        assert_eq!(
            out[0],
            to(PlayerSlot::One, ServerMessage::text("Piece not found or not yours!"))
        );
    }

    #[test]
    fn test_non_move_text_reprompts() {
        let mut game = Chess::new();
        let out = game.handle_message(PlayerSlot::One, ClientMessage::Text("hello".into()));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(r, _)| *r == Recipient::Player(PlayerSlot::One)));
    }

    #[test]
    fn test_pawn_capturing_king_wins_immediately() {
        let mut board = Board::empty();
        let sq = |s| Square::parse(s).unwrap();
        board.set(
            sq("e2"),
            Some(Piece { kind: PieceKind::King, side: Side::White, label: "KW" }),
        );
        board.set(
            sq("e8"),
            Some(Piece { kind: PieceKind::King, side: Side::Black, label: "KB" }),
        );
        // A black pawn diagonally in front of the white king.
        board.set(
            sq("d3"),
            Some(Piece { kind: PieceKind::Pawn, side: Side::Black, label: "P4B" }),
        );
        let mut game = Chess::with_board(board, Side::Black);

        let out = game.handle_message(PlayerSlot::Two, mv("P4B", "e2"));

        assert!(game.is_finished());
        assert_eq!(
            out.last(),
            Some(&all(ServerMessage::Winner(
                "Player 2 (B) by pawn capturing king!".into()
            )))
        );
    }

    #[test]
    fn test_queen_capturing_king_wins() {
        let mut board = Board::empty();
        let sq = |s| Square::parse(s).unwrap();
        board.set(
            sq("h5"),
            Some(Piece { kind: PieceKind::Queen, side: Side::White, label: "QW" }),
        );
        board.set(
            sq("e8"),
            Some(Piece { kind: PieceKind::King, side: Side::Black, label: "KB" }),
        );
        board.set(
            sq("e1"),
            Some(Piece { kind: PieceKind::King, side: Side::White, label: "KW" }),
        );
        let mut game = Chess::with_board(board, Side::White);

        let out = game.handle_message(PlayerSlot::One, mv("QW", "e8"));

        assert!(game.is_finished());
        assert!(out.contains(&to(
            PlayerSlot::One,
            ServerMessage::text("Move successful: King captured!")
        )));
        assert_eq!(
            out.last(),
            Some(&all(ServerMessage::Winner("Player 1 (W) by capturing king!".into())))
        );
    }

    #[test]
    fn test_position_without_king_ends_on_next_move() {
        // Black's king is already gone; White's next legal move ends it.
        let mut board = Board::empty();
        let sq = |s| Square::parse(s).unwrap();
        board.set(
            sq("e1"),
            Some(Piece { kind: PieceKind::King, side: Side::White, label: "KW" }),
        );
        let mut game = Chess::with_board(board, Side::White);

        let out = game.handle_message(PlayerSlot::One, mv("KW", "e2"));

        assert!(game.is_finished());
        assert_eq!(
            out.last(),
            Some(&all(ServerMessage::Winner("Player 1 (W) by capturing king!".into())))
        );
    }
}
