//! Tic-tac-toe on a 3×3 grid. Player one is X and moves first.

use std::fmt;

use duelhall_protocol::{ClientMessage, GameKind, PlayerSlot, ServerMessage};
use duelhall_session::{GameRules, Outbound};

use crate::{all, to};

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    fn of(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self::X,
            PlayerSlot::Two => Self::O,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::O => f.write_str("O"),
        }
    }
}

/// Every winning line, as `(row, col)` triples.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// State of one tic-tac-toe match.
#[derive(Debug, Clone)]
pub struct TicTacToe {
    cells: [[Option<Mark>; 3]; 3],
    turn: PlayerSlot,
    finished: bool,
}

impl TicTacToe {
    /// An empty grid, X to move.
    pub fn new() -> Self {
        Self {
            cells: [[None; 3]; 3],
            turn: PlayerSlot::One,
            finished: false,
        }
    }

    /// The mark at `(row, col)`, if any.
    pub fn cell(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells[row][col]
    }

    fn has_line(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&(r, c)| self.cells[r][c] == Some(mark)))
    }

    fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    /// The grid as three rows of text separated by rules.
    pub fn render(&self) -> String {
        let row = |r: &[Option<Mark>; 3]| {
            r.iter()
                .map(|cell| match cell {
                    Some(mark) => format!(" {mark} "),
                    None => "   ".to_string(),
                })
                .collect::<Vec<_>>()
                .join("|")
        };
        self.cells
            .iter()
            .map(row)
            .collect::<Vec<_>>()
            .join("\n---|---|---\n")
    }

    fn prompt(&self) -> Outbound {
        to(
            self.turn,
            ServerMessage::text(format!(
                "Your turn Player {}. Enter row and col (0-2 0-2):",
                Mark::of(self.turn)
            )),
        )
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRules for TicTacToe {
    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    fn start(&mut self) -> Vec<Outbound> {
        vec![
            all(ServerMessage::text("TIC TAC TOE GAME STARTED!")),
            all(ServerMessage::Text(self.render())),
            self.prompt(),
        ]
    }

    fn accepts_from(&self, slot: PlayerSlot) -> bool {
        !self.finished && slot == self.turn
    }

    fn handle_message(&mut self, slot: PlayerSlot, msg: ClientMessage) -> Vec<Outbound> {
        let target = match msg {
            ClientMessage::Place { row, col } => usize::try_from(row)
                .ok()
                .zip(usize::try_from(col).ok())
                .filter(|&(r, c)| r < 3 && c < 3 && self.cells[r][c].is_none()),
            _ => None,
        };
        let Some((row, col)) = target else {
            return vec![to(
                slot,
                ServerMessage::text("Invalid move. Try again (format: row col):"),
            )];
        };

        let mark = Mark::of(slot);
        self.cells[row][col] = Some(mark);
        let mut out = vec![all(ServerMessage::Text(self.render()))];

        if self.has_line(mark) {
            self.finished = true;
            out.push(all(ServerMessage::Winner(format!("Player {mark} wins!"))));
        } else if self.is_full() {
            self.finished = true;
            out.push(all(ServerMessage::GameOver("It's a draw!".into())));
        } else {
            self.turn = slot.other();
            out.push(self.prompt());
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

    fn place(row: i64, col: i64) -> ClientMessage {
        ClientMessage::Place { row, col }
    }

    /// Plays alternating moves starting with X.
    fn play(game: &mut TicTacToe, moves: &[(i64, i64)]) -> Vec<Outbound> {
        let mut last = Vec::new();
        for &(r, c) in moves {
            let slot = game.turn;
            last = game.handle_message(slot, place(r, c));
        }
        last
    }

    #[test]
    fn test_start_prompts_x() {
        let mut game = TicTacToe::new();
        let out = game.start();
        assert_eq!(
            out.last(),
            Some(&to(
                PlayerSlot::One,
                ServerMessage::text("Your turn Player X. Enter row and col (0-2 0-2):")
            ))
        );
    }

    #[test]
    fn test_row_zero_win_for_x() {
        let mut game = TicTacToe::new();
        let out = play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);

        assert!(game.is_finished());
        assert_eq!(out.last(), Some(&all(ServerMessage::Winner("Player X wins!".into()))));
    }

    #[test]
    fn test_diagonal_win_for_o() {
        let mut game = TicTacToe::new();
        let out = play(&mut game, &[(0, 1), (0, 0), (0, 2), (1, 1), (1, 0), (2, 2)]);

        assert!(game.is_finished());
        assert_eq!(out.last(), Some(&all(ServerMessage::Winner("Player O wins!".into()))));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut game = TicTacToe::new();
        // X O X / X O O / O X X
        let out = play(
            &mut game,
            &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
        );

        assert!(game.is_finished());
        assert_eq!(out.last(), Some(&all(ServerMessage::GameOver("It's a draw!".into()))));
    }

    #[test]
    fn test_invalid_moves_reprompt_same_player() {
        let mut game = TicTacToe::new();
        game.handle_message(PlayerSlot::One, place(1, 1));

        for bad in [place(1, 1), place(3, 0), place(0, -1), ClientMessage::Text("a b".into())] {
            let out = game.handle_message(PlayerSlot::Two, bad);
            assert_eq!(
                out,
                vec![to(
                    PlayerSlot::Two,
                    ServerMessage::text("Invalid move. Try again (format: row col):")
                )]
            );
            assert!(game.accepts_from(PlayerSlot::Two));
        }
        assert_eq!(game.cell(1, 1), Some(Mark::X));
    }

    #[test]
    fn test_render_after_move() {
        let mut game = TicTacToe::new();
        game.handle_message(PlayerSlot::One, place(0, 2));
        assert_eq!(
            game.render(),
            "   |   | X \n---|---|---\n   |   |   \n---|---|---\n   |   |   "
        );
    }
}
