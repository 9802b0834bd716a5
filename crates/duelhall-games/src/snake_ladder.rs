//! Snake & Ladder: race from square 0 to 100 on die rolls.
//!
//! Landing exactly on the start of a snake slides the player down; on the
//! start of a ladder, climbs up. A roll that would pass 100 is wasted, but
//! still uses the turn.

use duelhall_protocol::{BoardCell, ClientMessage, GameKind, Marker, PlayerSlot, ServerMessage};
use duelhall_session::{GameRules, Outbound};
use rand::Rng;

use crate::{all, to};

/// `(start, end)` of every snake.
pub const SNAKES: [(u32, u32); 10] = [
    (16, 6),
    (47, 26),
    (49, 11),
    (56, 53),
    (62, 19),
    (64, 60),
    (87, 24),
    (93, 73),
    (95, 75),
    (98, 78),
];

/// `(start, end)` of every ladder.
pub const LADDERS: [(u32, u32); 9] = [
    (1, 38),
    (4, 14),
    (9, 31),
    (21, 42),
    (28, 84),
    (36, 44),
    (51, 67),
    (71, 91),
    (80, 100),
];

/// The last square. Reaching it wins.
pub const GOAL: u32 = 100;

/// State of one snake & ladder race.
#[derive(Debug, Clone)]
pub struct SnakeLadder {
    positions: [u32; 2],
    turn: PlayerSlot,
    finished: bool,
}

impl SnakeLadder {
    /// Both players at square 0, player one to roll.
    pub fn new() -> Self {
        Self {
            positions: [0; 2],
            turn: PlayerSlot::One,
            finished: false,
        }
    }

    /// Current square of `slot`.
    pub fn position(&self, slot: PlayerSlot) -> u32 {
        self.positions[slot.index()]
    }

    /// Applies a die roll for the player whose turn it is.
    ///
    /// Split out from [`handle_message`](GameRules::handle_message) so the
    /// movement rules can be exercised with a known roll.
    pub fn apply_roll(&mut self, roll: u32) -> Vec<Outbound> {
        let slot = self.turn;
        let mut out = vec![all(ServerMessage::Rolled {
            player: slot,
            value: roll,
        })];

        let landed = self.positions[slot.index()] + roll;
        if landed <= GOAL {
            let mut finish = landed;
            if let Some(&(from, end)) = SNAKES.iter().find(|(start, _)| *start == landed) {
                finish = end;
                out.push(all(ServerMessage::Snake { player: slot, from, to: end }));
            } else if let Some(&(from, end)) = LADDERS.iter().find(|(start, _)| *start == landed) {
                finish = end;
                out.push(all(ServerMessage::Ladder { player: slot, from, to: end }));
            }
            self.positions[slot.index()] = finish;
        }

        out.push(all(ServerMessage::Positions(self.positions)));

        if self.positions[slot.index()] >= GOAL {
            self.finished = true;
            out.push(all(ServerMessage::Winner(slot.to_string())));
            return out;
        }

        self.turn = slot.other();
        out.push(to(self.turn, ServerMessage::Turn));
        out
    }

    /// The `BOARD:` snapshot: every square 1..=100 with its marker.
    pub fn board() -> Vec<BoardCell> {
        (1..=GOAL)
            .map(|square| {
                let marker = if SNAKES.iter().any(|(start, _)| *start == square) {
                    Marker::Snake
                } else if LADDERS.iter().any(|(start, _)| *start == square) {
                    Marker::Ladder
                } else {
                    Marker::Plain
                };
                BoardCell { square, marker }
            })
            .collect()
    }
}

impl Default for SnakeLadder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRules for SnakeLadder {
    fn kind(&self) -> GameKind {
        GameKind::SnakeLadder
    }

    fn start(&mut self) -> Vec<Outbound> {
        vec![
            all(ServerMessage::text("SNAKE AND LADDER GAME STARTED!")),
            all(ServerMessage::Board(Self::board())),
            all(ServerMessage::Positions(self.positions)),
            to(self.turn, ServerMessage::Turn),
        ]
    }

    fn accepts_from(&self, slot: PlayerSlot) -> bool {
        !self.finished && slot == self.turn
    }

    fn handle_message(&mut self, slot: PlayerSlot, msg: ClientMessage) -> Vec<Outbound> {
        if msg != ClientMessage::Roll {
            return vec![
                to(slot, ServerMessage::text("Send ROLL to roll the die.")),
                to(slot, ServerMessage::Turn),
            ];
        }
        let roll = rand::rng().random_range(1..=6);
        tracing::debug!(%slot, roll, "die rolled");
        self.apply_roll(roll)
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_one_from_zero_climbs_ladder_to_38() {
        let mut game = SnakeLadder::new();
        let out = game.apply_roll(1);

        assert_eq!(game.position(PlayerSlot::One), 38);
        assert!(out.contains(&all(ServerMessage::Ladder {
            player: PlayerSlot::One,
            from: 1,
            to: 38
        })));
        assert!(out.contains(&all(ServerMessage::Positions([38, 0]))));
        assert_eq!(out.last(), Some(&to(PlayerSlot::Two, ServerMessage::Turn)));
    }

    #[test]
    fn test_landing_on_snake_slides_down() {
        let mut game = SnakeLadder::new();
        game.positions = [14, 0];
        let out = game.apply_roll(2);

        assert_eq!(game.position(PlayerSlot::One), 6);
        assert!(out.contains(&all(ServerMessage::Snake {
            player: PlayerSlot::One,
            from: 16,
            to: 6
        })));
    }

    #[test]
    fn test_overshoot_leaves_position_unchanged_and_passes_turn() {
        let mut game = SnakeLadder::new();
        game.positions = [97, 0];
        let out = game.apply_roll(5);

        assert_eq!(game.position(PlayerSlot::One), 97);
        assert!(!game.is_finished());
        assert!(game.accepts_from(PlayerSlot::Two));
        assert_eq!(
            out[0],
            all(ServerMessage::Rolled {
                player: PlayerSlot::One,
                value: 5
            })
        );
    }

    #[test]
    fn test_exact_100_wins() {
        let mut game = SnakeLadder::new();
        game.positions = [0, 97];
        game.turn = PlayerSlot::Two;
        let out = game.apply_roll(3);

        assert!(game.is_finished());
        assert_eq!(out.last(), Some(&all(ServerMessage::Winner("Player 2".into()))));
    }

    #[test]
    fn test_ladder_to_100_wins() {
        let mut game = SnakeLadder::new();
        game.positions = [76, 0];
        game.apply_roll(4);

        assert_eq!(game.position(PlayerSlot::One), 100);
        assert!(game.is_finished());
        assert!(!game.accepts_from(PlayerSlot::Two));
    }

    #[test]
    fn test_handle_roll_moves_between_one_and_six() {
        let mut game = SnakeLadder::new();
        game.handle_message(PlayerSlot::One, ClientMessage::Roll);
        let pos = game.position(PlayerSlot::One);
        // Squares reachable from 0 with one die, after jumps.
        assert!([38, 2, 3, 14, 5, 6].contains(&pos), "unexpected square {pos}");
    }

    #[test]
    fn test_non_roll_reprompts_same_player() {
        let mut game = SnakeLadder::new();
        let out = game.handle_message(PlayerSlot::One, ClientMessage::Text("go".into()));
        assert_eq!(out.last(), Some(&to(PlayerSlot::One, ServerMessage::Turn)));
        assert!(game.accepts_from(PlayerSlot::One));
    }

    #[test]
    fn test_board_marks_snakes_and_ladders() {
        let cells = SnakeLadder::board();
        assert_eq!(cells.len(), 100);
        assert_eq!(cells[0], BoardCell { square: 1, marker: Marker::Ladder });
        assert_eq!(cells[1], BoardCell { square: 2, marker: Marker::Plain });
        assert_eq!(cells[15], BoardCell { square: 16, marker: Marker::Snake });
    }
}
