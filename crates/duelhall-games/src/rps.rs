//! Rock-paper-scissors, best of three.
//!
//! Both players choose each round without seeing the other's choice; the
//! verdict is announced once both are in. Ties score nothing. The first
//! player to two round wins takes the game, so a 2–0 lead ends it without
//! a third round.

use std::fmt;
use std::str::FromStr;

use duelhall_protocol::{ClientMessage, GameKind, PlayerSlot, ServerMessage};
use duelhall_session::{GameRules, Outbound};

use crate::{all, to};

/// Rounds in a full match.
pub const BEST_OF: u32 = 3;

/// Round wins needed to take the match.
pub const WINS_NEEDED: u32 = BEST_OF / 2 + 1;

/// One hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Stone,
    Paper,
    Scissors,
}

impl Choice {
    /// Returns `true` if `self` beats `other`.
    pub fn beats(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Stone, Self::Scissors) | (Self::Scissors, Self::Paper) | (Self::Paper, Self::Stone)
        )
    }
}

impl FromStr for Choice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STONE" => Ok(Self::Stone),
            "PAPER" => Ok(Self::Paper),
            "SCISSORS" => Ok(Self::Scissors),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stone => "STONE",
            Self::Paper => "PAPER",
            Self::Scissors => "SCISSORS",
        })
    }
}

/// State of one rock-paper-scissors match.
#[derive(Debug, Clone)]
pub struct RockPaperScissors {
    round: u32,
    /// This round's choices, indexed by slot.
    choices: [Option<Choice>; 2],
    score: [u32; 2],
    finished: bool,
}

impl RockPaperScissors {
    /// A match that hasn't started: no score, no choices. The opening
    /// banner goes out with the first round.
    pub fn new() -> Self {
        Self {
            round: 0,
            choices: [None; 2],
            score: [0; 2],
            finished: false,
        }
    }

    /// Round wins so far, indexed by slot.
    pub fn score(&self) -> [u32; 2] {
        self.score
    }

    /// The round being played (1-based).
    pub fn round(&self) -> u32 {
        self.round
    }

    fn next_round(&mut self) -> Outbound {
        self.round += 1;
        self.choices = [None; 2];
        all(ServerMessage::text(format!(
            "--- Round {} ---\nEnter STONE, PAPER, or SCISSORS:",
            self.round
        )))
    }

    /// Announces the verdict once both choices are in.
    fn resolve(&mut self, p1: Choice, p2: Choice) -> Vec<Outbound> {
        let result = if p1.beats(p2) {
            self.score[0] += 1;
            "Player 1 wins!"
        } else if p2.beats(p1) {
            self.score[1] += 1;
            "Player 2 wins!"
        } else {
            "It's a tie!"
        };

        let mut out = vec![
            all(ServerMessage::text(format!("Player 1 chose: {p1}"))),
            all(ServerMessage::text(format!("Player 2 chose: {p2}"))),
            all(ServerMessage::text(format!("Result: {result}"))),
            all(ServerMessage::text(format!(
                "Score: Player 1 [{}] - Player 2 [{}]",
                self.score[0], self.score[1]
            ))),
        ];

        let champion = PlayerSlot::BOTH
            .into_iter()
            .find(|slot| self.score[slot.index()] >= WINS_NEEDED);
        match champion {
            Some(slot) => {
                self.finished = true;
                out.push(all(ServerMessage::Winner(format!("{slot} wins the game!"))));
            }
            None => out.push(self.next_round()),
        }
        out
    }
}

impl Default for RockPaperScissors {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRules for RockPaperScissors {
    fn kind(&self) -> GameKind {
        GameKind::RockPaperScissors
    }

    fn start(&mut self) -> Vec<Outbound> {
        vec![
            all(ServerMessage::text("ROCK PAPER SCISSORS GAME STARTED!")),
            self.next_round(),
        ]
    }

    /// Each player may choose once per round, in either order.
    fn accepts_from(&self, slot: PlayerSlot) -> bool {
        !self.finished && self.choices[slot.index()].is_none()
    }

    fn handle_message(&mut self, slot: PlayerSlot, msg: ClientMessage) -> Vec<Outbound> {
        let choice = match &msg {
            ClientMessage::Text(text) => text.parse::<Choice>().ok(),
            _ => None,
        };
        let Some(choice) = choice else {
            return vec![to(
                slot,
                ServerMessage::text("Invalid choice! Enter STONE, PAPER, or SCISSORS:"),
            )];
        };

        self.choices[slot.index()] = Some(choice);
        match self.choices {
            [Some(p1), Some(p2)] => self.resolve(p1, p2),
            _ => vec![to(
                slot,
                ServerMessage::text(format!("You chose {choice}. Waiting for {}...", slot.other())),
            )],
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
