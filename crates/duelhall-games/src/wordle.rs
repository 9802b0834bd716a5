//! Wordle: both players take turns guessing one shared five-letter word.
//!
//! Feedback is positional only: a letter in the right place is shown,
//! every other position is `*`. Each player gets five guesses. The first
//! exact guess wins; if both players run out, nobody does.

use duelhall_protocol::{ClientMessage, GameKind, PlayerSlot, ServerMessage};
use duelhall_session::{GameRules, Outbound};
use rand::Rng;

use crate::{all, to};

/// The secrets a session can draw from.
pub const WORDS: [&str; 7] = ["APPLE", "GRAPE", "MANGO", "BERRY", "LEMON", "WATER", "ORBIT"];

/// Guesses each player gets.
pub const MAX_ATTEMPTS: u32 = 5;

const WORD_LEN: usize = 5;

/// State of one Wordle match.
#[derive(Debug, Clone)]
pub struct Wordle {
    secret: String,
    turn: PlayerSlot,
    attempts: [u32; 2],
    finished: bool,
}

impl Wordle {
    /// Starts a match with a secret drawn uniformly from [`WORDS`].
    pub fn new() -> Self {
        let secret = WORDS[rand::rng().random_range(0..WORDS.len())];
        Self::with_secret(secret)
    }

    /// Starts a match with a fixed secret. The secret is uppercased.
    pub fn with_secret(secret: &str) -> Self {
        Self {
            secret: secret.to_ascii_uppercase(),
            turn: PlayerSlot::One,
            attempts: [0; 2],
            finished: false,
        }
    }

    /// Guesses used so far by `slot`.
    pub fn attempts(&self, slot: PlayerSlot) -> u32 {
        self.attempts[slot.index()]
    }

    fn prompts(&self) -> Vec<Outbound> {
        vec![
            to(
                self.turn,
                ServerMessage::text(format!("Your turn, {}. Enter a 5-letter guess:", self.turn)),
            ),
            to(
                self.turn.other(),
                ServerMessage::text(format!("Waiting for {} to guess...", self.turn)),
            ),
        ]
    }
}

impl Default for Wordle {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares a guess with the secret position by position.
///
/// Both words must be the same length; extra characters are ignored.
pub fn feedback(guess: &str, secret: &str) -> String {
    guess
        .chars()
        .zip(secret.chars())
        .map(|(g, s)| if g == s { g } else { '*' })
        .collect()
}

/// Returns the uppercased guess if it is exactly five ASCII letters.
fn normalize(text: &str) -> Option<String> {
    let guess = text.trim();
    (guess.len() == WORD_LEN && guess.bytes().all(|b| b.is_ascii_alphabetic()))
        .then(|| guess.to_ascii_uppercase())
}

impl GameRules for Wordle {
    fn kind(&self) -> GameKind {
        GameKind::Wordle
    }

    fn start(&mut self) -> Vec<Outbound> {
        let mut out = vec![all(ServerMessage::text("WORDLE GAME STARTED!"))];
        out.extend(self.prompts());
        out
    }

    fn accepts_from(&self, slot: PlayerSlot) -> bool {
        !self.finished && slot == self.turn
    }

    fn handle_message(&mut self, slot: PlayerSlot, msg: ClientMessage) -> Vec<Outbound> {
        let ClientMessage::Text(text) = msg else {
            return vec![to(slot, ServerMessage::text("Invalid guess! Must be 5 letters."))];
        };
        let Some(guess) = normalize(&text) else {
            return vec![to(slot, ServerMessage::text("Invalid guess! Must be 5 letters."))];
        };

        self.attempts[slot.index()] += 1;
        let hint = feedback(&guess, &self.secret);
        let mut out = vec![all(ServerMessage::text(format!(
            "{slot} guessed: {guess}, Feedback: {hint}"
        )))];

        if guess == self.secret {
            self.finished = true;
            out.push(all(ServerMessage::Winner(format!(
                "{slot} wins! The word was: {}",
                self.secret
            ))));
            return out;
        }

        if self.attempts.iter().all(|&n| n >= MAX_ATTEMPTS) {
            self.finished = true;
            out.push(all(ServerMessage::GameOver(format!(
                "No one guessed the word: {}",
                self.secret
            ))));
            return out;
        }

        self.turn = slot.other();
        out.extend(self.prompts());
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

    fn guess(word: &str) -> ClientMessage {
        ClientMessage::Text(word.into())
    }

    fn broadcast_texts(out: &[Outbound]) -> Vec<String> {
        out.iter()
            .filter(|(r, _)| *r == Recipient::All)
            .map(|(_, m)| m.to_string())
            .collect()
    }

    #[test]
    fn test_feedback_keeps_exact_matches_only() {
        assert_eq!(feedback("GRAPE", "APPLE"), "****E");
        assert_eq!(feedback("MANGO", "MANGO"), "MANGO");
        assert_eq!(feedback("LEMON", "MELON"), "*E*ON");
    }

    #[test]
    fn test_new_draws_secret_from_word_list() {
        let game = Wordle::new();
        assert!(WORDS.contains(&game.secret.as_str()));
    }

    #[test]
    fn test_start_prompts_player_one() {
        let mut game = Wordle::with_secret("apple");
        let out = game.start();

        assert!(out.contains(&to(
            PlayerSlot::One,
            ServerMessage::text("Your turn, Player 1. Enter a 5-letter guess:")
        )));
        assert!(out.contains(&to(
            PlayerSlot::Two,
            ServerMessage::text("Waiting for Player 1 to guess...")
        )));
        assert!(game.accepts_from(PlayerSlot::One));
        assert!(!game.accepts_from(PlayerSlot::Two));
    }

    #[test]
    fn test_guess_is_uppercased_and_broadcast_with_feedback() {
        let mut game = Wordle::with_secret("APPLE");
        game.start();
        let out = game.handle_message(PlayerSlot::One, guess("grape"));

        assert_eq!(
            broadcast_texts(&out),
            vec!["Player 1 guessed: GRAPE, Feedback: ****E"]
        );
        assert_eq!(game.attempts(PlayerSlot::One), 1);
        assert!(game.accepts_from(PlayerSlot::Two));
    }

    #[test]
    fn test_invalid_guess_reprompts_without_using_attempt() {
        let mut game = Wordle::with_secret("APPLE");
        for bad in ["toolong", "abc", "ab1de"] {
            let out = game.handle_message(PlayerSlot::One, guess(bad));
            assert_eq!(
                out,
                vec![to(
                    PlayerSlot::One,
                    ServerMessage::text("Invalid guess! Must be 5 letters.")
                )]
            );
        }
        assert_eq!(game.attempts(PlayerSlot::One), 0);
        assert!(game.accepts_from(PlayerSlot::One));
    }

    #[test]
    fn test_exact_guess_wins() {
        let mut game = Wordle::with_secret("MANGO");
        game.handle_message(PlayerSlot::One, guess("APPLE"));
        let out = game.handle_message(PlayerSlot::Two, guess("mango"));

        assert!(game.is_finished());
        assert_eq!(
            out.last(),
            Some(&all(ServerMessage::Winner(
                "Player 2 wins! The word was: MANGO".into()
            )))
        );
    }

    #[test]
    fn test_both_players_out_of_attempts_is_game_over() {
        let mut game = Wordle::with_secret("ORBIT");
        let mut last = Vec::new();
        for _ in 0..MAX_ATTEMPTS {
            game.handle_message(PlayerSlot::One, guess("APPLE"));
            assert!(!game.is_finished());
            last = game.handle_message(PlayerSlot::Two, guess("LEMON"));
        }

        assert!(game.is_finished());
        assert_eq!(
            last.last(),
            Some(&all(ServerMessage::GameOver(
                "No one guessed the word: ORBIT".into()
            )))
        );
    }
}
