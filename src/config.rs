//! Session configuration.
//!
//! A `GameConfig` is read once when a session starts. Only
//! `mandatory_capture` reaches the rule engine; `move_hints` is a display
//! concern of the front end.

use crate::difficulty::Difficulty;
use crate::piece::Player;
use crate::rules::RuleEngine;

/// The side that always opens a game.
pub const FIRST_PLAYER: Player = Player::White;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub mandatory_capture: bool,
    pub move_hints: bool,
    /// Color the human plays. In vs-AI mode the engine takes the other one.
    pub human_color: Player,
    pub vs_ai: bool,
    /// Seed for the engine's random choices; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            mandatory_capture: true,
            move_hints: true,
            human_color: Player::White,
            vs_ai: true,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn ai_player(&self) -> Player {
        self.human_color.opposite()
    }

    /// True if the engine should move in a position where `to_move` is on turn.
    pub fn is_ai_turn(&self, to_move: Player) -> bool {
        self.vs_ai && to_move == self.ai_player()
    }

    /// A fresh rule engine for this configuration.
    pub fn new_engine(&self) -> RuleEngine {
        RuleEngine::new_game(FIRST_PLAYER, self.mandatory_capture)
    }
}
