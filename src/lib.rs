//! Draughts-Engine: an 8x8 draughts rule engine with a tiered computer opponent.
//!
//! The rule engine enforces men and flying kings, optional or mandatory
//! capture, multi-jump chains and promotion. The search module picks moves
//! for the computer side at five difficulty tiers, from a random legal move
//! up to alpha-beta with quiescence.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation weights and score bounds
//! - [`piece`] - Players and cell contents
//! - [`moves`] - Moves and square notation
//! - [`board`] - The 8x8 grid
//! - [`rules`] - Legal move generation and the turn state machine
//! - [`difficulty`] - Strength tiers
//! - [`eval`] - Static evaluation
//! - [`search`] - Random, greedy and alpha-beta move selection
//! - [`config`] - Session settings
//! - [`protocol`] - Text protocol for playing a session
//! - [`error`] - Rule engine errors
//!
//! ## Example
//!
//! ```
//! use draughts_engine::difficulty::Difficulty;
//! use draughts_engine::piece::Player;
//! use draughts_engine::rules::RuleEngine;
//! use draughts_engine::search::AiEngine;
//!
//! // White opens, captures are mandatory
//! let mut engine = RuleEngine::new_game(Player::White, true);
//! assert_eq!(engine.legal_moves().len(), 7);
//!
//! // Let the computer pick a move for White and play it
//! let mut ai = AiEngine::new(Player::White);
//! let mv = ai.choose_move(&mut engine, Difficulty::Hard)?.expect("a legal move");
//! engine.apply_move(mv)?;
//! println!("White played {mv}");
//! # Ok::<(), draughts_engine::error::RulesError>(())
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod error;
pub mod eval;
pub mod moves;
pub mod piece;
pub mod protocol;
pub mod rules;
pub mod search;
