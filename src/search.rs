//! Move selection for the computer side.
//!
//! Three tiers of play, chosen by [`Difficulty::search_depth`]:
//! - depth 0: a uniformly random legal move
//! - depth 1: one ply of lookahead scored by the static evaluation
//! - depth 2 and up: minimax with alpha-beta pruning, extended at the
//!   horizon by a capture-only quiescence search
//!
//! Every simulated move runs inside a [`RuleEngine::trial`] guard, so the
//! live engine handed to [`Strategy::choose_move`] is left exactly as it was
//! on every return path, including errors and pruning cutoffs.

use tracing::{debug, trace};

use crate::constants::{LOSS_SCORE, WIN_SCORE};
use crate::difficulty::Difficulty;
use crate::error::RulesError;
use crate::eval::evaluate;
use crate::moves::Move;
use crate::piece::Player;
use crate::rules::RuleEngine;

/// A move-selection policy.
pub trait Strategy {
    /// Choose a move for `ai_player` in the engine's current position.
    ///
    /// Implementations may simulate moves on `engine` but must restore it
    /// before returning. Returns `None` when there is no legal move.
    fn choose_move(
        &mut self,
        engine: &mut RuleEngine,
        ai_player: Player,
        difficulty: Difficulty,
    ) -> Result<Option<Move>, RulesError>;
}

/// Score of a finished game from `ai_player`'s point of view.
///
/// `bonus` is the remaining search depth: an earlier win scores higher and an
/// earlier loss scores lower.
#[inline]
fn terminal_score(winner: Player, ai_player: Player, bonus: u32) -> i32 {
    if winner == ai_player {
        WIN_SCORE + bonus as i32
    } else {
        LOSS_SCORE - bonus as i32
    }
}

/// The default strategy: random, greedy, or alpha-beta by tier.
pub struct TieredStrategy {
    rng: fastrand::Rng,
    nodes: u64,
}

impl Default for TieredStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl TieredStrategy {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
            nodes: 0,
        }
    }

    /// A strategy with reproducible tie-breaking and random picks.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            nodes: 0,
        }
    }

    /// Number of positions visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn pick(&mut self, candidates: &[Move], randomize: bool) -> Option<Move> {
        match candidates.len() {
            0 => None,
            1 => Some(candidates[0]),
            n if randomize => Some(candidates[self.rng.usize(..n)]),
            _ => Some(candidates[0]),
        }
    }

    fn choose_random(&mut self, moves: &[Move]) -> Option<Move> {
        self.pick(moves, true)
    }

    /// One ply: apply each move, score the result, keep the best.
    fn choose_greedy(
        &mut self,
        engine: &mut RuleEngine,
        ai_player: Player,
        moves: &[Move],
        difficulty: Difficulty,
    ) -> Result<Option<Move>, RulesError> {
        let mut best_score = i32::MIN;
        let mut best_moves = Vec::new();

        for &mv in moves {
            self.nodes += 1;
            let score = {
                let mut trial = engine.trial();
                match trial.apply_move(mv)?.winner() {
                    Some(winner) => terminal_score(winner, ai_player, 0),
                    None => evaluate(trial.board(), ai_player),
                }
            };

            if score > best_score {
                best_score = score;
                best_moves.clear();
            }
            if score == best_score {
                best_moves.push(mv);
            }
        }

        debug!(best_score, candidates = best_moves.len(), "greedy search done");
        Ok(self.pick(&best_moves, difficulty.randomness_allowed()))
    }

    /// Alpha-beta from the root, each root move searched with a full window.
    fn choose_minimax(
        &mut self,
        engine: &mut RuleEngine,
        ai_player: Player,
        moves: &[Move],
        difficulty: Difficulty,
    ) -> Result<Option<Move>, RulesError> {
        let depth = difficulty.search_depth().max(1);
        let mut best_score = i32::MIN;
        let mut best_moves = Vec::new();

        for &mv in moves {
            self.nodes += 1;
            let score = {
                let mut trial = engine.trial();
                match trial.apply_move(mv)?.winner() {
                    Some(winner) => terminal_score(winner, ai_player, depth),
                    None => self.alpha_beta(&mut trial, ai_player, depth - 1, i32::MIN, i32::MAX)?,
                }
            };
            trace!(%mv, score, "root move scored");

            if score > best_score {
                best_score = score;
                best_moves.clear();
            }
            if score == best_score {
                best_moves.push(mv);
            }
        }

        debug!(best_score, depth, nodes = self.nodes, "alpha-beta search done");
        Ok(self.pick(&best_moves, difficulty.randomness_allowed()))
    }

    /// Minimax with alpha-beta pruning; `depth` is the remaining depth.
    ///
    /// Maximizes on `ai_player`'s turns. At depth 0 the position is handed
    /// to [`Self::quiescence`] rather than evaluated flat.
    fn alpha_beta(
        &mut self,
        engine: &mut RuleEngine,
        ai_player: Player,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, RulesError> {
        if depth == 0 {
            return self.quiescence(engine, ai_player, alpha, beta);
        }

        let moves = engine.legal_moves().to_vec();
        if moves.is_empty() {
            let winner = engine.current_player().opposite();
            return Ok(terminal_score(winner, ai_player, depth));
        }

        let maximizing = engine.current_player() == ai_player;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            self.nodes += 1;
            let score = {
                let mut trial = engine.trial();
                match trial.apply_move(mv)?.winner() {
                    Some(winner) => terminal_score(winner, ai_player, depth),
                    None => self.alpha_beta(&mut trial, ai_player, depth - 1, alpha, beta)?,
                }
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        Ok(best)
    }

    /// Resolve captures past the horizon.
    ///
    /// The static evaluation serves as a stand-pat bound only when the side
    /// to move may decline to capture. When a capture is forced (mandatory
    /// rule or an active chain) there is no quiet alternative, so at least
    /// one capture continuation is always searched.
    ///
    /// This departs from the plain stand-pat scheme, which takes the early
    /// cutoff in every position, forced or not.
    fn quiescence(
        &mut self,
        engine: &mut RuleEngine,
        ai_player: Player,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, RulesError> {
        if engine.legal_moves().is_empty() {
            let winner = engine.current_player().opposite();
            return Ok(terminal_score(winner, ai_player, 0));
        }

        let maximizing = engine.current_player() == ai_player;
        let forced = engine.must_capture();
        let stand_pat = evaluate(engine.board(), ai_player);

        let mut best = stand_pat;
        if forced {
            best = if maximizing { i32::MIN } else { i32::MAX };
        } else if maximizing {
            if stand_pat >= beta {
                return Ok(stand_pat);
            }
            alpha = alpha.max(stand_pat);
        } else {
            if stand_pat <= alpha {
                return Ok(stand_pat);
            }
            beta = beta.min(stand_pat);
        }

        let captures: Vec<Move> = engine
            .legal_moves()
            .iter()
            .filter(|m| m.is_capture())
            .copied()
            .collect();
        if captures.is_empty() {
            return Ok(stand_pat);
        }

        for mv in captures {
            self.nodes += 1;
            let score = {
                let mut trial = engine.trial();
                match trial.apply_move(mv)?.winner() {
                    Some(winner) => terminal_score(winner, ai_player, 0),
                    None => self.quiescence(&mut trial, ai_player, alpha, beta)?,
                }
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}

impl Strategy for TieredStrategy {
    fn choose_move(
        &mut self,
        engine: &mut RuleEngine,
        ai_player: Player,
        difficulty: Difficulty,
    ) -> Result<Option<Move>, RulesError> {
        self.nodes = 0;
        let moves = engine.legal_moves().to_vec();
        if moves.is_empty() {
            return Ok(None);
        }

        match difficulty.search_depth() {
            0 => Ok(self.choose_random(&moves)),
            1 => self.choose_greedy(engine, ai_player, &moves, difficulty),
            _ => self.choose_minimax(engine, ai_player, &moves, difficulty),
        }
    }
}

/// The computer opponent: a side to play for plus a strategy.
pub struct AiEngine<S: Strategy = TieredStrategy> {
    ai_player: Player,
    strategy: S,
}

impl AiEngine<TieredStrategy> {
    pub fn new(ai_player: Player) -> Self {
        Self::with_strategy(ai_player, TieredStrategy::new())
    }
}

impl<S: Strategy> AiEngine<S> {
    pub fn with_strategy(ai_player: Player, strategy: S) -> Self {
        Self { ai_player, strategy }
    }

    pub fn ai_player(&self) -> Player {
        self.ai_player
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Choose a move at the given tier.
    ///
    /// Returns `None` if it is not this engine's turn or there is no legal
    /// move. The engine state is unchanged on return.
    pub fn choose_move(
        &mut self,
        engine: &mut RuleEngine,
        difficulty: Difficulty,
    ) -> Result<Option<Move>, RulesError> {
        if engine.current_player() != self.ai_player {
            return Ok(None);
        }
        let chosen = self.strategy.choose_move(engine, self.ai_player, difficulty)?;
        if let Some(mv) = chosen {
            debug!(%mv, %difficulty, player = %self.ai_player, "engine move");
        }
        Ok(chosen)
    }

    /// Same as [`Self::choose_move`], with the tier given as a level index.
    pub fn choose_move_for_level(
        &mut self,
        engine: &mut RuleEngine,
        level: i32,
    ) -> Result<Option<Move>, RulesError> {
        self.choose_move(engine, Difficulty::from_level_index(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::piece::PieceType;

    #[test]
    fn test_terminal_score_prefers_fast_wins() {
        let win = |bonus| terminal_score(Player::White, Player::White, bonus);
        let loss = |bonus| terminal_score(Player::Black, Player::White, bonus);
        assert!(win(3) > win(1));
        assert!(loss(3) < loss(1));
        assert!(loss(0) < win(0));
    }

    #[test]
    fn test_not_our_turn() {
        let mut engine = RuleEngine::new_game(Player::White, true);
        let mut ai = AiEngine::new(Player::Black);
        assert_eq!(ai.choose_move(&mut engine, Difficulty::Hard), Ok(None));
    }

    #[test]
    fn test_quiescence_explores_forced_capture() {
        // White to move must capture (4,3)x(3,4); Black then recaptures nothing.
        let mut board = Board::new();
        board.set(4, 3, PieceType::WhiteMan).unwrap();
        board.set(3, 4, PieceType::BlackMan).unwrap();
        board.set(0, 1, PieceType::BlackMan).unwrap();
        let mut engine = RuleEngine::new(board, Player::White, true);
        let mut strategy = TieredStrategy::with_seed(7);

        let stand_pat = evaluate(engine.board(), Player::White);
        // A window the stand-pat value already fails high against.
        let score = strategy
            .quiescence(&mut engine, Player::White, i32::MIN, stand_pat - 1)
            .unwrap();
        assert!(strategy.nodes() >= 1);
        assert!(score > stand_pat);
    }
}
