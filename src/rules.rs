//! Rule engine: legal move generation, move execution, and game state.
//!
//! This module provides the core game logic for forced-capture draughts:
//! - Man moves (forward quiet steps, captures in all four directions)
//! - King moves (long-range slides and long-range captures with landing
//!   selection by capture count)
//! - Mandatory capture and multi-jump chains
//! - Promotion, terminal detection, and snapshot/restore
//!
//! The engine owns a single live [`Board`] and mutates it in place. Search
//! code simulates moves against that same board, bracketing every trial with
//! a [`Snapshot`] and a restore; [`RuleEngine::trial`] packages that pairing
//! as a guard so the restore also happens on early exits.

use std::cell::OnceCell;
use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::board::{Board, Cell};
use crate::constants::DIAGONALS;
use crate::error::RulesError;
use crate::moves::Move;
use crate::piece::{PieceType, Player};

/// Where the game stands for the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Any of the mover's pieces may move.
    NormalTurn,
    /// A capture chain is active; only the piece on this cell may move.
    ChainCaptureInProgress { row: usize, col: usize },
    /// The side to move has no legal move.
    GameOver { winner: Player },
}

/// Result of [`RuleEngine::apply_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The same piece must capture again; the mover is unchanged.
    ChainContinues,
    /// The turn passed to the opponent.
    TurnPassed,
    /// The opponent has no legal move left.
    GameOver { winner: Player },
}

impl MoveOutcome {
    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            MoveOutcome::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    #[inline]
    pub fn is_game_over(self) -> bool {
        matches!(self, MoveOutcome::GameOver { .. })
    }
}

/// Value copy of the engine state.
///
/// Owns its own board copy and never aliases the live one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    board: Board,
    current_player: Player,
    chain: Option<Cell>,
}

impl Snapshot {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move when the snapshot was taken.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn chain_cell(&self) -> Option<Cell> {
        self.chain
    }
}

/// The draughts state machine.
#[derive(Debug)]
pub struct RuleEngine {
    board: Board,
    current_player: Player,
    mandatory_capture: bool,
    /// Cell of the piece that must keep capturing, if a chain is active.
    chain: Option<Cell>,
    /// Legal moves for the current state; reset on every state change.
    moves_cache: OnceCell<Vec<Move>>,
}

impl RuleEngine {
    /// Start from an arbitrary position (e.g. a restored game).
    pub fn new(board: Board, starting_player: Player, mandatory_capture: bool) -> Self {
        Self {
            board,
            current_player: starting_player,
            mandatory_capture,
            chain: None,
            moves_cache: OnceCell::new(),
        }
    }

    /// Start a fresh game from the initial position.
    pub fn new_game(starting_player: Player, mandatory_capture: bool) -> Self {
        debug!(%starting_player, mandatory_capture, "new game");
        Self::new(Board::initial(), starting_player, mandatory_capture)
    }

    /// The live board, read-only.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn mandatory_capture(&self) -> bool {
        self.mandatory_capture
    }

    /// Cell of the piece pinned by an active capture chain.
    pub fn chain_cell(&self) -> Option<Cell> {
        self.chain
    }

    /// True when the side to move is forced to capture right now.
    pub fn must_capture(&self) -> bool {
        let any_capture = self.legal_moves().iter().any(Move::is_capture);
        any_capture && (self.chain.is_some() || self.mandatory_capture)
    }

    pub fn phase(&self) -> Phase {
        if self.legal_moves().is_empty() {
            return Phase::GameOver {
                winner: self.current_player.opposite(),
            };
        }
        match self.chain {
            Some((row, col)) => Phase::ChainCaptureInProgress { row, col },
            None => Phase::NormalTurn,
        }
    }

    /// All legal moves for the side to move.
    ///
    /// During a chain only the pinned piece's further captures are returned.
    /// With mandatory capture enabled, any capture on the board excludes
    /// every quiet move.
    pub fn legal_moves(&self) -> &[Move] {
        self.moves_cache.get_or_init(|| self.generate_moves())
    }

    /// The legal moves that start on `(row, col)`.
    pub fn moves_for_cell(&self, row: usize, col: usize) -> Vec<Move> {
        if let Some(pinned) = self.chain {
            if pinned != (row, col) {
                return Vec::new();
            }
        }
        self.legal_moves()
            .iter()
            .filter(|m| m.starts_at(row, col))
            .copied()
            .collect()
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves().contains(mv)
    }

    /// Find the legal move from `from` to `to`, if any.
    ///
    /// Origin and destination identify a legal move uniquely: a single jump
    /// removes exactly one piece between them.
    pub fn find_move(&self, from: Cell, to: Cell) -> Option<Move> {
        self.legal_moves()
            .iter()
            .find(|m| m.from() == from && m.to() == to)
            .copied()
    }

    /// Apply a legal move.
    ///
    /// # Errors
    /// - [`RulesError::IllegalMove`] if the move is not legal for the side to
    ///   move, uses a piece the mover does not own, or ignores the pinned
    ///   piece of an active chain
    /// - [`RulesError::InconsistentState`] if the captured cell does not hold
    ///   an opponent piece
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, RulesError> {
        let (from_row, from_col) = mv.from();
        let (to_row, _) = mv.to();
        let piece = self
            .board
            .get(from_row, from_col)
            .map_err(|_| RulesError::IllegalMove(mv))?;
        if !piece.belongs_to(self.current_player) {
            return Err(RulesError::IllegalMove(mv));
        }
        if self.chain.is_some_and(|pinned| pinned != mv.from()) {
            return Err(RulesError::IllegalMove(mv));
        }
        if !self.is_legal(&mv) {
            return Err(RulesError::IllegalMove(mv));
        }

        if let Some(victim) = mv.captured() {
            let captured = self.board.at(victim);
            if !captured.is_opponent_of(self.current_player) {
                return Err(RulesError::InconsistentState(format!(
                    "{mv} captures {captured:?} at ({},{})",
                    victim.0, victim.1
                )));
            }
        }

        self.board.put(mv.from(), PieceType::Empty);
        if let Some(victim) = mv.captured() {
            self.board.put(victim, PieceType::Empty);
        }

        let landed = piece.promoted_at(to_row);
        self.board.put(mv.to(), landed);
        self.moves_cache = OnceCell::new();

        if mv.is_capture() {
            let further = captures_for_piece(&self.board, mv.to(), self.current_player);
            if !further.is_empty() {
                self.chain = Some(mv.to());
                self.moves_cache = OnceCell::from(further);
                return Ok(MoveOutcome::ChainContinues);
            }
        }

        let mover = self.current_player;
        self.chain = None;
        self.current_player = mover.opposite();

        if self.legal_moves().is_empty() {
            debug!(winner = %mover, "game over");
            return Ok(MoveOutcome::GameOver { winner: mover });
        }
        Ok(MoveOutcome::TurnPassed)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current_player: self.current_player,
            chain: self.chain,
        }
    }

    /// Overwrite the live state from a snapshot.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.board.copy_from(&snapshot.board);
        self.current_player = snapshot.current_player;
        self.chain = snapshot.chain;
        self.moves_cache = OnceCell::new();
    }

    /// Snapshot the engine and return a guard that restores it when dropped.
    ///
    /// Moves applied through the guard are visible until it goes out of
    /// scope, on every exit path.
    pub fn trial(&mut self) -> Trial<'_> {
        let snapshot = self.snapshot();
        Trial {
            engine: self,
            snapshot,
        }
    }

    fn generate_moves(&self) -> Vec<Move> {
        let player = self.current_player;

        if let Some(pinned) = self.chain {
            let captures = captures_for_piece(&self.board, pinned, player);
            if captures.is_empty() {
                warn!(row = pinned.0, col = pinned.1, "capture chain has no continuation");
            }
            return captures;
        }

        let mut captures = Vec::new();
        let mut quiet = Vec::new();
        for (cell, piece) in self.board.iter() {
            if piece.belongs_to(player) {
                piece_moves(&self.board, cell, player, &mut captures, &mut quiet);
            }
        }

        if captures.is_empty() {
            quiet
        } else if self.mandatory_capture {
            captures
        } else {
            captures.extend(quiet);
            captures
        }
    }
}

/// Scoped snapshot over a [`RuleEngine`]; restores the engine on drop.
pub struct Trial<'a> {
    engine: &'a mut RuleEngine,
    snapshot: Snapshot,
}

impl Deref for Trial<'_> {
    type Target = RuleEngine;

    fn deref(&self) -> &RuleEngine {
        self.engine
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut RuleEngine {
        self.engine
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.engine.restore(&self.snapshot);
    }
}

// =============================================================================
// Move generation (pure functions over a board)
// =============================================================================

/// Collect the captures and quiet moves of the piece on `cell`.
///
/// No filtering by the mandatory-capture rule happens here.
fn piece_moves(
    board: &Board,
    cell: Cell,
    owner: Player,
    captures: &mut Vec<Move>,
    quiet: &mut Vec<Move>,
) {
    let piece = board.at(cell);
    if !piece.belongs_to(owner) {
        return;
    }
    if piece.is_king() {
        king_captures(board, cell, owner, captures);
        king_slides(board, cell, quiet);
    } else {
        man_captures(board, cell, owner, captures);
        man_steps(board, cell, owner, quiet);
    }
}

/// Only the captures available to the piece on `cell`.
fn captures_for_piece(board: &Board, cell: Cell, owner: Player) -> Vec<Move> {
    let mut captures = Vec::new();
    let piece = board.at(cell);
    if !piece.belongs_to(owner) {
        return captures;
    }
    if piece.is_king() {
        king_captures(board, cell, owner, &mut captures);
    } else {
        man_captures(board, cell, owner, &mut captures);
    }
    captures
}

fn man_captures(board: &Board, (row, col): Cell, owner: Player, out: &mut Vec<Move>) {
    for dir in DIAGONALS {
        let (Some(mid), Some(landing)) =
            (Board::offset(row, col, dir, 1), Board::offset(row, col, dir, 2))
        else {
            continue;
        };
        if board.at(mid).is_opponent_of(owner) && board.at(landing).is_empty() {
            out.push(Move::jump(row, col, landing.0, landing.1, mid.0, mid.1));
        }
    }
}

fn man_steps(board: &Board, (row, col): Cell, owner: Player, out: &mut Vec<Move>) {
    for dc in [-1, 1] {
        if let Some(to) = Board::offset(row, col, (owner.forward(), dc), 1) {
            if board.at(to).is_empty() {
                out.push(Move::step(row, col, to.0, to.1));
            }
        }
    }
}

fn king_slides(board: &Board, (row, col): Cell, out: &mut Vec<Move>) {
    for dir in DIAGONALS {
        for steps in 1.. {
            match Board::offset(row, col, dir, steps) {
                Some(to) if board.at(to).is_empty() => out.push(Move::step(row, col, to.0, to.1)),
                _ => break,
            }
        }
    }
}

/// Scan one direction from a king for a jump.
///
/// Empty cells before the first piece are skipped. If that first piece is an
/// opponent's, returns it together with the run of empty landing cells right
/// behind it; the next occupied cell ends the run.
fn king_jump(
    board: &Board,
    (row, col): Cell,
    owner: Player,
    dir: (isize, isize),
) -> Option<(Cell, Vec<Cell>)> {
    let mut victim = None;
    let mut landings = Vec::new();
    for steps in 1.. {
        let Some(cell) = Board::offset(row, col, dir, steps) else {
            break;
        };
        let piece = board.at(cell);
        match victim {
            None if piece.is_empty() => {}
            None if piece.is_opponent_of(owner) => victim = Some(cell),
            None => return None,
            Some(_) if piece.is_empty() => landings.push(cell),
            Some(_) => break,
        }
    }
    let victim = victim?;
    (!landings.is_empty()).then_some((victim, landings))
}

/// The board after a king on `from` jumps `victim` and lands on `landing`.
fn simulate_jump(board: &Board, from: Cell, victim: Cell, landing: Cell, owner: Player) -> Board {
    let mut sim = board.clone();
    sim.put(from, PieceType::Empty);
    sim.put(victim, PieceType::Empty);
    sim.put(landing, PieceType::king(owner));
    sim
}

/// Maximum number of further captures a king on `cell` can make in a row.
fn max_additional_king_captures(board: &Board, cell: Cell, owner: Player) -> usize {
    DIAGONALS
        .iter()
        .filter_map(|&dir| king_jump(board, cell, owner, dir))
        .flat_map(|(victim, landings)| {
            landings.into_iter().map(move |landing| {
                let sim = simulate_jump(board, cell, victim, landing, owner);
                1 + max_additional_king_captures(&sim, landing, owner)
            })
        })
        .max()
        .unwrap_or(0)
}

/// King captures: per direction, keep only the landings that lead to the
/// most captures in total. Directions are not compared with each other.
fn king_captures(board: &Board, from: Cell, owner: Player, out: &mut Vec<Move>) {
    for dir in DIAGONALS {
        let Some((victim, landings)) = king_jump(board, from, owner, dir) else {
            continue;
        };
        let mut best_total = 0;
        let mut best = Vec::new();
        for landing in landings {
            let sim = simulate_jump(board, from, victim, landing, owner);
            let total = 1 + max_additional_king_captures(&sim, landing, owner);
            if total > best_total {
                best_total = total;
                best.clear();
            }
            if total == best_total {
                best.push(Move::jump(from.0, from.1, landing.0, landing.1, victim.0, victim.1));
            }
        }
        out.extend(best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_with(pieces: &[(usize, usize, PieceType)]) -> Board {
        let mut board = Board::new();
        for &(r, c, p) in pieces {
            board.set(r, c, p).unwrap();
        }
        board
    }

    #[test]
    fn test_initial_white_moves() {
        let engine = RuleEngine::new_game(Player::White, true);
        let moves = engine.legal_moves();
        // Row 5 men on cols 0, 2, 4, 6: the col-0 man has one step, the rest two.
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|m| !m.is_capture()));
        assert!(moves.iter().all(|m| m.from().0 == 5 && m.to().0 == 4));
        assert_eq!(engine.phase(), Phase::NormalTurn);
    }

    #[test]
    fn test_man_steps_forward_only() {
        let board = empty_with(&[(4, 3, PieceType::BlackMan)]);
        let engine = RuleEngine::new(board, Player::Black, true);
        let mut targets: Vec<_> = engine.legal_moves().iter().map(|m| m.to()).collect();
        targets.sort();
        assert_eq!(targets, vec![(5, 2), (5, 4)]);
    }

    #[test]
    fn test_man_captures_backwards() {
        let board = empty_with(&[(4, 3, PieceType::WhiteMan), (5, 4, PieceType::BlackMan)]);
        let engine = RuleEngine::new(board, Player::White, true);
        assert_eq!(engine.legal_moves(), &[Move::jump(4, 3, 6, 5, 5, 4)]);
        assert!(engine.must_capture());
    }

    #[test]
    fn test_optional_capture_mixes_sets() {
        let board = empty_with(&[
            (4, 3, PieceType::WhiteMan),
            (3, 4, PieceType::BlackMan),
            (6, 1, PieceType::WhiteMan),
        ]);
        let engine = RuleEngine::new(board, Player::White, false);
        let moves = engine.legal_moves();
        assert!(moves.iter().any(Move::is_capture));
        assert!(moves.iter().any(|m| !m.is_capture()));
        assert!(!engine.must_capture());
    }

    #[test]
    fn test_king_blocked_landing() {
        // King at (7,0), opponent at (5,2), landing (4,3), blocker at (3,4).
        let board = empty_with(&[
            (7, 0, PieceType::WhiteKing),
            (5, 2, PieceType::BlackMan),
            (3, 4, PieceType::BlackMan),
        ]);
        let engine = RuleEngine::new(board, Player::White, true);
        assert_eq!(engine.legal_moves(), &[Move::jump(7, 0, 4, 3, 5, 2)]);
    }

    #[test]
    fn test_king_prefers_landing_with_continuation() {
        // After jumping (5,2) the king can land on (4,3), (3,4), (2,5) or (1,6).
        // Only (3,4) sets up a second jump over (2,3) toward (1,2).
        let board = empty_with(&[
            (7, 0, PieceType::WhiteKing),
            (5, 2, PieceType::BlackMan),
            (2, 3, PieceType::BlackMan),
        ]);
        let engine = RuleEngine::new(board, Player::White, true);
        let moves = engine.legal_moves();
        assert_eq!(moves, &[Move::jump(7, 0, 3, 4, 5, 2)]);
    }

    #[test]
    fn test_chain_capture_pins_piece() {
        let board = empty_with(&[
            (6, 1, PieceType::WhiteMan),
            (5, 2, PieceType::BlackMan),
            (3, 4, PieceType::BlackMan),
            (0, 7, PieceType::BlackMan),
            (7, 6, PieceType::WhiteMan),
        ]);
        let mut engine = RuleEngine::new(board, Player::White, true);
        let first = Move::jump(6, 1, 4, 3, 5, 2);
        assert_eq!(engine.apply_move(first), Ok(MoveOutcome::ChainContinues));
        assert_eq!(engine.current_player(), Player::White);
        assert_eq!(engine.phase(), Phase::ChainCaptureInProgress { row: 4, col: 3 });
        assert!(engine.moves_for_cell(7, 6).is_empty());
        assert_eq!(
            engine.apply_move(Move::step(7, 6, 6, 7)),
            Err(RulesError::IllegalMove(Move::step(7, 6, 6, 7)))
        );
        let second = Move::jump(4, 3, 2, 5, 3, 4);
        assert_eq!(engine.moves_for_cell(4, 3), vec![second]);
        assert_eq!(engine.apply_move(second), Ok(MoveOutcome::TurnPassed));
        assert_eq!(engine.current_player(), Player::Black);
    }

    #[test]
    fn test_promotion_on_last_rank() {
        let board = empty_with(&[(1, 2, PieceType::WhiteMan), (6, 5, PieceType::BlackMan)]);
        let mut engine = RuleEngine::new(board, Player::White, true);
        engine.apply_move(Move::step(1, 2, 0, 1)).unwrap();
        assert_eq!(engine.board().get(0, 1).unwrap(), PieceType::WhiteKing);
    }

    #[test]
    fn test_game_over_when_opponent_stuck() {
        let board = empty_with(&[(4, 3, PieceType::WhiteMan), (3, 4, PieceType::BlackMan)]);
        let mut engine = RuleEngine::new(board, Player::White, true);
        let outcome = engine.apply_move(Move::jump(4, 3, 2, 5, 3, 4)).unwrap();
        assert_eq!(outcome, MoveOutcome::GameOver { winner: Player::White });
        assert_eq!(engine.phase(), Phase::GameOver { winner: Player::White });
    }

    #[test]
    fn test_wrong_owner_is_illegal() {
        let mut engine = RuleEngine::new_game(Player::White, true);
        let mv = Move::step(2, 1, 3, 0);
        assert_eq!(engine.apply_move(mv), Err(RulesError::IllegalMove(mv)));
    }

    #[test]
    fn test_trial_restores_on_drop() {
        let mut engine = RuleEngine::new_game(Player::White, true);
        let before = engine.snapshot();
        {
            let mut trial = engine.trial();
            let mv = trial.legal_moves()[0];
            trial.apply_move(mv).unwrap();
            assert_eq!(trial.current_player(), Player::Black);
        }
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.legal_moves().len(), 7);
    }
}
