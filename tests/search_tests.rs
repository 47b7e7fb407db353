//! Integration tests for the computer opponent.

use draughts_engine::board::Board;
use draughts_engine::difficulty::Difficulty;
use draughts_engine::error::RulesError;
use draughts_engine::moves::Move;
use draughts_engine::piece::{PieceType, Player};
use draughts_engine::rules::{MoveOutcome, RuleEngine};
use draughts_engine::search::{AiEngine, Strategy, TieredStrategy};

fn setpos(pieces: &[(usize, usize, PieceType)]) -> Board {
    let mut board = Board::new();
    for &(row, col, piece) in pieces {
        board.set(row, col, piece).unwrap();
    }
    board
}

/// White can end the game by taking Black's last man, but may also play a
/// quiet move since captures are optional here.
fn winning_capture_position() -> RuleEngine {
    let board = setpos(&[
        (4, 3, PieceType::WhiteMan),
        (3, 4, PieceType::BlackMan),
        (6, 1, PieceType::WhiteMan),
    ]);
    RuleEngine::new(board, Player::White, false)
}

// =============================================================================
// Tier behavior
// =============================================================================

#[test]
fn test_search_finds_winning_capture() {
    for difficulty in [Difficulty::Hard, Difficulty::Expert, Difficulty::Grandmaster] {
        let mut engine = winning_capture_position();
        let mut ai = AiEngine::with_strategy(Player::White, TieredStrategy::with_seed(3));
        let mv = ai.choose_move(&mut engine, difficulty).unwrap().unwrap();
        assert!(mv.is_capture(), "{difficulty} chose {mv}");
        assert_eq!(
            engine.apply_move(mv),
            Ok(MoveOutcome::GameOver { winner: Player::White })
        );
    }
}

#[test]
fn test_search_leaves_engine_untouched() {
    for difficulty in Difficulty::ALL {
        let mut engine = RuleEngine::new_game(Player::White, true);
        engine.apply_move(engine.find_move((5, 2), (4, 3)).unwrap()).unwrap();
        let before = engine.snapshot();
        let moves_before = engine.legal_moves().to_vec();

        let mut ai = AiEngine::with_strategy(Player::Black, TieredStrategy::with_seed(5));
        let chosen = ai.choose_move(&mut engine, difficulty).unwrap();

        assert_eq!(engine.snapshot(), before, "{difficulty} changed the position");
        assert_eq!(engine.legal_moves(), moves_before.as_slice());
        assert!(moves_before.contains(&chosen.unwrap()));
    }
}

#[test]
fn test_low_tiers_return_legal_moves() {
    let mut engine = RuleEngine::new_game(Player::White, true);
    let mut ai = AiEngine::with_strategy(Player::White, TieredStrategy::with_seed(99));
    for _ in 0..20 {
        for difficulty in [Difficulty::Easy, Difficulty::Medium] {
            let mv = ai.choose_move(&mut engine, difficulty).unwrap().unwrap();
            assert!(engine.is_legal(&mv));
        }
    }
}

#[test]
fn test_greedy_takes_free_material() {
    let board = setpos(&[
        (4, 3, PieceType::WhiteMan),
        (3, 4, PieceType::BlackMan),
        (0, 7, PieceType::BlackMan),
        (6, 1, PieceType::WhiteMan),
    ]);
    let mut engine = RuleEngine::new(board, Player::White, false);
    let mut ai = AiEngine::with_strategy(Player::White, TieredStrategy::with_seed(1));
    let mv = ai.choose_move(&mut engine, Difficulty::Medium).unwrap().unwrap();
    assert_eq!(mv, Move::capture(4, 3, 2, 5, 3, 4).unwrap());
}

#[test]
fn test_deep_tiers_are_deterministic() {
    let mut engine = RuleEngine::new_game(Player::White, true);
    let mut first = AiEngine::with_strategy(Player::White, TieredStrategy::with_seed(1));
    let mut second = AiEngine::with_strategy(Player::White, TieredStrategy::with_seed(2));
    let a = first.choose_move(&mut engine, Difficulty::Hard).unwrap();
    let b = second.choose_move(&mut engine, Difficulty::Hard).unwrap();
    assert_eq!(a, b);
    assert!(first.strategy().nodes() > 0);
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_no_legal_moves_returns_none() {
    // Black's only man sits on its promotion row and cannot move.
    let board = setpos(&[(7, 0, PieceType::BlackMan), (2, 3, PieceType::WhiteMan)]);
    let mut engine = RuleEngine::new(board, Player::Black, true);
    let mut ai = AiEngine::new(Player::Black);
    for difficulty in Difficulty::ALL {
        assert_eq!(ai.choose_move(&mut engine, difficulty), Ok(None));
    }
}

#[test]
fn test_level_index_is_clamped() {
    let mut engine = winning_capture_position();
    let mut ai = AiEngine::with_strategy(Player::White, TieredStrategy::with_seed(8));
    let mv = ai.choose_move_for_level(&mut engine, 42).unwrap().unwrap();
    assert!(mv.is_capture());
    assert!(ai.choose_move_for_level(&mut engine, -3).unwrap().is_some());
}

#[test]
fn test_mid_chain_search_continues_chain() {
    let board = setpos(&[
        (6, 1, PieceType::WhiteMan),
        (5, 2, PieceType::BlackMan),
        (3, 4, PieceType::BlackMan),
        (0, 7, PieceType::BlackMan),
        (7, 6, PieceType::WhiteMan),
    ]);
    let mut engine = RuleEngine::new(board, Player::White, true);
    let first = engine.find_move((6, 1), (4, 3)).unwrap();
    assert_eq!(engine.apply_move(first), Ok(MoveOutcome::ChainContinues));

    let mut ai = AiEngine::with_strategy(Player::White, TieredStrategy::with_seed(4));
    let mv = ai.choose_move(&mut engine, Difficulty::Expert).unwrap().unwrap();
    assert_eq!(mv.from(), (4, 3));
    assert!(mv.is_capture());
}

// =============================================================================
// Custom strategies
// =============================================================================

/// Always plays the first legal move.
struct FirstMove;

impl Strategy for FirstMove {
    fn choose_move(
        &mut self,
        engine: &mut RuleEngine,
        _ai_player: Player,
        _difficulty: Difficulty,
    ) -> Result<Option<Move>, RulesError> {
        Ok(engine.legal_moves().first().copied())
    }
}

#[test]
fn test_custom_strategy_plugs_in() {
    let mut engine = RuleEngine::new_game(Player::White, true);
    let expected = engine.legal_moves()[0];
    let mut ai = AiEngine::with_strategy(Player::White, FirstMove);
    assert_eq!(ai.ai_player(), Player::White);
    assert_eq!(ai.choose_move(&mut engine, Difficulty::Grandmaster), Ok(Some(expected)));
}
