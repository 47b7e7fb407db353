//! Line-oriented text protocol for driving a game session.
//!
//! The framing follows the Go Text Protocol: each command may start with a
//! numeric id, and each response is `=id text` on success or `?id text` on
//! failure, followed by a blank line. This lets a front end (or a person at a
//! terminal) play against the engine without linking the library.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`, `quit`
//! - `new_game [white|black]` - Restart, optionally choosing the human color
//! - `difficulty <0-4>` - Set the engine tier (clamped)
//! - `showboard` - Print the board and the side to move
//! - `legal_moves` - List every legal move
//! - `select <square>` - Moves from one square (destinations shown with hints on)
//! - `play <move>` - Play a move such as `c3-d4` or `c3:e5`
//! - `genmove` - Let the engine play its whole turn
//! - `undo` - Take back the last move (vs-AI: back to the last human move)
//! - `score` - Pieces captured by White and by Black
//!
//! The session keeps the undo history: one snapshot is pushed before every
//! applied move, chain steps included.
//!
//! ## Example
//!
//! ```ignore
//! use draughts_engine::config::GameConfig;
//! use draughts_engine::protocol::ProtocolEngine;
//! let mut session = ProtocolEngine::new(GameConfig::default());
//! session.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::constants::INITIAL_PIECES_PER_SIDE;
use crate::difficulty::Difficulty;
use crate::error::RulesError;
use crate::moves::{parse_move, parse_square, square_name, Move};
use crate::piece::Player;
use crate::rules::{MoveOutcome, Phase, RuleEngine, Snapshot};
use crate::search::{AiEngine, TieredStrategy};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "difficulty",
    "genmove",
    "known_command",
    "legal_moves",
    "list_commands",
    "name",
    "new_game",
    "play",
    "protocol_version",
    "quit",
    "score",
    "select",
    "showboard",
    "undo",
    "version",
];

/// Session state behind the protocol.
pub struct ProtocolEngine {
    config: GameConfig,
    engine: RuleEngine,
    ai: AiEngine<TieredStrategy>,
    /// Snapshots taken before each applied move, oldest first.
    history: Vec<Snapshot>,
}

fn build_ai(config: &GameConfig) -> AiEngine<TieredStrategy> {
    let strategy = match config.seed {
        Some(seed) => TieredStrategy::with_seed(seed),
        None => TieredStrategy::new(),
    };
    AiEngine::with_strategy(config.ai_player(), strategy)
}

fn describe_outcome(outcome: MoveOutcome) -> String {
    match outcome {
        MoveOutcome::ChainContinues => "continue".to_string(),
        MoveOutcome::TurnPassed => String::new(),
        MoveOutcome::GameOver { winner } => format!("game over: {winner} wins"),
    }
}

impl ProtocolEngine {
    pub fn new(config: GameConfig) -> Self {
        let engine = config.new_engine();
        let ai = build_ai(&config);
        Self {
            config,
            engine,
            ai,
            history: Vec::new(),
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop on arbitrary streams until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n").context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "draughts-engine".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(name) => {
                    let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "new_game" => {
                if let Some(color) = args.first() {
                    let human = Player::from_color_str(color, self.config.human_color);
                    self.config.human_color = human;
                }
                self.new_game();
                (true, String::new())
            }

            "difficulty" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<i32>() {
                    Ok(level) => {
                        self.config.difficulty = Difficulty::from_level_index(level);
                        (true, self.config.difficulty.to_string())
                    }
                    Err(_) => (false, "invalid level".to_string()),
                }
            }

            "showboard" => {
                let board = self.engine.board();
                let to_move = self.engine.current_player();
                (true, format!("\n{board}to move: {to_move}"))
            }

            "legal_moves" => {
                let moves: Vec<String> =
                    self.engine.legal_moves().iter().map(Move::to_string).collect();
                (true, moves.join(" "))
            }

            "select" => self.select(args),

            "play" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                self.play(arg)
            }

            "genmove" => self.genmove(),

            "undo" => self.undo(),

            "score" => {
                let board = self.engine.board();
                let captured_from =
                    |side| INITIAL_PIECES_PER_SIDE.saturating_sub(board.count_pieces(side));
                let white_captured = captured_from(Player::Black);
                let black_captured = captured_from(Player::White);
                (true, format!("{white_captured} {black_captured}"))
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn new_game(&mut self) {
        self.engine = self.config.new_engine();
        self.ai = build_ai(&self.config);
        self.history.clear();
        info!(
            human = %self.config.human_color,
            difficulty = %self.config.difficulty,
            "new session game"
        );
    }

    fn select(&self, args: &[&str]) -> (bool, String) {
        let Some((row, col)) = args.first().and_then(|s| parse_square(s)) else {
            return (false, "invalid square".to_string());
        };
        let moves = self.engine.moves_for_cell(row, col);
        if moves.is_empty() {
            return (false, format!("no moves from {}", square_name(row, col)));
        }
        if !self.config.move_hints {
            return (true, String::new());
        }
        let targets: Vec<String> = moves.iter().map(|m| square_name(m.to().0, m.to().1)).collect();
        (true, targets.join(" "))
    }

    /// Push an undo entry and apply `mv` to the live engine.
    fn commit(&mut self, mv: Move) -> Result<MoveOutcome, RulesError> {
        let snapshot = self.engine.snapshot();
        let outcome = self.engine.apply_move(mv)?;
        self.history.push(snapshot);
        debug!(%mv, ?outcome, "move committed");
        Ok(outcome)
    }

    fn play(&mut self, text: &str) -> (bool, String) {
        if let Phase::GameOver { winner } = self.engine.phase() {
            return (false, format!("game is over: {winner} won"));
        }
        if self.config.is_ai_turn(self.engine.current_player()) {
            return (false, "it is the engine's turn".to_string());
        }
        let Some((from, to)) = parse_move(text) else {
            return (false, format!("cannot parse move: {text}"));
        };
        let Some(mv) = self.engine.find_move(from, to) else {
            return (false, format!("illegal move: {text}"));
        };
        match self.commit(mv) {
            Ok(outcome) => (true, describe_outcome(outcome)),
            Err(e) => (false, e.to_string()),
        }
    }

    /// Play the engine's full turn, continuing through capture chains.
    fn genmove(&mut self) -> (bool, String) {
        if !self.config.vs_ai {
            return (false, "engine plays only in vs-ai mode".to_string());
        }
        if !self.config.is_ai_turn(self.engine.current_player()) {
            return (false, "not the engine's turn".to_string());
        }

        let mut played = Vec::new();
        loop {
            let chosen = match self.ai.choose_move(&mut self.engine, self.config.difficulty) {
                Ok(chosen) => chosen,
                Err(e) => return (false, e.to_string()),
            };
            let Some(mv) = chosen else {
                break;
            };
            let outcome = match self.commit(mv) {
                Ok(outcome) => outcome,
                Err(e) => return (false, e.to_string()),
            };
            played.push(mv.to_string());
            match outcome {
                MoveOutcome::ChainContinues => continue,
                MoveOutcome::TurnPassed => break,
                MoveOutcome::GameOver { .. } => {
                    played.push(describe_outcome(outcome));
                    break;
                }
            }
        }

        if played.is_empty() {
            return (false, "no legal moves".to_string());
        }
        (true, played.join(" "))
    }

    fn undo(&mut self) -> (bool, String) {
        let target = if self.config.vs_ai {
            let human = self.config.human_color;
            self.history
                .iter()
                .rposition(|s| s.current_player() == human && s.chain_cell().is_none())
        } else {
            self.history.len().checked_sub(1)
        };

        let Some(index) = target else {
            return (false, "no moves to undo".to_string());
        };
        let undone = self.history.len() - index;
        let snapshot = &self.history[index];
        self.engine.restore(snapshot);
        self.history.truncate(index);
        (true, undone.to_string())
    }
}
