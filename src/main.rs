//! Draughts-Engine: an 8x8 draughts engine.
//!
//! ## Usage
//!
//! - `draughts-engine` - Show a self-play demo
//! - `draughts-engine play` - Start the text protocol on stdin/stdout
//! - `draughts-engine demo` - Let the engine play both sides
//!
//! Logs go to stderr. The level comes from `RUST_LOG`, or from `-v`/`-vv`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use draughts_engine::config::GameConfig;
use draughts_engine::constants::DEMO_MAX_PLIES;
use draughts_engine::difficulty::Difficulty;
use draughts_engine::piece::Player;
use draughts_engine::protocol::ProtocolEngine;
use draughts_engine::rules::MoveOutcome;
use draughts_engine::search::{AiEngine, TieredStrategy};

/// Draughts-Engine: an 8x8 draughts engine with a tiered computer opponent
#[derive(Parser)]
#[command(name = "draughts-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Difficulty level, 0 (easy) to 4 (grandmaster)
    #[arg(short, long, global = true, default_value_t = 0)]
    difficulty: i32,

    /// Allow quiet moves even when a capture is available
    #[arg(long, global = true)]
    no_mandatory_capture: bool,

    /// Do not list destinations for `select`
    #[arg(long, global = true)]
    no_hints: bool,

    /// Color played by the human ("white" or "black")
    #[arg(long, global = true, default_value = "white")]
    human_color: String,

    /// Two humans share the board; the engine never moves
    #[arg(long, global = true)]
    two_player: bool,

    /// Seed for the engine's random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol for playing a game
    Play,
    /// Run a self-play demo of the engine
    Demo,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            difficulty: Difficulty::from_level_index(self.difficulty),
            mandatory_capture: !self.no_mandatory_capture,
            move_hints: !self.no_hints,
            human_color: Player::from_color_str(&self.human_color, Player::White),
            vs_ai: !self.two_player,
            seed: self.seed,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.game_config();

    match cli.command {
        Some(Commands::Play) => {
            let mut session = ProtocolEngine::new(config);
            session.run()?;
        }
        Some(Commands::Demo) | None => {
            run_demo(&config)?;
        }
    }
    Ok(())
}

fn strategy_for(config: &GameConfig, offset: u64) -> TieredStrategy {
    match config.seed {
        Some(seed) => TieredStrategy::with_seed(seed.wrapping_add(offset)),
        None => TieredStrategy::new(),
    }
}

/// Engine versus engine at the configured tier.
fn run_demo(config: &GameConfig) -> Result<()> {
    println!("Draughts-Engine: self-play at {} level\n", config.difficulty);

    let mut engine = config.new_engine();
    let mut white = AiEngine::with_strategy(Player::White, strategy_for(config, 0));
    let mut black = AiEngine::with_strategy(Player::Black, strategy_for(config, 1));
    println!("{}", engine.board());

    let mut winner = None;
    for ply in 1..=DEMO_MAX_PLIES {
        let side = engine.current_player();
        let ai = match side {
            Player::White => &mut white,
            Player::Black => &mut black,
        };
        let Some(mv) = ai.choose_move(&mut engine, config.difficulty)? else {
            winner = Some(side.opposite());
            break;
        };
        let outcome = engine.apply_move(mv)?;
        println!("{ply:>3}. {side} {mv}");

        match outcome {
            MoveOutcome::GameOver { winner: w } => {
                winner = Some(w);
                break;
            }
            MoveOutcome::ChainContinues | MoveOutcome::TurnPassed => {}
        }
    }

    println!("\n{}", engine.board());
    match winner {
        Some(w) => println!("{w} wins"),
        None => println!("no result after {DEMO_MAX_PLIES} plies"),
    }
    info!(?winner, "demo finished");
    Ok(())
}
