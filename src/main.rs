//! # RedEmu Main Entry Point
//!
//! Parses the command line, sets up logging, builds the session from the
//! built-in content and runs the macroquad loop.

use clap::Parser;
use macroquad::window::Conf;
use redemu::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use redemu::data::{builtin_species, builtin_world};
use redemu::{FontMetrics, GameConfig, GameController, InputHandler, RedEmuResult, SceneManager};
use std::path::PathBuf;

/// Command line arguments for RedEmu.
#[derive(Parser, Debug)]
#[command(name = "redemu")]
#[command(about = "A minimal tile-based RPG: explore Pallet Town and battle in the tall grass")]
#[command(version)]
struct Args {
    /// Random seed for encounters and damage rolls
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// JSON file overriding gameplay settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "RedEmu Kanto".to_string(),
        window_width: SCREEN_WIDTH,
        window_height: SCREEN_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    log::info!("Starting RedEmu v{}", redemu::VERSION);

    if let Err(e) = run_game(&args).await {
        log::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
///
/// `RUST_LOG`, when set, takes precedence over `--log-level`.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .parse_default_env()
            .format_timestamp_millis()
            .init();
    }
}

/// Builds the session and runs it until the player quits.
async fn run_game(args: &Args) -> RedEmuResult<()> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            GameConfig::load(path)?
        }
        None => GameConfig::new(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Using seed {}", seed);

    let world = builtin_world()?;
    let species = builtin_species()?;
    let game = GameController::new(world, species, config, Box::new(FontMetrics::new()), seed)?;

    #[cfg(feature = "dev-tools")]
    tracing::info!(
        seed,
        map = %game.map().id,
        party = %game.party.name,
        "Session ready"
    );

    let mut scenes = SceneManager::new(game, InputHandler::new());
    scenes.run().await
}
