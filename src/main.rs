//! # Wildwood Main Entry Point
//!
//! Parses the command line, sets up logging, generates the world and runs the
//! macroquad frame loop.

use clap::Parser;
use log::{error, info};
use macroquad::prelude::*;
use std::path::PathBuf;
use wildwood::{Game, InputHandler, SceneManager, WildwoodResult, WorldConfig};

/// Command line arguments for Wildwood.
#[derive(Parser, Debug)]
#[command(name = "wildwood")]
#[command(about = "A turn-based ASCII survival game in the woods")]
#[command(version)]
struct Args {
    /// Random seed for world generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON world configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    let (width, height) = SceneManager::window_size(&WorldConfig::default());
    Conf {
        window_title: "Wildwood".to_string(),
        window_width: width as i32,
        window_height: height as i32,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);
    info!("Starting Wildwood v{}", wildwood::VERSION);

    if let Err(e) = run(&args).await {
        error!("Wildwood stopped: {}", e);
        std::process::exit(1);
    }
    info!("Game loop ended");
}

/// Initializes env_logger at the given level unless `RUST_LOG` overrides it.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .parse_env("RUST_LOG")
        .format_target(false)
        .init();
}

/// Loads the configuration, applying command line overrides.
fn load_config(args: &Args) -> WildwoodResult<WorldConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            WorldConfig::load(path)?
        }
        None => WorldConfig::default(),
    };
    config.seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(config.seed)
    });
    Ok(config)
}

async fn run(args: &Args) -> WildwoodResult<()> {
    let config = load_config(args)?;
    if let Some(path) = &args.dump_config {
        config.save(path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let (width, height) = SceneManager::window_size(&config);
    request_new_screen_size(width, height);

    info!("Generating world with seed: {}", config.seed);
    let game = Game::new(&config)?;
    let mut scenes = SceneManager::new(game, InputHandler::new());
    scenes.run().await
}
