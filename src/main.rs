//! # Crypt Main Entry Point
//!
//! Loads settings, builds a level, and runs the macroquad game loop.

use clap::Parser;
use crypt::{
    build_game_state, CryptError, CryptResult, GameState, InputHandler, MacroquadDisplay,
    PlayerInput, Settings, TurnScheduler,
};
use log::{error, info, warn};
use macroquad::prelude::*;
use std::path::PathBuf;

/// Command line arguments for Crypt.
#[derive(Parser, Debug)]
#[command(name = "crypt")]
#[command(about = "A turn-based grid dungeon crawler")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Path to a JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Window setup runs before `main`, so it reads the settings on its own.
/// Errors surface again, and get logged, once `run` loads them.
fn window_conf() -> Conf {
    let title = load_settings(&Args::parse())
        .map(|settings| settings.window_title)
        .unwrap_or_else(|_| Settings::default().window_title);
    Conf {
        window_title: title,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Crypt v{}", crypt::VERSION);

    if let Err(e) = run(&args).await {
        error!("Game aborted: {}", e);
    }
}

/// Initializes env_logger; `RUST_LOG` still wins when set.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();
}

fn load_settings(args: &Args) -> CryptResult<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    settings.validate()?;
    Ok(settings)
}

fn new_game(settings: &Settings, seed: u64) -> CryptResult<(GameState, TurnScheduler)> {
    info!("Generating level with seed: {}", seed);
    let state = build_game_state(settings.clone(), seed)?;
    Ok((state, TurnScheduler::new()))
}

/// Main game loop.
async fn run(args: &Args) -> CryptResult<()> {
    let settings = load_settings(args)?;
    let mut seed = settings.seed.unwrap_or_else(::rand::random);
    let (mut state, mut scheduler) = new_game(&settings, seed)?;

    let mut display = MacroquadDisplay::new(settings.tile_size);
    let (width, height) = display.window_size(settings.level_width, settings.level_height);
    request_new_screen_size(width, height);
    display.add_message("You wake in the crypt. Arrows or WASD to move, Space to wait.");

    let mut input = InputHandler::new(settings.diagonal_tolerance);

    loop {
        for player_input in input.read_keyboard(get_time()) {
            match player_input {
                PlayerInput::Quit => {
                    info!("Player quit the game");
                    return Ok(());
                }
                PlayerInput::Restart if state.is_game_over() => {
                    seed = seed.wrapping_add(1);
                    (state, scheduler) = new_game(&settings, seed)?;
                    input.reset();
                    display.messages.clear();
                    display.add_message("A new crypt awaits.");
                }
                PlayerInput::Restart => {}
                PlayerInput::Command(command) => match scheduler.submit(&mut state, command) {
                    Ok(report) => display.record_report(&report, &state),
                    Err(CryptError::InvalidAction(reason)) => warn!("Rejected command: {}", reason),
                    Err(e) => return Err(e),
                },
            }
        }

        let report = scheduler.update(&mut state, get_frame_time())?;
        display.record_report(&report, &state);

        display.draw_frame(&state, &scheduler)?;

        next_frame().await;
    }
}
