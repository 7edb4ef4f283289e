//! # Warren Main Entry Point
//!
//! Parses arguments, sets up logging, builds a dungeon and either prints it or
//! opens the macroquad viewer.

use clap::Parser;
use log::{error, info};
use macroquad::prelude::next_frame;
use macroquad::window::Conf;
use macroquad::Window;
use std::path::PathBuf;
use warren::{
    rendering::ascii, GenerationConfig, InputHandler, MacroquadDisplay, Sampler, ViewerSession,
    WarrenResult,
};

/// Command line arguments for the Warren dungeon generator.
#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "Weaves a grid of cells into a connected dungeon of rooms and doors")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON generation config; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Largest room a merge may produce
    #[arg(long)]
    max_room_size: Option<usize>,

    /// Rooms above this size are always linked with a door
    #[arg(long)]
    first_stop_size: Option<usize>,

    /// Exact number of rooms in the selected path
    #[arg(long)]
    path_rooms: Option<usize>,

    /// Print the dungeon as text instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> WarrenResult<()> {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(&args.log_level);

    info!("Starting Warren v{}", warren::VERSION);

    let mut config = build_config(&args)?;
    if args.seed.is_none() && args.config.is_none() {
        config.seed = Sampler::from_entropy().seed();
    }
    info!("Generating dungeon with seed: {}", config.seed);

    let session = ViewerSession::new(config)?;

    if args.headless {
        print_session(&session);
        return Ok(());
    }

    let display = MacroquadDisplay::new();
    let (window_width, window_height) =
        display.window_size(session.config().width, session.config().height);
    let conf = Conf {
        window_title: "Warren".to_string(),
        window_width,
        window_height,
        window_resizable: false,
        ..Default::default()
    };
    Window::from_config(conf, run_viewer(session, display));

    info!("Viewer closed");
    Ok(())
}

/// Initializes the logger; `RUST_LOG` takes precedence over the flag.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

/// Merges the config file, if any, with command line overrides.
fn build_config(args: &Args) -> WarrenResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(size) = args.max_room_size {
        config.max_room_size = size;
    }
    if let Some(size) = args.first_stop_size {
        config.first_stop_size = size;
    }
    if let Some(rooms) = args.path_rooms {
        config.min_path_rooms = rooms;
        config.max_path_rooms = rooms;
    }

    config.validate()?;
    Ok(config)
}

fn print_session(session: &ViewerSession) {
    let dungeon = session.dungeon();
    println!(
        "{}",
        ascii::render(dungeon, session.path(), session.current_room())
    );
    println!(
        "{} rooms, {} doors, path of {} rooms",
        dungeon.room_count(),
        dungeon.door_count(),
        session.path().len()
    );
    for (step, room) in session.path().iter().enumerate() {
        let cells = dungeon
            .room(*room)
            .map(|room| {
                room.cells()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        println!("{:>3}: {}", step + 1, cells.join(" "));
    }
}

/// Runs the viewer loop until the window closes or Escape is pressed.
async fn run_viewer(mut session: ViewerSession, display: MacroquadDisplay) {
    let input_handler = InputHandler::new();

    loop {
        if let Some(input) = input_handler.poll() {
            match session.handle_input(input) {
                Ok(true) => {}
                Ok(false) => {
                    info!("Viewer quit");
                    break;
                }
                Err(e) => {
                    error!("Regeneration failed: {e}");
                    break;
                }
            }
        }

        display.render(&session);

        next_frame().await;
    }
}
