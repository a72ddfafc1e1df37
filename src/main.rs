use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::fs::OpenOptions;
use std::path::PathBuf;

use tplayer::discovery::{FileManager, UrlScanner};
use tplayer::player::{find_mpv_binary, MpvPlayer, NativePlayer, VideoService};
use tplayer::ui::{restore_terminal, DebugConsole, MainWindow, TerminalUi};
use tplayer::utils::config::{Config, PlayerConfig};
use tplayer::utils::logger::{self, LogTarget};
use tplayer::window::{self, PlayerApp, WinitSurface};
use tplayer::TPlayerError;

/// TPlayer - browse folders and web pages for videos and play them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file, directory or URL to open at startup
    #[arg(value_name = "LOCATION")]
    location: Option<String>,

    /// Set initial volume (0-100)
    #[arg(short, long, value_name = "VOLUME")]
    volume: Option<i32>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Read configuration from this file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start the video window in fullscreen mode
    #[arg(short, long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(volume) = args.volume {
        config.player.default_volume = volume;
    }
    if args.debug {
        config.general.log_level = "debug".to_string();
    }
    if args.fullscreen {
        config.window.fullscreen = true;
    }
    config.validate()?;

    // The terminal belongs to the UI, so records go to a file
    logger::init(&config.general.log_level, log_target(&config))?;
    info!("Starting TPlayer v{}", env!("CARGO_PKG_VERSION"));

    let console = DebugConsole::new();
    let sink = console.clone();
    logger::set_observer(move |line| sink.push(line));

    let player_config = config.player.clone();
    let video = VideoService::new(move || start_engine(&player_config), config.player.default_volume);
    let scanner = UrlScanner::new(&config.network)?;
    let files = FileManager::new(config.general.last_directory.clone());

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    let terminal = TerminalUi::enter().context("Failed to set up terminal")?;
    let main_window = MainWindow::new(
        &config,
        video,
        files,
        scanner,
        WinitSurface::new(&config.window),
        console,
    );

    let mut app = PlayerApp::new(main_window, terminal, args.location);
    let result = window::run(&mut app);
    app.shutdown();
    logger::clear_observer();

    if let Err(e) = &result {
        error!("{}", e);
    }

    if let Err(e) = Config::remember_last_directory(app.main_window().last_directory()) {
        warn!("Failed to save configuration: {}", e);
    }

    info!("TPlayer exited");
    result.context("Event loop failed")
}

/// Spawn mpv, the configured binary or the one on `PATH`
fn start_engine(config: &PlayerConfig) -> tplayer::Result<Box<dyn NativePlayer>> {
    let binary = find_mpv_binary(config.mpv_binary.as_deref())
        .ok_or_else(|| TPlayerError::Engine("mpv binary not found".to_string()))?;
    info!("Using mpv at {}", binary.display());

    Ok(Box::new(MpvPlayer::spawn(&binary)?))
}

/// Append to the log file; discard records when it cannot be opened
fn log_target(config: &Config) -> LogTarget {
    let Some(path) = config.log_file_path() else {
        return LogTarget::Writer(Box::new(std::io::sink()));
    };

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => LogTarget::Writer(Box::new(file)),
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", path.display(), e);
            LogTarget::Writer(Box::new(std::io::sink()))
        }
    }
}
