// src/main.rs
//! Command-line entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use warble::{app::App, config::Config, fs::Track, logging, ui};

/// Play one audio track in the terminal.
#[derive(Debug, Parser)]
#[command(name = "warble", version, about)]
struct Cli {
    /// Audio file to play
    track: PathBuf,

    /// Config file (defaults to <config dir>/warble/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Starting volume in [0, 1]
    #[arg(long, value_name = "F")]
    volume: Option<f64>,

    /// Plain player without the audio graph or spectrum
    #[arg(long)]
    no_visualizer: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay command-line flags on the loaded config.
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(volume) = self.volume {
            config.player.initial_volume = volume;
        }
        if self.no_visualizer {
            config.player.visualizer = false;
        }
        config.validate().context("invalid command-line option")?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    cli.apply(&mut config)?;

    if let Some(path) = logging::init(&config.log, cli.log_file.as_deref())? {
        eprintln!("Logging to file: {}", path.display());
    }

    let track = Track::open(&cli.track)?;
    let mut app = App::new(track, &config);
    ui::run(&mut app)
}
