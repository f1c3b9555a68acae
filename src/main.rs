//! Binary entry point: read the configuration, start logging and the tokio
//! runtime that runs the fetches, then drive the Ratatui event loop until the
//! user exits.
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sura_reader::audio::ConfiguredBackend;
use sura_reader::cli::Cli;
use sura_reader::config::AppConfig;
use sura_reader::logging::init_logging;
use sura_reader::{run_app, App, Player};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // The reader still works without a log file.
    if let Err(err) = init_logging(&config) {
        eprintln!("logging disabled: {err:#}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")?;

    info!(?config, "starting");

    let store = Arc::new(config.content_store());
    let player = Player::new(ConfiguredBackend::from_command(&config.player));
    let mut app = App::new(runtime.handle().clone(), store, player);
    run_app(&mut app)
}

