//! Command line surface of the `sura-reader` binary.
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "sura-reader",
    about = "Terminal reader for the Quran with per-ayah recitation",
    version
)]
pub struct Cli {
    /// Read settings from this file instead of the per-user `config.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
