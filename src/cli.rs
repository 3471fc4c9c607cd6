use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Themed task tracker backed by a local document store.
/// Storage defaults to ~/.tt/store.json or a path passed via --store.
#[derive(Parser)]
#[command(name = "tt", version, about = "Themed task tracker")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Account to act as.
    #[arg(long, global = true, env = "TT_ACCOUNT")]
    pub account: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
