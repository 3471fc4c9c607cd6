//! # TT - Themed Task Tracker
//!
//! A command-line task tracker where every task lives either in the inbox or
//! in a user-defined theme, can repeat on a schedule and can carry a due date.
//!
//! ## Key Features
//!
//! - **Themes**: group tasks under named themes; unfiled tasks land in the inbox
//! - **Repeats**: every N days, weeks, months or years, or a custom date range
//! - **Due dates**: natural inputs such as `tomorrow` or `in 3d`
//! - **Local Document Store**: one JSON file holding every account's collections
//!
//! ## Quick Start
//!
//! ```bash
//! export TT_ACCOUNT=me
//!
//! # Create a theme and note its ID
//! tt theme-add "Work"
//!
//! # Add a repeating task to it
//! tt add "Weekly report" --theme <theme-id> --repeat week --due "in 3d"
//!
//! # Add a task to the inbox with a custom repeat window
//! tt add "Water plants" --repeat custom --from 2024-07-01 --to 2024-07-14
//!
//! # List inbox tasks
//! tt list
//! ```
//!
//! Data is stored in `~/.tt/store.json` unless `--store` points elsewhere.
//! Set `RUST_LOG=debug` to trace every draft edit and store call.

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod draft;
pub mod error;
pub mod fields;
pub mod paths;
pub mod session;
pub mod store;
pub mod submit;
pub mod task;
pub mod theme_form;

use cli::Cli;
use cmd::*;
use db::FileStore;
use session::Session;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();
}

/// Store location: `--store` if given, otherwise `~/.tt/store.json`.
fn resolve_store_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let tt_dir = PathBuf::from(home).join(".tt");
    if let Err(e) = std::fs::create_dir_all(&tt_dir) {
        eprintln!("Failed to create tt directory {}: {}", tt_dir.display(), e);
        std::process::exit(1);
    }
    tt_dir.join("store.json")
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    // Completions need neither a store nor an account.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let store_path = resolve_store_path(cli.store);
    let store = FileStore::open(store_path);
    let session = Session::from_config(cli.account.as_deref());
    debug!(store = %store.path().display(), account = ?session.account(), "session ready");

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add(args) => cmd_add(&store, &session, args).await,

        Commands::List { theme, all } => cmd_list(&store, &session, theme, all).await,

        Commands::Themes { with_tasks } => cmd_themes(&store, &session, with_tasks).await,

        Commands::ThemeAdd { name } => cmd_theme_add(&store, &session, name).await,

        Commands::Tags => cmd_tags(&store, &session).await,
    }
}
