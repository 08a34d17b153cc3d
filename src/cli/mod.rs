//! cli
//!
//! Command-line interface layer for Herdbook.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT mutate colonies directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that load a colony from the [`crate::store`], apply one
//! [`crate::core`] operation, and save the whole colony back.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::store::ColonyStore;
use crate::ui::output::Verbosity;
use commands::Context;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load().context("Failed to load configuration")?;

    // Store root precedence: --dir, then config, then the platform
    // data directory.
    let root = match cli.dir.clone() {
        Some(dir) => dir,
        None => match config.data_dir() {
            Some(dir) => dir.to_path_buf(),
            None => ColonyStore::default_root()?,
        },
    };

    let ctx = Context {
        store: ColonyStore::open(root),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        vertical_gap: config.vertical_gap(),
    };

    commands::dispatch(cli.command, &ctx)
}
