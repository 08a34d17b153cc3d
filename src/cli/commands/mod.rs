//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments into core strong types
//! 2. Loads the colony, applies one core operation, saves it back
//! 3. Formats and displays output
//!
//! Handlers never touch animal link fields directly; every mutation
//! flows through the integrity operations in [`crate::core::pedigree`].

mod animal;
mod breeder;
mod cage;
mod colony_cmd;
mod completion;
mod tree;

pub use animal::animal;
pub use breeder::breeder;
pub use cage::cage;
pub use colony_cmd::colony;
pub use completion::completion;
pub use tree::tree;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;

use crate::cli::args::Command;
use crate::core::types::{parse_date, AnimalId, CageId, Sex};
use crate::core::Colony;
use crate::store::ColonyStore;
use crate::ui::output::{self, Verbosity};

/// Execution context shared by all handlers.
pub struct Context {
    /// The colony store to operate against.
    pub store: ColonyStore,
    /// Output verbosity from global flags.
    pub verbosity: Verbosity,
    /// Layout gap from configuration (CLI `--gap` overrides).
    pub vertical_gap: f64,
}

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Colony { command } => colony(ctx, command),
        Command::Animal { command } => animal(ctx, command),
        Command::Cage { command } => cage(ctx, command),
        Command::Breeder { command } => breeder(ctx, command),
        Command::Tree { colony, gap } => tree(ctx, &colony, gap),
        Command::Completion { shell } => completion(shell),
    }
}

// ---------------------------------------------------------------------
// Argument parsing helpers: CLI strings to core strong types.
// ---------------------------------------------------------------------

pub(crate) fn animal_id(s: &str) -> Result<AnimalId> {
    AnimalId::new(s).map_err(Into::into)
}

pub(crate) fn cage_id(s: &str) -> Result<CageId> {
    CageId::new(s).map_err(Into::into)
}

pub(crate) fn sex(s: &str) -> Result<Sex> {
    s.parse().map_err(anyhow::Error::from)
}

pub(crate) fn date(s: &str) -> Result<NaiveDate> {
    parse_date(s).map_err(Into::into)
}

pub(crate) fn opt_animal_id(s: Option<&str>) -> Result<Option<AnimalId>> {
    s.map(animal_id).transpose()
}

pub(crate) fn opt_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(date).transpose()
}

/// Set-or-clear change for an optional field, from a value flag and a
/// `--clear-*` flag.
pub(crate) fn change<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

// ---------------------------------------------------------------------
// Load/save helpers.
// ---------------------------------------------------------------------

pub(crate) fn load(ctx: &Context, name: &str) -> Result<Colony> {
    output::debug(format!("loading colony '{name}'"), ctx.verbosity);
    ctx.store
        .load(name)
        .with_context(|| format!("Failed to load colony '{name}'"))
}

pub(crate) fn save(ctx: &Context, colony: &Colony) -> Result<()> {
    output::debug(
        format!("saving colony '{}' ({} animals)", colony.name, colony.len()),
        ctx.verbosity,
    );
    ctx.store
        .save(colony)
        .with_context(|| format!("Failed to save colony '{}'", colony.name))
}
