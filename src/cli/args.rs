//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--dir <path>`: Use this store root instead of the configured one
//! - `--debug`: Enable debug output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Herdbook - pedigree tracking for laboratory animal colonies
#[derive(Parser, Debug)]
#[command(name = "hb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store root directory (defaults to config, then the platform data dir)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage colonies (create, list, show, rename, delete)
    Colony {
        #[command(subcommand)]
        command: ColonyCommand,
    },

    /// Manage individual animals
    Animal {
        #[command(subcommand)]
        command: AnimalCommand,
    },

    /// Manage cages (bulk operations over housed groups)
    Cage {
        #[command(subcommand)]
        command: CageCommand,
    },

    /// Manage breeder cages and their litters
    Breeder {
        #[command(subcommand)]
        command: BreederCommand,
    },

    /// Print the generation-layered pedigree layout as JSON
    #[command(
        long_about = "Print the generation-layered pedigree layout as JSON.\n\n\
            The output contains one positioned node per animal (id, x, y, \
            generation, sex, genotype) and one edge per parent link. It is \
            the complete rendering contract: any charting front end can \
            consume it without knowing how it was computed."
    )]
    Tree {
        /// Colony to lay out
        colony: String,

        /// Vertical distance between generations
        #[arg(long)]
        gap: Option<f64>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Colony lifecycle commands.
#[derive(Subcommand, Debug)]
pub enum ColonyCommand {
    /// Create a new empty colony
    New {
        /// Colony name
        name: String,
    },

    /// List persisted colonies
    List,

    /// Show a colony: animals with resolved parent ids, founders, cages
    Show {
        /// Colony name
        name: String,

        /// Emit the full colony record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename a persisted colony
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Delete a persisted colony
    Delete {
        /// Colony name
        name: String,
    },
}

/// Animal CRUD and kinship commands.
#[derive(Subcommand, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum AnimalCommand {
    /// Add one animal
    Add {
        /// Colony name
        colony: String,

        /// Animal id (unique within the colony)
        #[arg(long)]
        id: String,

        /// Sex: M/F or male/female
        #[arg(long)]
        sex: String,

        /// Genotype label
        #[arg(long)]
        genotype: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,

        /// Mother's animal id
        #[arg(long)]
        mother: Option<String>,

        /// Father's animal id
        #[arg(long)]
        father: Option<String>,

        /// Cage label
        #[arg(long)]
        cage: Option<String>,

        /// Date weaned (YYYY-MM-DD)
        #[arg(long)]
        weaned: Option<String>,

        /// Notes
        #[arg(long)]
        notes: Option<String>,

        /// Mark as deceased
        #[arg(long)]
        deceased: bool,
    },

    /// Edit an animal's fields or parent links
    Edit {
        /// Colony name
        colony: String,

        /// Animal id
        id: String,

        /// New sex: M/F or male/female
        #[arg(long)]
        sex: Option<String>,

        /// New genotype label
        #[arg(long)]
        genotype: Option<String>,

        /// New date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,

        /// Set the mother
        #[arg(long, conflicts_with = "clear_mother")]
        mother: Option<String>,

        /// Clear the mother link
        #[arg(long)]
        clear_mother: bool,

        /// Set the father
        #[arg(long, conflicts_with = "clear_father")]
        father: Option<String>,

        /// Clear the father link
        #[arg(long)]
        clear_father: bool,

        /// Set the cage label
        #[arg(long, conflicts_with = "clear_cage")]
        cage: Option<String>,

        /// Clear the cage label
        #[arg(long)]
        clear_cage: bool,

        /// Set the weaning date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_weaned")]
        weaned: Option<String>,

        /// Clear the weaning date
        #[arg(long)]
        clear_weaned: bool,

        /// Set the notes
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        /// Clear the notes
        #[arg(long)]
        clear_notes: bool,

        /// Set deceased to true or false
        #[arg(long)]
        deceased: Option<bool>,
    },

    /// Rename an animal, rewriting every reference to it
    Rename {
        /// Colony name
        colony: String,
        /// Current animal id
        old: String,
        /// New animal id
        new: String,
    },

    /// Delete an animal, severing all references to it
    Delete {
        /// Colony name
        colony: String,
        /// Animal id
        id: String,
    },

    /// Show an animal's children, siblings, and cousins
    Kin {
        /// Colony name
        colony: String,
        /// Animal id
        id: String,
    },
}

/// Cage bulk commands.
#[derive(Subcommand, Debug)]
pub enum CageCommand {
    /// Populate a cage with animals sharing the given attributes
    #[command(
        long_about = "Populate a cage with animals sharing the given attributes.\n\n\
            Member ids follow the {cage}_{n} convention: 'hb cage add lab1 CAGE5 \
            --count 3 ...' creates CAGE5_1, CAGE5_2, CAGE5_3. The operation is \
            atomic: if any generated id already exists, nothing is created."
    )]
    Add {
        /// Colony name
        colony: String,

        /// Cage id
        cage: String,

        /// Number of animals to create
        #[arg(long)]
        count: usize,

        /// Sex: M/F or male/female
        #[arg(long)]
        sex: String,

        /// Genotype label
        #[arg(long)]
        genotype: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,

        /// Mother's animal id
        #[arg(long)]
        mother: Option<String>,

        /// Father's animal id
        #[arg(long)]
        father: Option<String>,

        /// Date weaned (YYYY-MM-DD)
        #[arg(long)]
        weaned: Option<String>,

        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit every animal in a cage, optionally relabeling the cage
    Edit {
        /// Colony name
        colony: String,

        /// Cage id
        cage: String,

        /// New sex for all members
        #[arg(long)]
        sex: Option<String>,

        /// New genotype for all members
        #[arg(long)]
        genotype: Option<String>,

        /// New date of birth for all members (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,

        /// New weaning date for all members (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_weaned")]
        weaned: Option<String>,

        /// Clear the weaning date on all members
        #[arg(long)]
        clear_weaned: bool,

        /// New notes for all members
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        /// Clear notes on all members
        #[arg(long)]
        clear_notes: bool,

        /// Set deceased on all members
        #[arg(long)]
        deceased: Option<bool>,

        /// Set the mother on all members
        #[arg(long, conflicts_with = "clear_mother")]
        mother: Option<String>,

        /// Clear the mother link on all members
        #[arg(long)]
        clear_mother: bool,

        /// Set the father on all members
        #[arg(long, conflicts_with = "clear_father")]
        father: Option<String>,

        /// Clear the father link on all members
        #[arg(long)]
        clear_father: bool,

        /// Relabel the cage; member ids following {cage}_{n} are renamed
        #[arg(long)]
        rename_to: Option<String>,
    },

    /// Delete every animal in a cage
    Delete {
        /// Colony name
        colony: String,
        /// Cage id
        cage: String,
    },
}

/// Breeder-cage commands.
#[derive(Subcommand, Debug)]
pub enum BreederCommand {
    /// Pair a female and a male in a breeder cage
    Add {
        /// Colony name
        colony: String,

        /// Breeder cage id
        cage: String,

        /// The dam's animal id (must be female)
        #[arg(long)]
        mother: String,

        /// The sire's animal id (must be male)
        #[arg(long)]
        father: String,

        /// Date the pair was set up (YYYY-MM-DD)
        #[arg(long)]
        mated: Option<String>,

        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit a breeder-cage record
    Edit {
        /// Colony name
        colony: String,

        /// Breeder cage id
        cage: String,

        /// Set the mating date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_mated")]
        mated: Option<String>,

        /// Clear the mating date
        #[arg(long)]
        clear_mated: bool,

        /// Set the notes
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        /// Clear the notes
        #[arg(long)]
        clear_notes: bool,
    },

    /// Remove a breeder-cage record, unhousing (not deleting) the pair
    Delete {
        /// Colony name
        colony: String,
        /// Breeder cage id
        cage: String,
    },

    /// Create a litter cage from a breeder pair and record it
    #[command(
        long_about = "Create a litter cage from a breeder pair and record it.\n\n\
            The litter's animals are created with the breeder's dam and sire \
            as mother and father, then the litter cage id is appended to the \
            breeder record."
    )]
    Litter {
        /// Colony name
        colony: String,

        /// Breeder cage id
        breeder: String,

        /// New litter cage id
        litter: String,

        /// Number of pups
        #[arg(long)]
        count: usize,

        /// Sex of the pups: M/F or male/female
        #[arg(long)]
        sex: String,

        /// Genotype label
        #[arg(long)]
        genotype: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,

        /// Date weaned (YYYY-MM-DD)
        #[arg(long)]
        weaned: Option<String>,

        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Supported completion shells.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
