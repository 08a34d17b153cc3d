//! core
//!
//! Core domain types and operations for Herdbook.
//!
//! # Modules
//!
//! - [`types`] - Strong types: AnimalId, CageId, Sex, date parsing
//! - [`animal`] - The Animal record
//! - [`colony`] - The Colony arena store and its lookups
//! - [`pedigree`] - Integrity rules for parent links (the only writer of
//!   mother/father/children)
//! - [`genealogy`] - Derived queries: children, siblings, cousins
//! - [`cage`] - Cage and breeder-cage management
//! - [`layout`] - Generation assignment and 2-D tree layout
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Both directions of a parent link are written by one function
//! - All verification is deterministic; queries are pure

pub mod animal;
pub mod cage;
pub mod colony;
pub mod config;
pub mod genealogy;
pub mod layout;
pub mod pedigree;
pub mod types;

pub use animal::Animal;
pub use cage::{BreederCage, BreederEdit, CageEdit, CageSpec};
pub use colony::{AnimalEdit, Colony, ColonyError};
pub use pedigree::ParentRole;
