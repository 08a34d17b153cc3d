//! Herdbook - a pedigree graph engine for laboratory animal colonies
//!
//! Herdbook tracks a colony as a genealogical record: animals with their
//! sex, genotype, and birth metadata, bidirectional parent/child links,
//! cage groupings, breeding pairs and their litters, and a generation-
//! layered layout for rendering the pedigree as a tree.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Domain types, the colony graph, integrity rules, queries,
//!   cage management, and generation layout
//! - [`store`] - File-backed colony persistence (one record per colony)
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! Herdbook maintains the following invariants:
//!
//! 1. Animal ids are unique within a colony at all times
//! 2. Parent links and `children` back-references are symmetric and are
//!    only ever written together, through a single integrity path
//! 3. Parent chains are acyclic; assignments that would create a cycle
//!    are rejected before any mutation
//! 4. Mothers are female and fathers are male, checked where the link
//!    is created

pub mod cli;
pub mod core;
pub mod store;
pub mod ui;
