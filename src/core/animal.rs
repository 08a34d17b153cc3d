//! core::animal
//!
//! The Animal record: identity, biological and housing attributes, and
//! weak references to parents and children.
//!
//! # Reference discipline
//!
//! `mother`, `father`, and `children` hold [`AnimalId`]s, never embedded
//! records. They identify other animals in the same colony without
//! implying ownership or lifetime. Resolution happens through the
//! colony's id index, and the fields themselves are only written by the
//! integrity operations in [`crate::core::pedigree`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{AnimalId, CageId, Sex};

/// One animal in a colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    /// Unique, user-editable identifier (primary key within the colony).
    pub id: AnimalId,
    /// Normalized sex.
    pub sex: Sex,
    /// Free-form allele classification; not validated by the core.
    pub genotype: String,
    /// Date of birth.
    pub dob: NaiveDate,
    /// Date weaned, if recorded.
    pub date_weaned: Option<NaiveDate>,
    /// Housing label; a join key, not an ownership relation.
    pub cage: Option<CageId>,
    /// Free text.
    pub notes: Option<String>,
    /// Whether the animal is deceased.
    pub deceased: bool,
    /// Mother, by id. Written only through `Colony::set_parent`.
    pub mother: Option<AnimalId>,
    /// Father, by id. Written only through `Colony::set_parent`.
    pub father: Option<AnimalId>,
    /// Back-references to offspring, insertion-ordered, no duplicates.
    /// Maintained symmetrically with the parent fields.
    pub children: Vec<AnimalId>,
}

impl Animal {
    /// Create an animal with the required attributes and everything else
    /// unset. Parent links are attached afterwards via
    /// `Colony::add_animal` / `Colony::set_parent` so that both link
    /// directions stay consistent.
    pub fn new(id: AnimalId, sex: Sex, genotype: impl Into<String>, dob: NaiveDate) -> Self {
        Self {
            id,
            sex,
            genotype: genotype.into(),
            dob,
            date_weaned: None,
            cage: None,
            notes: None,
            deceased: false,
            mother: None,
            father: None,
            children: Vec::new(),
        }
    }

    /// True if the animal has no recorded parents.
    pub fn is_founder(&self) -> bool {
        self.mother.is_none() && self.father.is_none()
    }

    /// The parent id for the given role, if set.
    pub fn parent(&self, role: super::pedigree::ParentRole) -> Option<&AnimalId> {
        match role {
            super::pedigree::ParentRole::Mother => self.mother.as_ref(),
            super::pedigree::ParentRole::Father => self.father.as_ref(),
        }
    }
}
