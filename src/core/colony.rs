//! core::colony
//!
//! The Colony: an insertion-ordered arena of animals plus breeder-cage
//! records, with an id index for lookups.
//!
//! # Architecture
//!
//! Animals live in a `Vec` whose order is meaningful (founder display,
//! file rendering, and layout bucketing all follow it). The arena index
//! is the surrogate key; the user-editable [`AnimalId`] is a mutable,
//! uniquely-constrained label resolved through an `id -> index` map.
//! Renaming an animal therefore touches the map and the references, not
//! the storage.
//!
//! # Invariants
//!
//! - No two animals share an id
//! - `children` back-references agree with `mother`/`father` fields
//! - Parent chains are acyclic

use std::collections::HashMap;

use thiserror::Error;

use super::animal::Animal;
use super::cage::BreederCage;
use super::pedigree::ParentRole;
use super::types::{AnimalId, CageId, Sex};

/// Errors from colony mutations and lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColonyError {
    #[error("animal '{0}' already exists")]
    DuplicateId(AnimalId),

    #[error("no animal with id '{0}'")]
    AnimalNotFound(AnimalId),

    #[error("no animals in cage '{0}'")]
    CageNotFound(CageId),

    #[error("no breeder cage '{0}'")]
    BreederNotFound(CageId),

    #[error("breeder cage '{0}' already exists")]
    DuplicateBreeder(CageId),

    #[error("animal '{id}' is {sex} and cannot be the {role}")]
    InvalidParentSex {
        id: AnimalId,
        role: ParentRole,
        sex: Sex,
    },

    #[error("setting '{parent}' as {role} of '{child}' would create a cycle")]
    CycleDetected {
        child: AnimalId,
        parent: AnimalId,
        role: ParentRole,
    },
}

/// Field changes applied to one animal by [`Colony::edit_animal`].
///
/// `None` leaves a field alone; the nested options distinguish "set to
/// this value" from "clear".
#[derive(Debug, Clone, Default)]
pub struct AnimalEdit {
    pub sex: Option<Sex>,
    pub genotype: Option<String>,
    pub dob: Option<chrono::NaiveDate>,
    pub date_weaned: Option<Option<chrono::NaiveDate>>,
    pub cage: Option<Option<CageId>>,
    pub notes: Option<Option<String>>,
    pub deceased: Option<bool>,
    pub mother: Option<Option<AnimalId>>,
    pub father: Option<Option<AnimalId>>,
}

/// One named population of animals and its breeder cages.
///
/// Not serializable directly; persistence goes through the codec in
/// [`crate::store::schema`], which flattens parent links to ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Colony {
    /// Colony name; doubles as the persistence key.
    pub name: String,
    /// Animals in insertion order.
    pub(crate) animals: Vec<Animal>,
    /// Id index over `animals`. Rebuilt entries on rename.
    pub(crate) index: HashMap<AnimalId, usize>,
    /// Breeder-cage records, insertion-ordered.
    pub(crate) breeders: Vec<BreederCage>,
}

impl Colony {
    /// Create an empty colony.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animals: Vec::new(),
            index: HashMap::new(),
            breeders: Vec::new(),
        }
    }

    /// Number of animals.
    pub fn len(&self) -> usize {
        self.animals.len()
    }

    /// True if the colony has no animals.
    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Iterate animals in insertion order.
    pub fn animals(&self) -> impl Iterator<Item = &Animal> {
        self.animals.iter()
    }

    /// Look up an animal by id.
    pub fn animal(&self, id: &AnimalId) -> Option<&Animal> {
        self.index.get(id).map(|&i| &self.animals[i])
    }

    /// Arena index for an id.
    pub(crate) fn idx(&self, id: &AnimalId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Arena index for an id, or `AnimalNotFound`.
    pub(crate) fn resolve(&self, id: &AnimalId) -> Result<usize, ColonyError> {
        self.idx(id)
            .ok_or_else(|| ColonyError::AnimalNotFound(id.clone()))
    }

    pub(crate) fn animal_mut(&mut self, idx: usize) -> &mut Animal {
        &mut self.animals[idx]
    }

    /// Add an animal to the colony.
    ///
    /// If `mother`/`father` are set on the record they must resolve to
    /// existing animals of the matching sex; the new animal is then
    /// registered in their `children` sets. On any failure nothing is
    /// inserted.
    ///
    /// # Errors
    ///
    /// - `DuplicateId` if the id is already present
    /// - `AnimalNotFound` / `InvalidParentSex` for a bad parent reference
    pub fn add_animal(&mut self, mut animal: Animal) -> Result<(), ColonyError> {
        if self.index.contains_key(&animal.id) {
            return Err(ColonyError::DuplicateId(animal.id));
        }

        // Take the links off the record; they are re-applied through
        // set_parent so both directions are written together.
        let mother = animal.mother.take();
        let father = animal.father.take();

        // Validate everything before inserting so a failure leaves the
        // colony untouched.
        for (role, parent) in [
            (ParentRole::Mother, mother.as_ref()),
            (ParentRole::Father, father.as_ref()),
        ] {
            if let Some(pid) = parent {
                if *pid == animal.id {
                    return Err(ColonyError::CycleDetected {
                        child: animal.id.clone(),
                        parent: pid.clone(),
                        role,
                    });
                }
                self.check_parent(pid, role)?;
            }
        }

        let id = animal.id.clone();
        self.index.insert(id.clone(), self.animals.len());
        self.animals.push(animal);

        // Cannot fail: parents were validated and the new animal has no
        // descendants yet.
        if let Some(m) = mother {
            self.set_parent(&id, ParentRole::Mother, Some(&m))?;
        }
        if let Some(f) = father {
            self.set_parent(&id, ParentRole::Father, Some(&f))?;
        }
        Ok(())
    }

    /// Check that `id` resolves and its sex matches `role`.
    pub(crate) fn check_parent(
        &self,
        id: &AnimalId,
        role: ParentRole,
    ) -> Result<usize, ColonyError> {
        let idx = self.resolve(id)?;
        let sex = self.animals[idx].sex;
        if sex != role.required_sex() {
            return Err(ColonyError::InvalidParentSex {
                id: id.clone(),
                role,
                sex,
            });
        }
        Ok(idx)
    }

    /// Apply field changes to one animal.
    ///
    /// Scalar fields are written directly; parent changes go through
    /// `set_parent`. Everything is validated before anything is applied,
    /// so a failure leaves the animal untouched.
    ///
    /// # Errors
    ///
    /// - `AnimalNotFound` if the animal or a referenced parent is unknown
    /// - `InvalidParentSex` / `CycleDetected` for bad parent edits
    pub fn edit_animal(&mut self, id: &AnimalId, edit: &AnimalEdit) -> Result<(), ColonyError> {
        let idx = self.resolve(id)?;

        for (role, change) in [
            (ParentRole::Mother, &edit.mother),
            (ParentRole::Father, &edit.father),
        ] {
            if let Some(Some(pid)) = change {
                self.check_parent(pid, role)?;
                if self.would_create_cycle(id, pid) {
                    return Err(ColonyError::CycleDetected {
                        child: id.clone(),
                        parent: pid.clone(),
                        role,
                    });
                }
            }
        }

        let animal = &mut self.animals[idx];
        if let Some(sex) = edit.sex {
            animal.sex = sex;
        }
        if let Some(genotype) = &edit.genotype {
            animal.genotype = genotype.clone();
        }
        if let Some(dob) = edit.dob {
            animal.dob = dob;
        }
        if let Some(weaned) = edit.date_weaned {
            animal.date_weaned = weaned;
        }
        if let Some(cage) = &edit.cage {
            animal.cage = cage.clone();
        }
        if let Some(notes) = &edit.notes {
            animal.notes = notes.clone();
        }
        if let Some(deceased) = edit.deceased {
            animal.deceased = deceased;
        }
        if let Some(mother) = &edit.mother {
            self.set_parent(id, ParentRole::Mother, mother.as_ref())?;
        }
        if let Some(father) = &edit.father {
            self.set_parent(id, ParentRole::Father, father.as_ref())?;
        }
        Ok(())
    }

    /// All animals with no recorded parents, in insertion order.
    pub fn founders(&self) -> Vec<&Animal> {
        self.animals.iter().filter(|a| a.is_founder()).collect()
    }

    /// All female animals, in insertion order.
    pub fn females(&self) -> Vec<&Animal> {
        self.by_sex(Sex::Female)
    }

    /// All male animals, in insertion order.
    pub fn males(&self) -> Vec<&Animal> {
        self.by_sex(Sex::Male)
    }

    fn by_sex(&self, sex: Sex) -> Vec<&Animal> {
        self.animals.iter().filter(|a| a.sex == sex).collect()
    }

    /// Sorted distinct non-empty cage ids.
    pub fn unique_cage_ids(&self) -> Vec<CageId> {
        let mut ids: Vec<CageId> = self
            .animals
            .iter()
            .filter_map(|a| a.cage.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Animals housed in `cage`, in insertion order.
    pub fn cage_members(&self, cage: &CageId) -> Vec<&Animal> {
        self.animals
            .iter()
            .filter(|a| a.cage.as_ref() == Some(cage))
            .collect()
    }

    /// Breeder-cage records, insertion-ordered.
    pub fn breeder_cages(&self) -> &[BreederCage] {
        &self.breeders
    }

    /// Look up a breeder cage by id.
    pub fn breeder_cage(&self, cage: &CageId) -> Option<&BreederCage> {
        self.breeders.iter().find(|b| &b.cage == cage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn id(s: &str) -> AnimalId {
        AnimalId::new(s).unwrap()
    }

    fn founder(colony: &mut Colony, animal_id: &str, sex: Sex) {
        colony
            .add_animal(Animal::new(id(animal_id), sex, "wt", dob()))
            .unwrap();
    }

    #[test]
    fn add_rejects_duplicate_id_and_leaves_colony_unchanged() {
        let mut colony = Colony::new("Lab1");
        founder(&mut colony, "F1", Sex::Female);

        let dup = Animal::new(id("F1"), Sex::Male, "het", dob());
        assert_eq!(colony.add_animal(dup), Err(ColonyError::DuplicateId(id("F1"))));
        assert_eq!(colony.len(), 1);
        assert_eq!(colony.animal(&id("F1")).unwrap().sex, Sex::Female);
    }

    #[test]
    fn add_with_parents_links_both_directions() {
        let mut colony = Colony::new("Lab1");
        founder(&mut colony, "F1", Sex::Female);
        founder(&mut colony, "M1", Sex::Male);

        let mut child = Animal::new(id("C1"), Sex::Female, "het", dob());
        child.mother = Some(id("F1"));
        child.father = Some(id("M1"));
        colony.add_animal(child).unwrap();

        let c1 = colony.animal(&id("C1")).unwrap();
        assert_eq!(c1.mother, Some(id("F1")));
        assert_eq!(c1.father, Some(id("M1")));
        assert_eq!(colony.animal(&id("F1")).unwrap().children, vec![id("C1")]);
        assert_eq!(colony.animal(&id("M1")).unwrap().children, vec![id("C1")]);
    }

    #[test]
    fn add_with_wrong_sex_parent_inserts_nothing() {
        let mut colony = Colony::new("Lab1");
        founder(&mut colony, "M1", Sex::Male);

        let mut child = Animal::new(id("C1"), Sex::Female, "het", dob());
        child.mother = Some(id("M1"));
        let err = colony.add_animal(child).unwrap_err();
        assert_eq!(
            err,
            ColonyError::InvalidParentSex {
                id: id("M1"),
                role: ParentRole::Mother,
                sex: Sex::Male,
            }
        );
        assert!(colony.animal(&id("C1")).is_none());
        assert!(colony.animal(&id("M1")).unwrap().children.is_empty());
    }

    #[test]
    fn add_with_missing_parent_inserts_nothing() {
        let mut colony = Colony::new("Lab1");
        let mut child = Animal::new(id("C1"), Sex::Female, "het", dob());
        child.father = Some(id("ghost"));
        assert_eq!(
            colony.add_animal(child),
            Err(ColonyError::AnimalNotFound(id("ghost")))
        );
        assert!(colony.is_empty());
    }

    #[test]
    fn founders_are_animals_without_parents() {
        let mut colony = Colony::new("Lab1");
        founder(&mut colony, "F1", Sex::Female);
        founder(&mut colony, "M1", Sex::Male);

        let mut child = Animal::new(id("C1"), Sex::Male, "het", dob());
        child.mother = Some(id("F1"));
        child.father = Some(id("M1"));
        colony.add_animal(child).unwrap();

        let founders: Vec<&str> = colony.founders().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(founders, vec!["F1", "M1"]);
    }

    #[test]
    fn sex_filters_and_cage_ids() {
        let mut colony = Colony::new("Lab1");
        founder(&mut colony, "F1", Sex::Female);
        founder(&mut colony, "F2", Sex::Female);
        founder(&mut colony, "M1", Sex::Male);

        assert_eq!(colony.females().len(), 2);
        assert_eq!(colony.males().len(), 1);

        let cage_b = CageId::new("B").unwrap();
        let cage_a = CageId::new("A").unwrap();
        let f1 = colony.resolve(&id("F1")).unwrap();
        colony.animal_mut(f1).cage = Some(cage_b.clone());
        let f2 = colony.resolve(&id("F2")).unwrap();
        colony.animal_mut(f2).cage = Some(cage_a.clone());
        let m1 = colony.resolve(&id("M1")).unwrap();
        colony.animal_mut(m1).cage = Some(cage_b.clone());

        assert_eq!(colony.unique_cage_ids(), vec![cage_a, cage_b.clone()]);
        assert_eq!(colony.cage_members(&cage_b).len(), 2);
    }

    #[test]
    fn edit_animal_applies_fields_and_links() {
        let mut colony = Colony::new("Lab1");
        founder(&mut colony, "F1", Sex::Female);
        founder(&mut colony, "C1", Sex::Male);

        let edit = AnimalEdit {
            genotype: Some("homo".into()),
            notes: Some(Some("ear notch".into())),
            mother: Some(Some(id("F1"))),
            ..Default::default()
        };
        colony.edit_animal(&id("C1"), &edit).unwrap();

        let c1 = colony.animal(&id("C1")).unwrap();
        assert_eq!(c1.genotype, "homo");
        assert_eq!(c1.notes.as_deref(), Some("ear notch"));
        assert_eq!(c1.mother, Some(id("F1")));
        assert_eq!(colony.animal(&id("F1")).unwrap().children, vec![id("C1")]);
    }

    #[test]
    fn edit_animal_with_bad_parent_applies_nothing() {
        let mut colony = Colony::new("Lab1");
        founder(&mut colony, "M1", Sex::Male);
        founder(&mut colony, "C1", Sex::Female);

        let edit = AnimalEdit {
            genotype: Some("homo".into()),
            mother: Some(Some(id("M1"))),
            ..Default::default()
        };
        assert!(colony.edit_animal(&id("C1"), &edit).is_err());
        // The scalar edit was held back too.
        assert_eq!(colony.animal(&id("C1")).unwrap().genotype, "wt");
    }

    #[test]
    fn lookup_of_absent_id_is_none_not_error() {
        let colony = Colony::new("Lab1");
        assert!(colony.animal(&id("nope")).is_none());
    }
}
