//! core::cage
//!
//! Cage and breeder-cage management.
//!
//! # Model
//!
//! A cage is a housing label shared by a group of animals; membership is
//! the set of animals whose `cage` field carries the label. A breeder
//! cage is a record pairing one female and one male for mating and
//! tracking the litter cages the pair produces.
//!
//! Bulk operations here never touch parent links directly; they go
//! through the integrity operations in [`crate::core::pedigree`], and
//! they validate everything up front so a failure applies nothing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::animal::Animal;
use super::colony::{Colony, ColonyError};
use super::pedigree::ParentRole;
use super::types::{AnimalId, CageId, Sex};

/// A breeding pair and the litters it has produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreederCage {
    /// Cage id, unique among breeder cages.
    pub cage: CageId,
    /// The dam; must be female when the record is created.
    pub mother: AnimalId,
    /// The sire; must be male when the record is created.
    pub father: AnimalId,
    /// Date the pair was set up, if recorded.
    pub date_mated: Option<NaiveDate>,
    /// Free text.
    pub notes: Option<String>,
    /// Cage ids of litters produced by this pair, append-only.
    pub litters: Vec<CageId>,
}

/// Attributes for the animals a cage is populated with.
#[derive(Debug, Clone)]
pub struct CageSpec {
    pub cage: CageId,
    /// Number of animals to create; member ids are `{cage}_{1..=count}`.
    pub count: usize,
    pub sex: Sex,
    pub genotype: String,
    pub dob: NaiveDate,
    pub date_weaned: Option<NaiveDate>,
    pub notes: Option<String>,
    pub mother: Option<AnimalId>,
    pub father: Option<AnimalId>,
}

/// Field changes applied to every member of a cage.
///
/// `None` leaves a field alone; the nested options distinguish "set to
/// this value" from "clear".
#[derive(Debug, Clone, Default)]
pub struct CageEdit {
    pub sex: Option<Sex>,
    pub genotype: Option<String>,
    pub dob: Option<NaiveDate>,
    pub date_weaned: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
    pub deceased: Option<bool>,
    pub mother: Option<Option<AnimalId>>,
    pub father: Option<Option<AnimalId>>,
}

/// Field changes for a breeder-cage record.
#[derive(Debug, Clone, Default)]
pub struct BreederEdit {
    pub date_mated: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

impl Colony {
    /// Populate a cage with `count` animals sharing the given attributes.
    ///
    /// Member ids follow the `{cage}_{i}` convention for i in 1..=count.
    /// All generated ids and any parent references are validated before
    /// the first insert, so a failure creates nothing.
    ///
    /// # Errors
    ///
    /// - `DuplicateId` if any generated id already exists
    /// - `AnimalNotFound` / `InvalidParentSex` for bad parent references
    pub fn add_cage(&mut self, spec: &CageSpec) -> Result<Vec<AnimalId>, ColonyError> {
        let ids: Vec<AnimalId> = (1..=spec.count).map(|i| spec.cage.member_id(i)).collect();
        for member in &ids {
            if self.animal(member).is_some() {
                return Err(ColonyError::DuplicateId(member.clone()));
            }
        }
        if let Some(m) = &spec.mother {
            self.check_parent(m, ParentRole::Mother)?;
        }
        if let Some(f) = &spec.father {
            self.check_parent(f, ParentRole::Father)?;
        }

        for member in &ids {
            let mut animal = Animal::new(member.clone(), spec.sex, spec.genotype.clone(), spec.dob);
            animal.cage = Some(spec.cage.clone());
            animal.date_weaned = spec.date_weaned;
            animal.notes = spec.notes.clone();
            animal.mother = spec.mother.clone();
            animal.father = spec.father.clone();
            self.add_animal(animal)?;
        }
        Ok(ids)
    }

    /// Apply field changes to every animal housed in `cage`, optionally
    /// relabeling the cage.
    ///
    /// With `new_cage` given, each member's cage label changes and member
    /// ids following the `{cage}_{n}` convention are regenerated under
    /// the new prefix via `rename_animal`, keeping every reference in the
    /// colony consistent. All edits are validated before anything is
    /// applied.
    ///
    /// # Errors
    ///
    /// - `CageNotFound` if no animals carry the label
    /// - `DuplicateId` if a regenerated id is already taken
    /// - `AnimalNotFound` / `InvalidParentSex` / `CycleDetected` for bad
    ///   parent edits
    pub fn edit_cage(
        &mut self,
        cage: &CageId,
        edit: &CageEdit,
        new_cage: Option<&CageId>,
    ) -> Result<(), ColonyError> {
        let members: Vec<AnimalId> = self
            .cage_members(cage)
            .into_iter()
            .map(|a| a.id.clone())
            .collect();
        if members.is_empty() {
            return Err(ColonyError::CageNotFound(cage.clone()));
        }

        // Validate parent edits against every member first, so a cycle
        // on the last member cannot leave the first members relinked.
        for (role, change) in [
            (ParentRole::Mother, &edit.mother),
            (ParentRole::Father, &edit.father),
        ] {
            if let Some(Some(pid)) = change {
                self.check_parent(pid, role)?;
                for member in &members {
                    if self.would_create_cycle(member, pid) {
                        return Err(ColonyError::CycleDetected {
                            child: member.clone(),
                            parent: pid.clone(),
                            role,
                        });
                    }
                }
            }
        }

        // Validate regenerated ids before touching anything.
        let renames: Vec<(AnimalId, AnimalId)> = match new_cage {
            Some(new_cage) => members
                .iter()
                .filter_map(|m| {
                    cage.member_index(m)
                        .map(|n| (m.clone(), new_cage.member_id(n)))
                })
                .collect(),
            None => Vec::new(),
        };
        // An occupied target id is only tolerable when that occupant is
        // itself renamed away as part of this batch; a member that merely
        // shares the cage does not vacate the id.
        for (_, new_id) in &renames {
            if self.animal(new_id).is_some()
                && !renames.iter().any(|(old, _)| old == new_id)
            {
                return Err(ColonyError::DuplicateId(new_id.clone()));
            }
        }

        for member in &members {
            let idx = self.resolve(member)?;
            let animal = self.animal_mut(idx);
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
            if let Some(notes) = &edit.notes {
                animal.notes = notes.clone();
            }
            if let Some(deceased) = edit.deceased {
                animal.deceased = deceased;
            }
            if let Some(mother) = &edit.mother {
                self.set_parent(member, ParentRole::Mother, mother.as_ref())?;
            }
            if let Some(father) = &edit.father {
                self.set_parent(member, ParentRole::Father, father.as_ref())?;
            }
        }

        if let Some(new_cage) = new_cage {
            for member in &members {
                let idx = self.resolve(member)?;
                self.animal_mut(idx).cage = Some(new_cage.clone());
            }
            for (old_id, new_id) in &renames {
                self.rename_animal(old_id, new_id)?;
            }
        }
        Ok(())
    }

    /// Delete every animal housed in `cage`.
    ///
    /// Members are removed through `delete_animal`, so parent and child
    /// references elsewhere are cleaned up. Deleting an unknown or empty
    /// cage is a no-op.
    pub fn delete_cage(&mut self, cage: &CageId) -> Result<usize, ColonyError> {
        let members: Vec<AnimalId> = self
            .cage_members(cage)
            .into_iter()
            .map(|a| a.id.clone())
            .collect();
        for member in &members {
            self.delete_animal(member)?;
        }
        Ok(members.len())
    }

    /// Create a breeder-cage record pairing `mother` and `father`, and
    /// house both in `cage`.
    ///
    /// # Errors
    ///
    /// - `DuplicateBreeder` if a breeder record already uses the cage id
    /// - `AnimalNotFound` / `InvalidParentSex` if either parent is
    ///   missing or of the wrong sex
    pub fn add_breeder_cage(
        &mut self,
        cage: &CageId,
        mother: &AnimalId,
        father: &AnimalId,
        date_mated: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<(), ColonyError> {
        if self.breeder_cage(cage).is_some() {
            return Err(ColonyError::DuplicateBreeder(cage.clone()));
        }
        let mother_idx = self.check_parent(mother, ParentRole::Mother)?;
        let father_idx = self.check_parent(father, ParentRole::Father)?;

        self.animal_mut(mother_idx).cage = Some(cage.clone());
        self.animal_mut(father_idx).cage = Some(cage.clone());
        self.breeders.push(BreederCage {
            cage: cage.clone(),
            mother: mother.clone(),
            father: father.clone(),
            date_mated,
            notes,
            litters: Vec::new(),
        });
        Ok(())
    }

    /// Record a litter cage against a breeder cage.
    ///
    /// Intended to be called after the litter's animals were created via
    /// [`Colony::add_cage`] with the breeder pair as parents.
    ///
    /// # Errors
    ///
    /// Returns `BreederNotFound` if the breeder cage does not exist.
    pub fn record_litter(&mut self, breeder: &CageId, litter: &CageId) -> Result<(), ColonyError> {
        let record = self
            .breeders
            .iter_mut()
            .find(|b| &b.cage == breeder)
            .ok_or_else(|| ColonyError::BreederNotFound(breeder.clone()))?;
        record.litters.push(litter.clone());
        Ok(())
    }

    /// Update a breeder-cage record's mating date or notes.
    ///
    /// # Errors
    ///
    /// Returns `BreederNotFound` if the breeder cage does not exist.
    pub fn edit_breeder_cage(&mut self, cage: &CageId, edit: &BreederEdit) -> Result<(), ColonyError> {
        let record = self
            .breeders
            .iter_mut()
            .find(|b| &b.cage == cage)
            .ok_or_else(|| ColonyError::BreederNotFound(cage.clone()))?;
        if let Some(date_mated) = edit.date_mated {
            record.date_mated = date_mated;
        }
        if let Some(notes) = &edit.notes {
            record.notes = notes.clone();
        }
        Ok(())
    }

    /// Remove a breeder-cage record, unhousing (not deleting) both
    /// parents.
    ///
    /// # Errors
    ///
    /// Returns `BreederNotFound` if the breeder cage does not exist.
    pub fn delete_breeder_cage(&mut self, cage: &CageId) -> Result<(), ColonyError> {
        let pos = self
            .breeders
            .iter()
            .position(|b| &b.cage == cage)
            .ok_or_else(|| ColonyError::BreederNotFound(cage.clone()))?;
        let record = self.breeders.remove(pos);
        for parent in [&record.mother, &record.father] {
            if let Some(idx) = self.idx(parent) {
                if self.animals[idx].cage.as_ref() == Some(cage) {
                    self.animal_mut(idx).cage = None;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn id(s: &str) -> AnimalId {
        AnimalId::new(s).unwrap()
    }

    fn cage(s: &str) -> CageId {
        CageId::new(s).unwrap()
    }

    fn spec(c: &str, count: usize, sex: Sex) -> CageSpec {
        CageSpec {
            cage: cage(c),
            count,
            sex,
            genotype: "het".into(),
            dob: dob(),
            date_weaned: None,
            notes: None,
            mother: None,
            father: None,
        }
    }

    fn breeding_colony() -> Colony {
        let mut colony = Colony::new("Lab1");
        colony
            .add_animal(Animal::new(id("F1"), Sex::Female, "wt", dob()))
            .unwrap();
        colony
            .add_animal(Animal::new(id("M1"), Sex::Male, "wt", dob()))
            .unwrap();
        colony
    }

    #[test]
    fn add_cage_generates_member_ids() {
        let mut colony = Colony::new("Lab1");
        let ids = colony.add_cage(&spec("CAGE5", 3, Sex::Female)).unwrap();
        assert_eq!(
            ids,
            vec![id("CAGE5_1"), id("CAGE5_2"), id("CAGE5_3")]
        );
        for member in &ids {
            let a = colony.animal(member).unwrap();
            assert_eq!(a.cage, Some(cage("CAGE5")));
            assert_eq!(a.genotype, "het");
        }
    }

    #[test]
    fn add_cage_is_atomic_on_collision() {
        let mut colony = Colony::new("Lab1");
        colony.add_cage(&spec("CAGE5", 3, Sex::Female)).unwrap();

        let err = colony.add_cage(&spec("CAGE5", 2, Sex::Male)).unwrap_err();
        assert_eq!(err, ColonyError::DuplicateId(id("CAGE5_1")));
        // The second call created nothing and changed nothing.
        assert_eq!(colony.len(), 3);
        assert_eq!(colony.animal(&id("CAGE5_1")).unwrap().sex, Sex::Female);
    }

    #[test]
    fn add_cage_with_parents_links_all_members() {
        let mut colony = breeding_colony();
        let mut s = spec("L1", 2, Sex::Female);
        s.mother = Some(id("F1"));
        s.father = Some(id("M1"));
        colony.add_cage(&s).unwrap();

        assert_eq!(
            colony.animal(&id("F1")).unwrap().children,
            vec![id("L1_1"), id("L1_2")]
        );
        assert_eq!(colony.animal(&id("L1_2")).unwrap().father, Some(id("M1")));
    }

    #[test]
    fn add_cage_with_bad_parent_creates_nothing() {
        let mut colony = breeding_colony();
        let mut s = spec("L1", 2, Sex::Female);
        s.mother = Some(id("M1")); // male as mother
        assert!(matches!(
            colony.add_cage(&s).unwrap_err(),
            ColonyError::InvalidParentSex { .. }
        ));
        assert_eq!(colony.len(), 2);
    }

    #[test]
    fn edit_cage_applies_fields_to_all_members() {
        let mut colony = Colony::new("Lab1");
        colony.add_cage(&spec("C1", 2, Sex::Female)).unwrap();

        let edit = CageEdit {
            genotype: Some("homo".into()),
            deceased: Some(true),
            ..Default::default()
        };
        colony.edit_cage(&cage("C1"), &edit, None).unwrap();

        for member in colony.cage_members(&cage("C1")) {
            assert_eq!(member.genotype, "homo");
            assert!(member.deceased);
        }
    }

    #[test]
    fn edit_cage_unknown_label_fails() {
        let mut colony = Colony::new("Lab1");
        assert_eq!(
            colony.edit_cage(&cage("nope"), &CageEdit::default(), None),
            Err(ColonyError::CageNotFound(cage("nope")))
        );
    }

    #[test]
    fn edit_cage_rename_regenerates_member_ids() {
        let mut colony = breeding_colony();
        let mut s = spec("OLD", 2, Sex::Female);
        s.mother = Some(id("F1"));
        colony.add_cage(&s).unwrap();

        colony
            .edit_cage(&cage("OLD"), &CageEdit::default(), Some(&cage("NEW")))
            .unwrap();

        assert!(colony.animal(&id("OLD_1")).is_none());
        let renamed = colony.animal(&id("NEW_1")).unwrap();
        assert_eq!(renamed.cage, Some(cage("NEW")));
        // References followed the rename.
        assert_eq!(
            colony.animal(&id("F1")).unwrap().children,
            vec![id("NEW_1"), id("NEW_2")]
        );
    }

    #[test]
    fn edit_cage_rename_keeps_nonconventional_ids() {
        let mut colony = Colony::new("Lab1");
        colony.add_cage(&spec("C1", 1, Sex::Female)).unwrap();
        // An animal housed in C1 whose id does not follow the pattern.
        let mut loner = Animal::new(id("ZZ9"), Sex::Male, "wt", dob());
        loner.cage = Some(cage("C1"));
        colony.add_animal(loner).unwrap();

        colony
            .edit_cage(&cage("C1"), &CageEdit::default(), Some(&cage("C2")))
            .unwrap();

        // Relabeled but not renamed.
        let loner = colony.animal(&id("ZZ9")).unwrap();
        assert_eq!(loner.cage, Some(cage("C2")));
        assert!(colony.animal(&id("C2_1")).is_some());
    }

    #[test]
    fn edit_cage_rename_collision_applies_nothing() {
        let mut colony = Colony::new("Lab1");
        colony.add_cage(&spec("A", 1, Sex::Female)).unwrap();
        colony.add_cage(&spec("B", 1, Sex::Male)).unwrap();

        let edit = CageEdit {
            genotype: Some("changed".into()),
            ..Default::default()
        };
        let err = colony
            .edit_cage(&cage("A"), &edit, Some(&cage("B")))
            .unwrap_err();
        assert_eq!(err, ColonyError::DuplicateId(id("B_1")));
        // Field edits were not applied either.
        assert_eq!(colony.animal(&id("A_1")).unwrap().genotype, "het");
    }

    #[test]
    fn edit_cage_rename_collision_with_own_member_applies_nothing() {
        // A member already squatting on a target id does not vacate it:
        // B_1 lives in cage A but keeps its id through the relabel, so
        // renaming A_1 to B_1 must fail before anything is touched.
        let mut colony = Colony::new("Lab1");
        colony.add_cage(&spec("A", 1, Sex::Female)).unwrap();
        let mut squatter = Animal::new(id("B_1"), Sex::Male, "wt", dob());
        squatter.cage = Some(cage("A"));
        colony.add_animal(squatter).unwrap();

        let edit = CageEdit {
            genotype: Some("changed".into()),
            ..Default::default()
        };
        let err = colony
            .edit_cage(&cage("A"), &edit, Some(&cage("B")))
            .unwrap_err();
        assert_eq!(err, ColonyError::DuplicateId(id("B_1")));
        // Nothing leaked: ids, cage labels, and fields are untouched.
        let a1 = colony.animal(&id("A_1")).unwrap();
        assert_eq!(a1.genotype, "het");
        assert_eq!(a1.cage, Some(cage("A")));
        assert_eq!(colony.animal(&id("B_1")).unwrap().genotype, "wt");
    }

    #[test]
    fn delete_cage_removes_members_and_cleans_links() {
        let mut colony = breeding_colony();
        let mut s = spec("L1", 2, Sex::Female);
        s.mother = Some(id("F1"));
        colony.add_cage(&s).unwrap();

        let removed = colony.delete_cage(&cage("L1")).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(colony.len(), 2);
        assert!(colony.animal(&id("F1")).unwrap().children.is_empty());

        // Unknown cage is a no-op.
        assert_eq!(colony.delete_cage(&cage("L1")).unwrap(), 0);
    }

    #[test]
    fn breeder_cage_requires_a_real_pair() {
        let mut colony = breeding_colony();

        // Wrong sex for the mother slot.
        let err = colony
            .add_breeder_cage(&cage("BC1"), &id("M1"), &id("M1"), None, None)
            .unwrap_err();
        assert!(matches!(err, ColonyError::InvalidParentSex { .. }));
        assert!(colony.breeder_cages().is_empty());

        // Unknown father.
        let err = colony
            .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M2"), None, None)
            .unwrap_err();
        assert_eq!(err, ColonyError::AnimalNotFound(id("M2")));
        assert!(colony.breeder_cages().is_empty());
    }

    #[test]
    fn breeder_cage_houses_both_parents() {
        let mut colony = breeding_colony();
        colony
            .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), Some(dob()), None)
            .unwrap();

        assert_eq!(colony.animal(&id("F1")).unwrap().cage, Some(cage("BC1")));
        assert_eq!(colony.animal(&id("M1")).unwrap().cage, Some(cage("BC1")));
        let record = colony.breeder_cage(&cage("BC1")).unwrap();
        assert_eq!(record.mother, id("F1"));
        assert_eq!(record.date_mated, Some(dob()));

        // Second record on the same cage id is rejected.
        assert_eq!(
            colony.add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), None, None),
            Err(ColonyError::DuplicateBreeder(cage("BC1")))
        );
    }

    #[test]
    fn litters_append_in_order() {
        let mut colony = breeding_colony();
        colony
            .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), None, None)
            .unwrap();

        let mut litter = spec("L1", 3, Sex::Female);
        litter.mother = Some(id("F1"));
        litter.father = Some(id("M1"));
        colony.add_cage(&litter).unwrap();
        colony.record_litter(&cage("BC1"), &cage("L1")).unwrap();
        colony.record_litter(&cage("BC1"), &cage("L2")).unwrap();

        let record = colony.breeder_cage(&cage("BC1")).unwrap();
        assert_eq!(record.litters, vec![cage("L1"), cage("L2")]);

        assert_eq!(
            colony.record_litter(&cage("BCX"), &cage("L3")),
            Err(ColonyError::BreederNotFound(cage("BCX")))
        );
    }

    #[test]
    fn edit_breeder_cage_updates_record() {
        let mut colony = breeding_colony();
        colony
            .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), None, None)
            .unwrap();

        let edit = BreederEdit {
            date_mated: Some(Some(dob())),
            notes: Some(Some("second pairing".into())),
        };
        colony.edit_breeder_cage(&cage("BC1"), &edit).unwrap();
        let record = colony.breeder_cage(&cage("BC1")).unwrap();
        assert_eq!(record.date_mated, Some(dob()));
        assert_eq!(record.notes.as_deref(), Some("second pairing"));
    }

    #[test]
    fn delete_breeder_cage_unhouses_but_keeps_parents() {
        let mut colony = breeding_colony();
        colony
            .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), None, None)
            .unwrap();
        colony.delete_breeder_cage(&cage("BC1")).unwrap();

        assert!(colony.breeder_cage(&cage("BC1")).is_none());
        let f1 = colony.animal(&id("F1")).unwrap();
        assert!(f1.cage.is_none());
        assert_eq!(colony.len(), 2);
    }

    #[test]
    fn deleting_a_parent_drops_its_breeder_record() {
        let mut colony = breeding_colony();
        colony
            .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), None, None)
            .unwrap();
        colony.delete_animal(&id("F1")).unwrap();
        assert!(colony.breeder_cage(&cage("BC1")).is_none());
    }
}
