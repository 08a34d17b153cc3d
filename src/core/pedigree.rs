//! core::pedigree
//!
//! Integrity rules for parent links.
//!
//! # Architecture
//!
//! Every mutation of `mother`, `father`, or `children` in the whole crate
//! goes through the three operations here. A parent link is one fact with
//! two stored views (the child's parent field and the parent's `children`
//! entry); a single writer of both views is what keeps them symmetric.
//! Ad-hoc relink code that updates one side, or mixes ids and records for
//! the same field, is exactly the defect class this module exists to
//! remove.
//!
//! # Invariants
//!
//! - `a.mother == Some(m)` iff `a.id` appears in `m.children` (same for
//!   father), after any sequence of operations
//! - A rename rewrites every reference in one pass; there is no state in
//!   which old and new ids coexist
//! - A delete leaves no dangling reference to the removed id
//! - An assignment that would make an animal its own ancestor is
//!   rejected before anything is written

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::colony::{Colony, ColonyError};
use super::types::{AnimalId, Sex};

/// Which parent slot an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentRole {
    Mother,
    Father,
}

impl ParentRole {
    /// The sex an animal must have to fill this role.
    pub fn required_sex(self) -> Sex {
        match self {
            ParentRole::Mother => Sex::Female,
            ParentRole::Father => Sex::Male,
        }
    }
}

impl fmt::Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRole::Mother => f.write_str("mother"),
            ParentRole::Father => f.write_str("father"),
        }
    }
}

impl Colony {
    /// Set or clear a parent link.
    ///
    /// This is the single correct way to change a mother or father
    /// reference. Steps, in order:
    ///
    /// 1. Resolve the child and (if given) the new parent
    /// 2. Validate the new parent's sex against the role
    /// 3. Reject assignments that would make `child` its own ancestor
    /// 4. Unlink the old parent of that role, assign the new one, and
    ///    register the back-reference (idempotently)
    ///
    /// Steps 1-3 run before any write, so a failure leaves the colony
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - `AnimalNotFound` if child or new parent is unknown
    /// - `InvalidParentSex` if the new parent's sex does not match
    /// - `CycleDetected` if the assignment would create a parent cycle
    pub fn set_parent(
        &mut self,
        child: &AnimalId,
        role: ParentRole,
        new_parent: Option<&AnimalId>,
    ) -> Result<(), ColonyError> {
        let child_idx = self.resolve(child)?;

        let new_parent_idx = match new_parent {
            Some(pid) => {
                let idx = self.check_parent(pid, role)?;
                if self.would_create_cycle(child, pid) {
                    return Err(ColonyError::CycleDetected {
                        child: child.clone(),
                        parent: pid.clone(),
                        role,
                    });
                }
                Some(idx)
            }
            None => None,
        };

        // Unlink the previous parent of this role.
        let old_parent = self.animals[child_idx].parent(role).cloned();
        if let Some(old) = old_parent {
            if let Some(old_idx) = self.idx(&old) {
                let child_id = self.animals[child_idx].id.clone();
                self.animals[old_idx].children.retain(|c| c != &child_id);
            }
        }

        // Assign and back-link.
        let child_id = self.animals[child_idx].id.clone();
        match role {
            ParentRole::Mother => self.animals[child_idx].mother = new_parent.cloned(),
            ParentRole::Father => self.animals[child_idx].father = new_parent.cloned(),
        }
        if let Some(p_idx) = new_parent_idx {
            if !self.animals[p_idx].children.contains(&child_id) {
                self.animals[p_idx].children.push(child_id);
            }
        }
        Ok(())
    }

    /// True if making `parent` a parent of `child` would create a cycle,
    /// i.e. `child` is `parent` itself or an ancestor of `parent`.
    pub(crate) fn would_create_cycle(&self, child: &AnimalId, parent: &AnimalId) -> bool {
        if child == parent {
            return true;
        }
        let mut visited: HashSet<&AnimalId> = HashSet::new();
        let mut stack = vec![parent];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(animal) = self.animal(current) else {
                continue;
            };
            for link in [animal.mother.as_ref(), animal.father.as_ref()] {
                if let Some(ancestor) = link {
                    if ancestor == child {
                        return true;
                    }
                    stack.push(ancestor);
                }
            }
        }
        false
    }

    /// Rename an animal, rewriting every reference to it.
    ///
    /// The animal's own id, the id index, every other animal's
    /// mother/father/children entries, and breeder-cage parent references
    /// are all rewritten in one pass. The colony is either fully renamed
    /// or untouched.
    ///
    /// # Errors
    ///
    /// - `AnimalNotFound` if `old` is unknown
    /// - `DuplicateId` if `new` is already taken by another animal
    pub fn rename_animal(&mut self, old: &AnimalId, new: &AnimalId) -> Result<(), ColonyError> {
        let idx = self.resolve(old)?;
        if old == new {
            return Ok(());
        }
        if self.index.contains_key(new) {
            return Err(ColonyError::DuplicateId(new.clone()));
        }

        self.animals[idx].id = new.clone();
        self.index.remove(old);
        self.index.insert(new.clone(), idx);

        for animal in &mut self.animals {
            if animal.mother.as_ref() == Some(old) {
                animal.mother = Some(new.clone());
            }
            if animal.father.as_ref() == Some(old) {
                animal.father = Some(new.clone());
            }
            for child in &mut animal.children {
                if child == old {
                    *child = new.clone();
                }
            }
        }
        for breeder in &mut self.breeders {
            if &breeder.mother == old {
                breeder.mother = new.clone();
            }
            if &breeder.father == old {
                breeder.father = new.clone();
            }
        }
        Ok(())
    }

    /// Delete an animal, severing all references to it.
    ///
    /// The animal is removed from its parents' `children`, any other
    /// animal's mother/father field pointing at it is cleared (never left
    /// dangling), and breeder-cage records anchored to it are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AnimalNotFound` if `id` is unknown.
    pub fn delete_animal(&mut self, id: &AnimalId) -> Result<(), ColonyError> {
        let idx = self.resolve(id)?;

        for role in [ParentRole::Mother, ParentRole::Father] {
            self.set_parent(id, role, None)?;
        }

        for animal in &mut self.animals {
            if animal.mother.as_ref() == Some(id) {
                animal.mother = None;
            }
            if animal.father.as_ref() == Some(id) {
                animal.father = None;
            }
            animal.children.retain(|c| c != id);
        }

        // A breeder record without its pair is meaningless; removing it
        // keeps the record set free of dangling animal ids.
        self.breeders
            .retain(|b| &b.mother != id && &b.father != id);

        self.animals.remove(idx);
        self.index.remove(id);
        for i in self.index.values_mut() {
            if *i > idx {
                *i -= 1;
            }
        }
        Ok(())
    }
}
