//! core::genealogy
//!
//! Derived kinship queries: children, siblings, cousins.
//!
//! # Design
//!
//! All queries are pure functions over the current graph, recomputed on
//! every call. Colony sizes are tens to low hundreds of animals, so
//! there is no cached adjacency index; if one is ever needed it must be
//! invalidated inside the integrity operations in
//! [`crate::core::pedigree`], nowhere else.
//!
//! Results are deduplicated and returned in colony insertion order, so
//! repeated calls over the same data render identically.

use std::collections::HashSet;

use super::animal::Animal;
use super::colony::{Colony, ColonyError};
use super::types::AnimalId;

impl Colony {
    /// All animals whose mother or father is `id`.
    ///
    /// # Errors
    ///
    /// Returns `AnimalNotFound` if `id` is unknown.
    pub fn children_of(&self, id: &AnimalId) -> Result<Vec<&Animal>, ColonyError> {
        self.resolve(id)?;
        Ok(self
            .animals()
            .filter(|a| a.mother.as_ref() == Some(id) || a.father.as_ref() == Some(id))
            .collect())
    }

    /// All animals sharing a mother or father with `id`, excluding the
    /// animal itself. Full siblings appear once.
    ///
    /// # Errors
    ///
    /// Returns `AnimalNotFound` if `id` is unknown.
    pub fn siblings_of(&self, id: &AnimalId) -> Result<Vec<&Animal>, ColonyError> {
        let animal = &self.animals[self.resolve(id)?];
        let mut wanted: HashSet<&AnimalId> = HashSet::new();
        for parent in [animal.mother.as_ref(), animal.father.as_ref()]
            .into_iter()
            .flatten()
        {
            if let Some(p) = self.animal(parent) {
                wanted.extend(p.children.iter().filter(|c| *c != id));
            }
        }
        Ok(self.in_colony_order(&wanted))
    }

    /// Children of `id`'s aunts and uncles (its parents' siblings),
    /// deduplicated. Empty if the animal has no parents.
    ///
    /// # Errors
    ///
    /// Returns `AnimalNotFound` if `id` is unknown.
    pub fn cousins_of(&self, id: &AnimalId) -> Result<Vec<&Animal>, ColonyError> {
        let animal = &self.animals[self.resolve(id)?];
        let parents: Vec<AnimalId> = [animal.mother.clone(), animal.father.clone()]
            .into_iter()
            .flatten()
            .collect();

        let mut wanted: HashSet<&AnimalId> = HashSet::new();
        for parent in &parents {
            for aunt_or_uncle in self.siblings_of(parent)? {
                wanted.extend(aunt_or_uncle.children.iter());
            }
        }
        Ok(self.in_colony_order(&wanted))
    }

    /// Materialize a set of ids as animals in colony insertion order.
    fn in_colony_order(&self, wanted: &HashSet<&AnimalId>) -> Vec<&Animal> {
        self.animals().filter(|a| wanted.contains(&a.id)).collect()
    }
}
