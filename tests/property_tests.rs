//! Property-based tests for the colony engine.
//!
//! Random operation sequences are applied through the public API
//! (errors discarded), after which the structural invariants must hold:
//! parent/child symmetry, referential integrity, acyclic pedigree, and
//! a lossless trip through the persistence codec.

use chrono::NaiveDate;
use proptest::prelude::*;

use herdbook::core::layout::{layout, LayoutOptions};
use herdbook::core::types::{AnimalId, CageId, Sex};
use herdbook::core::{Animal, Colony, ParentRole};
use herdbook::store::schema::{decode, encode};

fn dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// One step of a randomized colony edit sequence. Indices are taken
/// modulo the current population, so every step addresses some animal
/// once the colony is non-empty.
#[derive(Debug, Clone)]
enum Op {
    Add { sex: Sex },
    Link { child: usize, role: ParentRole, parent: usize },
    Unlink { child: usize, role: ParentRole },
    Delete { target: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    let sex = prop_oneof![Just(Sex::Female), Just(Sex::Male)];
    let role = prop_oneof![Just(ParentRole::Mother), Just(ParentRole::Father)];
    prop_oneof![
        3 => sex.prop_map(|sex| Op::Add { sex }),
        4 => (0..64usize, role.clone(), 0..64usize)
            .prop_map(|(child, role, parent)| Op::Link { child, role, parent }),
        1 => (0..64usize, role).prop_map(|(child, role)| Op::Unlink { child, role }),
        1 => (0..64usize).prop_map(|target| Op::Delete { target }),
    ]
}

/// Apply a sequence of ops, ignoring rejected ones. The engine is
/// expected to refuse invalid edits, not to corrupt state.
fn build(ops: &[Op]) -> Colony {
    let mut colony = Colony::new("prop");
    let mut next = 0u32;
    for op in ops {
        match op {
            Op::Add { sex } => {
                let id = AnimalId::new(format!("A{next}")).unwrap();
                next += 1;
                let _ = colony.add_animal(Animal::new(id, *sex, "wt", dob()));
            }
            Op::Link { child, role, parent } => {
                if colony.is_empty() {
                    continue;
                }
                let ids: Vec<AnimalId> =
                    colony.animals().map(|a| a.id.clone()).collect();
                let child = &ids[child % ids.len()];
                let parent = &ids[parent % ids.len()];
                let _ = colony.set_parent(child, *role, Some(parent));
            }
            Op::Unlink { child, role } => {
                if colony.is_empty() {
                    continue;
                }
                let ids: Vec<AnimalId> =
                    colony.animals().map(|a| a.id.clone()).collect();
                let child = ids[child % ids.len()].clone();
                let _ = colony.set_parent(&child, *role, None);
            }
            Op::Delete { target } => {
                if colony.is_empty() {
                    continue;
                }
                let ids: Vec<AnimalId> =
                    colony.animals().map(|a| a.id.clone()).collect();
                let target = ids[target % ids.len()].clone();
                let _ = colony.delete_animal(&target);
            }
        }
    }
    colony
}

/// Every parent link has the matching child entry and vice versa, and
/// every reference resolves.
fn assert_integrity(colony: &Colony) {
    for animal in colony.animals() {
        for (role, parent) in [
            (ParentRole::Mother, &animal.mother),
            (ParentRole::Father, &animal.father),
        ] {
            if let Some(pid) = parent {
                let p = colony
                    .animal(pid)
                    .unwrap_or_else(|| panic!("dangling {role} link on {}", animal.id));
                assert_eq!(p.sex, role.required_sex());
                assert!(
                    p.children.contains(&animal.id),
                    "{} missing from children of {}",
                    animal.id,
                    pid
                );
            }
        }
        for child_id in &animal.children {
            let child = colony
                .animal(child_id)
                .unwrap_or_else(|| panic!("dangling child link on {}", animal.id));
            assert!(
                child.mother.as_ref() == Some(&animal.id)
                    || child.father.as_ref() == Some(&animal.id),
                "{} lists {} as child without a back link",
                animal.id,
                child_id
            );
        }
    }
}

proptest! {
    #[test]
    fn animal_ids_round_trip_through_serde(s in "[A-Za-z][A-Za-z0-9_-]{0,15}") {
        let id = AnimalId::new(s.clone()).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let back: AnimalId = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(id, back);
        prop_assert_eq!(json, format!("{s:?}"));
    }

    #[test]
    fn ids_with_whitespace_or_slashes_are_rejected(s in "[a-z]{0,4}[ /][a-z]{0,4}") {
        prop_assert!(AnimalId::new(s.clone()).is_err());
        prop_assert!(CageId::new(s).is_err());
    }

    #[test]
    fn random_edits_preserve_link_symmetry(ops in prop::collection::vec(arb_op(), 0..60)) {
        let colony = build(&ops);
        assert_integrity(&colony);
    }

    #[test]
    fn random_colonies_survive_the_codec(ops in prop::collection::vec(arb_op(), 0..60)) {
        let colony = build(&ops);
        let record = encode(&colony);
        let json = serde_json::to_string(&record).unwrap();
        let reparsed = serde_json::from_str(&json).unwrap();
        let back = decode(reparsed).unwrap();
        prop_assert_eq!(colony, back);
    }

    #[test]
    fn generations_follow_parent_propagation(
        ops in prop::collection::vec(arb_op(), 0..60),
    ) {
        let colony = build(&ops);
        let tree = layout(&colony, &LayoutOptions::default());
        prop_assert_eq!(tree.nodes.len(), colony.len());
        let generation = |id: &AnimalId| {
            tree.nodes
                .iter()
                .find(|n| &n.id == id)
                .map(|n| n.generation)
                .unwrap()
        };
        for animal in colony.animals() {
            let g = generation(&animal.id);
            if animal.is_founder() {
                prop_assert_eq!(g, 0);
            } else {
                // One past the deepest parent, strictly below both.
                let parent_gens: Vec<u32> = [&animal.mother, &animal.father]
                    .into_iter()
                    .flatten()
                    .map(|p| generation(p))
                    .collect();
                prop_assert!(parent_gens.iter().all(|pg| *pg < g));
                prop_assert_eq!(
                    g,
                    parent_gens.iter().max().unwrap() + 1,
                    "generation of {} not one past its deepest parent",
                    animal.id
                );
            }
        }
        // x stays inside the unit strip.
        for node in &tree.nodes {
            prop_assert!((0.0..=1.0).contains(&node.x));
        }
    }

    #[test]
    fn rename_leaves_no_stale_references(
        ops in prop::collection::vec(arb_op(), 1..40),
        pick in 0..64usize,
    ) {
        let mut colony = build(&ops);
        prop_assume!(!colony.is_empty());

        let ids: Vec<AnimalId> = colony.animals().map(|a| a.id.clone()).collect();
        let old = ids[pick % ids.len()].clone();
        let new = AnimalId::new("RENAMED").unwrap();
        colony.rename_animal(&old, &new).unwrap();

        prop_assert!(colony.animal(&old).is_none());
        prop_assert!(colony.animal(&new).is_some());
        for animal in colony.animals() {
            prop_assert_ne!(animal.mother.as_ref(), Some(&old));
            prop_assert_ne!(animal.father.as_ref(), Some(&old));
            prop_assert!(!animal.children.contains(&old));
        }
        assert_integrity(&colony);
    }

    #[test]
    fn delete_leaves_no_stale_references(
        ops in prop::collection::vec(arb_op(), 1..40),
        pick in 0..64usize,
    ) {
        let mut colony = build(&ops);
        prop_assume!(!colony.is_empty());

        let ids: Vec<AnimalId> = colony.animals().map(|a| a.id.clone()).collect();
        let target = ids[pick % ids.len()].clone();
        colony.delete_animal(&target).unwrap();

        prop_assert!(colony.animal(&target).is_none());
        for animal in colony.animals() {
            prop_assert_ne!(animal.mother.as_ref(), Some(&target));
            prop_assert_ne!(animal.father.as_ref(), Some(&target));
            prop_assert!(!animal.children.contains(&target));
        }
        assert_integrity(&colony);
    }
}
