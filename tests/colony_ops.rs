//! Integration tests for the core colony operations.
//!
//! These exercise the engine end to end through the public library API:
//! founder pairs, generated cage litters, and breeder-cage validation.

use chrono::NaiveDate;

use herdbook::core::layout::{layout, LayoutOptions};
use herdbook::core::types::{AnimalId, CageId, Sex};
use herdbook::core::{Animal, CageSpec, Colony, ColonyError, ParentRole};

fn id(s: &str) -> AnimalId {
    AnimalId::new(s).unwrap()
}

fn cage(s: &str) -> CageId {
    CageId::new(s).unwrap()
}

fn dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Colony "Lab1" with founders F1 (female), M1 (male) and child C1.
fn lab1() -> Colony {
    let mut colony = Colony::new("Lab1");
    colony
        .add_animal(Animal::new(id("F1"), Sex::Female, "wt", dob()))
        .unwrap();
    colony
        .add_animal(Animal::new(id("M1"), Sex::Male, "wt", dob()))
        .unwrap();
    let mut c1 = Animal::new(id("C1"), Sex::Female, "het", dob());
    c1.mother = Some(id("F1"));
    c1.father = Some(id("M1"));
    colony.add_animal(c1).unwrap();
    colony
}

#[test]
fn founder_pair_scenario() {
    let colony = lab1();

    let founders: Vec<&str> = colony.founders().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(founders, vec!["F1", "M1"]);

    assert!(colony.siblings_of(&id("C1")).unwrap().is_empty());

    let children: Vec<&str> = colony
        .children_of(&id("F1"))
        .unwrap()
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(children, vec!["C1"]);

    let tree = layout(&colony, &LayoutOptions::default());
    let generation = |aid: &str| {
        tree.nodes
            .iter()
            .find(|n| n.id.as_str() == aid)
            .unwrap()
            .generation
    };
    assert_eq!(generation("F1"), 0);
    assert_eq!(generation("M1"), 0);
    assert_eq!(generation("C1"), 1);
}

#[test]
fn cage_add_is_atomic_scenario() {
    let mut colony = Colony::new("Lab1");
    let spec = CageSpec {
        cage: cage("CAGE5"),
        count: 3,
        sex: Sex::Female,
        genotype: "het".into(),
        dob: dob(),
        date_weaned: None,
        notes: None,
        mother: None,
        father: None,
    };

    let ids = colony.add_cage(&spec).unwrap();
    assert_eq!(
        ids,
        vec![id("CAGE5_1"), id("CAGE5_2"), id("CAGE5_3")]
    );

    let err = colony.add_cage(&spec).unwrap_err();
    assert!(matches!(err, ColonyError::DuplicateId(_)));
    assert_eq!(colony.len(), 3);
}

#[test]
fn breeder_cage_wrong_sex_scenario() {
    let mut colony = Colony::new("Lab1");
    colony
        .add_animal(Animal::new(id("F1"), Sex::Female, "wt", dob()))
        .unwrap();
    colony
        .add_animal(Animal::new(id("M2"), Sex::Female, "wt", dob()))
        .unwrap();

    // M2 is female, so it cannot take the father slot.
    let err = colony
        .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M2"), None, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ColonyError::InvalidParentSex {
            role: ParentRole::Father,
            ..
        }
    ));
    assert!(colony.breeder_cages().is_empty());
    // Neither animal was housed.
    assert!(colony.animal(&id("F1")).unwrap().cage.is_none());
}

#[test]
fn full_breeding_workflow() {
    let mut colony = Colony::new("Lab1");
    colony
        .add_animal(Animal::new(id("F1"), Sex::Female, "wt", dob()))
        .unwrap();
    colony
        .add_animal(Animal::new(id("M1"), Sex::Male, "wt", dob()))
        .unwrap();
    colony
        .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), Some(dob()), None)
        .unwrap();

    let litter = CageSpec {
        cage: cage("L1"),
        count: 4,
        sex: Sex::Female,
        genotype: "het".into(),
        dob: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        date_weaned: None,
        notes: None,
        mother: Some(id("F1")),
        father: Some(id("M1")),
    };
    colony.add_cage(&litter).unwrap();
    colony.record_litter(&cage("BC1"), &cage("L1")).unwrap();

    assert_eq!(colony.len(), 6);
    assert_eq!(
        colony.breeder_cage(&cage("BC1")).unwrap().litters,
        vec![cage("L1")]
    );
    // All pups are siblings of each other and children of the pair.
    assert_eq!(colony.children_of(&id("F1")).unwrap().len(), 4);
    assert_eq!(colony.siblings_of(&id("L1_1")).unwrap().len(), 3);

    // Layout puts the pair at generation 0 and the litter at 1.
    let tree = layout(&colony, &LayoutOptions::default());
    for node in &tree.nodes {
        let expected = if node.id.as_str().starts_with("L1_") { 1 } else { 0 };
        assert_eq!(node.generation, expected, "node {}", node.id);
    }
    // Two parent links per pup.
    assert_eq!(tree.edges.len(), 8);
}

#[test]
fn rename_propagates_through_breeders_and_layout() {
    let mut colony = lab1();
    colony
        .add_breeder_cage(&cage("BC1"), &id("F1"), &id("M1"), None, None)
        .unwrap();

    colony.rename_animal(&id("F1"), &id("DAM1")).unwrap();

    assert_eq!(colony.breeder_cage(&cage("BC1")).unwrap().mother, id("DAM1"));
    assert_eq!(colony.animal(&id("C1")).unwrap().mother, Some(id("DAM1")));

    let tree = layout(&colony, &LayoutOptions::default());
    assert!(tree.edges.iter().any(|e| e.source == id("DAM1")));
    assert!(tree.edges.iter().all(|e| e.source != id("F1")));
}

#[test]
fn deleting_animals_never_leaves_dangling_references() {
    let mut colony = lab1();
    colony.delete_animal(&id("F1")).unwrap();

    for animal in colony.animals() {
        assert_ne!(animal.mother, Some(id("F1")));
        assert_ne!(animal.father, Some(id("F1")));
        assert!(!animal.children.contains(&id("F1")));
    }
    // C1 still knows its father.
    assert_eq!(colony.animal(&id("C1")).unwrap().father, Some(id("M1")));
}
