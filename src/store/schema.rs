//! store::schema
//!
//! Colony persistence schema (v1).
//!
//! # Schema Design
//!
//! Persisted records are:
//! - Self-describing with `kind` and `schema_version`
//! - Flat: parent references are ids, not nested records, which breaks
//!   reference cycles in the wire format
//! - Strictly parsed: a record that references a nonexistent animal is
//!   corrupt, not best-effort
//!
//! # Two-pass decode
//!
//! Pass 1 instantiates every animal with parents unset; pass 2 resolves
//! `mother_id`/`father_id` against the complete id index and attaches
//! them through the integrity operation, which also rebuilds `children`.
//! This order is mandatory: a single pass fails whenever a child record
//! precedes its parent's record in the stored order. A failed decode
//! returns an error and no partially constructed colony.
//!
//! # Example
//!
//! ```
//! use herdbook::store::schema::{encode, decode, parse_record, RECORD_KIND};
//! use herdbook::core::Colony;
//!
//! let colony = Colony::new("Lab1");
//! let record = encode(&colony);
//! assert_eq!(record.kind, RECORD_KIND);
//!
//! let json = serde_json::to_string(&record).unwrap();
//! let reloaded = decode(parse_record(&json).unwrap()).unwrap();
//! assert_eq!(reloaded.name, "Lab1");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::animal::Animal;
use crate::core::cage::BreederCage;
use crate::core::colony::{Colony, ColonyError};
use crate::core::pedigree::ParentRole;
use crate::core::types::{parse_date, AnimalId, CageId, Sex, TypeError};

/// The kind identifier for colony records.
pub const RECORD_KIND: &str = "herdbook.colony";

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from record parsing and decoding.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to parse colony record: {0}")]
    Parse(String),

    #[error("invalid kind '{found}', expected '{RECORD_KIND}'")]
    InvalidKind { found: String },

    #[error("unsupported schema version {0}, supported: {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),

    #[error("duplicate animal id '{0}' in record")]
    DuplicateId(AnimalId),

    #[error("animal '{animal}' references unknown {role} '{parent}'")]
    UnknownParent {
        animal: AnimalId,
        role: ParentRole,
        parent: AnimalId,
    },

    #[error("breeder cage '{cage}' references unknown animal '{parent}'")]
    UnknownBreederParent { cage: CageId, parent: AnimalId },

    #[error("duplicate breeder cage '{0}' in record")]
    DuplicateBreeder(CageId),

    #[error("invalid record value: {0}")]
    InvalidValue(String),
}

impl From<TypeError> for RecordError {
    fn from(err: TypeError) -> Self {
        RecordError::InvalidValue(err.to_string())
    }
}

/// Envelope for version dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct RecordEnvelope {
    kind: String,
    schema_version: u32,
}

/// One persisted animal. Parent references are ids, never nested
/// records; dates are stored as strings so legacy date-time values can
/// be truncated on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub id: AnimalId,
    pub sex: Sex,
    pub genotype: String,
    pub dob: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<AnimalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<AnimalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cage_id: Option<CageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_weaned: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub deceased: bool,
}

/// One persisted breeder-cage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreederCageRecord {
    pub cage_id: CageId,
    pub mother_id: AnimalId,
    pub father_id: AnimalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_mated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub litters: Vec<CageId>,
}

/// Colony record (v1): the whole-colony unit of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyRecordV1 {
    pub kind: String,
    pub schema_version: u32,
    pub name: String,
    pub animals: Vec<AnimalRecord>,
    #[serde(default)]
    pub breeder_cages: Vec<BreederCageRecord>,
}

/// Parse record JSON with version dispatch.
///
/// The envelope is checked before the full structure is parsed, so an
/// unsupported version fails with a version error rather than a field
/// mismatch.
pub fn parse_record(json: &str) -> Result<ColonyRecordV1, RecordError> {
    let envelope: RecordEnvelope =
        serde_json::from_str(json).map_err(|e| RecordError::Parse(e.to_string()))?;

    if envelope.kind != RECORD_KIND {
        return Err(RecordError::InvalidKind {
            found: envelope.kind,
        });
    }

    match envelope.schema_version {
        1 => serde_json::from_str(json).map_err(|e| RecordError::Parse(e.to_string())),
        v => Err(RecordError::UnsupportedVersion(v)),
    }
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Encode a colony as a persisted record.
pub fn encode(colony: &Colony) -> ColonyRecordV1 {
    ColonyRecordV1 {
        kind: RECORD_KIND.to_string(),
        schema_version: SCHEMA_VERSION,
        name: colony.name.clone(),
        animals: colony
            .animals()
            .map(|a| AnimalRecord {
                id: a.id.clone(),
                sex: a.sex,
                genotype: a.genotype.clone(),
                dob: format_date(a.dob),
                mother_id: a.mother.clone(),
                father_id: a.father.clone(),
                cage_id: a.cage.clone(),
                date_weaned: a.date_weaned.map(format_date),
                notes: a.notes.clone(),
                deceased: a.deceased,
            })
            .collect(),
        breeder_cages: colony
            .breeder_cages()
            .iter()
            .map(|b| BreederCageRecord {
                cage_id: b.cage.clone(),
                mother_id: b.mother.clone(),
                father_id: b.father.clone(),
                date_mated: b.date_mated.map(format_date),
                notes: b.notes.clone(),
                litters: b.litters.clone(),
            })
            .collect(),
    }
}

/// Decode a persisted record into a colony.
///
/// # Errors
///
/// - `DuplicateId` if two animal records share an id
/// - `DuplicateBreeder` if two breeder-cage records share a label
/// - `UnknownParent` / `UnknownBreederParent` if a reference does not
///   resolve against the animal list
/// - `InvalidValue` for malformed dates or sex/role mismatches
pub fn decode(record: ColonyRecordV1) -> Result<Colony, RecordError> {
    let mut colony = Colony::new(record.name);

    // Pass 1: instantiate every animal, parents unset.
    for animal_record in &record.animals {
        let mut animal = Animal::new(
            animal_record.id.clone(),
            animal_record.sex,
            animal_record.genotype.clone(),
            parse_date(&animal_record.dob)?,
        );
        animal.cage = animal_record.cage_id.clone();
        animal.date_weaned = animal_record
            .date_weaned
            .as_deref()
            .map(parse_date)
            .transpose()?;
        animal.notes = animal_record.notes.clone();
        animal.deceased = animal_record.deceased;

        colony.add_animal(animal).map_err(|e| match e {
            ColonyError::DuplicateId(id) => RecordError::DuplicateId(id),
            other => RecordError::InvalidValue(other.to_string()),
        })?;
    }

    // Pass 2: resolve parent references against the complete index.
    for animal_record in &record.animals {
        for (role, parent) in [
            (ParentRole::Mother, &animal_record.mother_id),
            (ParentRole::Father, &animal_record.father_id),
        ] {
            if let Some(parent_id) = parent {
                colony
                    .set_parent(&animal_record.id, role, Some(parent_id))
                    .map_err(|e| match e {
                        ColonyError::AnimalNotFound(missing) => RecordError::UnknownParent {
                            animal: animal_record.id.clone(),
                            role,
                            parent: missing,
                        },
                        other => RecordError::InvalidValue(other.to_string()),
                    })?;
            }
        }
    }

    // Breeder cages: unique labels, both parents resolving with
    // matching sex.
    for breeder in record.breeder_cages {
        if colony.breeder_cage(&breeder.cage_id).is_some() {
            return Err(RecordError::DuplicateBreeder(breeder.cage_id));
        }
        for (id, role) in [
            (&breeder.mother_id, ParentRole::Mother),
            (&breeder.father_id, ParentRole::Father),
        ] {
            let animal = colony
                .animal(id)
                .ok_or_else(|| RecordError::UnknownBreederParent {
                    cage: breeder.cage_id.clone(),
                    parent: id.clone(),
                })?;
            if animal.sex != role.required_sex() {
                return Err(RecordError::InvalidValue(format!(
                    "breeder cage '{}': animal '{}' is {} and cannot be the {}",
                    breeder.cage_id, id, animal.sex, role
                )));
            }
        }
        colony.breeders.push(BreederCage {
            cage: breeder.cage_id,
            mother: breeder.mother_id,
            father: breeder.father_id,
            date_mated: breeder.date_mated.as_deref().map(parse_date).transpose()?,
            notes: breeder.notes,
            litters: breeder.litters,
        });
    }

    Ok(colony)
}
