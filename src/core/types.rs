//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`AnimalId`] - Validated animal identifier
//! - [`CageId`] - Validated cage identifier
//! - [`Sex`] - Normalized biological sex
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use herdbook::core::types::{AnimalId, Sex};
//!
//! // Valid constructions
//! let id = AnimalId::new("CAGE5_1").unwrap();
//! let sex: Sex = "female".parse().unwrap();
//! assert_eq!(sex, Sex::Female);
//!
//! // Invalid constructions fail at creation time
//! assert!(AnimalId::new("").is_err());
//! assert!(AnimalId::new("has space").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid animal id: {0}")]
    InvalidAnimalId(String),

    #[error("invalid cage id: {0}")]
    InvalidCageId(String),

    #[error("invalid sex '{0}', expected M/F or male/female")]
    InvalidSex(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// A validated animal identifier.
///
/// Animal ids are user-editable labels used pervasively as foreign keys
/// (mother, father, children). They must be:
/// - Non-empty
/// - Free of whitespace and `/` (ids become parts of file content and
///   generated cage-member names like `CAGE5_1`)
///
/// # Example
///
/// ```
/// use herdbook::core::types::AnimalId;
///
/// let id = AnimalId::new("F1").unwrap();
/// assert_eq!(id.as_str(), "F1");
///
/// assert!(AnimalId::new("").is_err());
/// assert!(AnimalId::new("a b").is_err());
/// assert!(AnimalId::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnimalId(String);

impl AnimalId {
    /// Create a new validated animal id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidAnimalId` if the id is empty or contains
    /// whitespace or `/`.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_label(&id).map_err(|msg| TypeError::InvalidAnimalId(msg))?;
        Ok(Self(id))
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AnimalId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnimalId> for String {
    fn from(id: AnimalId) -> Self {
        id.0
    }
}

/// A validated cage identifier.
///
/// Cage ids are housing labels, not ownership relations. The same rules
/// as [`AnimalId`] apply because cage ids prefix generated member ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CageId(String);

impl CageId {
    /// Create a new validated cage id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCageId` if the id is empty or contains
    /// whitespace or `/`.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_label(&id).map_err(|msg| TypeError::InvalidCageId(msg))?;
        Ok(Self(id))
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generated id for the `n`-th member of this cage (1-based).
    ///
    /// # Example
    ///
    /// ```
    /// use herdbook::core::types::CageId;
    ///
    /// let cage = CageId::new("CAGE5").unwrap();
    /// assert_eq!(cage.member_id(2).as_str(), "CAGE5_2");
    /// ```
    pub fn member_id(&self, n: usize) -> AnimalId {
        // The cage id is already validated, so the composed id is too.
        AnimalId(format!("{}_{}", self.0, n))
    }

    /// If `id` follows this cage's `{cage}_{n}` member convention,
    /// return `n`.
    pub fn member_index(&self, id: &AnimalId) -> Option<usize> {
        let rest = id.as_str().strip_prefix(self.0.as_str())?;
        let rest = rest.strip_prefix('_')?;
        rest.parse().ok()
    }
}

impl fmt::Display for CageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CageId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CageId> for String {
    fn from(id: CageId) -> Self {
        id.0
    }
}

fn validate_label(label: &str) -> Result<(), String> {
    if label.is_empty() {
        return Err("cannot be empty".into());
    }
    if label.chars().any(|c| c.is_whitespace()) {
        return Err(format!("'{label}' contains whitespace"));
    }
    if label.contains('/') {
        return Err(format!("'{label}' contains '/'"));
    }
    Ok(())
}

/// Normalized biological sex.
///
/// Historical records carry a mix of short codes (`"F"`, `"M"`) and full
/// words (`"female"`, `"male"`), in either case. Parsing accepts all of
/// them; serialization is canonical (`"F"` / `"M"`, matching the wire
/// values of existing colony files).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Canonical single-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
        }
    }

    /// Full lowercase word.
    pub fn word(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Sex {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "female" => Ok(Sex::Female),
            "m" | "male" => Ok(Sex::Male),
            _ => Err(TypeError::InvalidSex(s.to_string())),
        }
    }
}

impl TryFrom<String> for Sex {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sex> for String {
    fn from(sex: Sex) -> Self {
        sex.code().to_string()
    }
}

/// Parse a stored calendar date.
///
/// Accepts plain `YYYY-MM-DD` as well as date-time values left behind by
/// older tooling; date-times are truncated to their date component.
///
/// # Example
///
/// ```
/// use herdbook::core::types::parse_date;
/// use chrono::NaiveDate;
///
/// let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(parse_date("2024-01-01").unwrap(), d);
/// assert_eq!(parse_date("2024-01-01T12:34:56").unwrap(), d);
/// assert_eq!(parse_date("2024-01-01T12:34:56Z").unwrap(), d);
/// assert!(parse_date("yesterday").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate, TypeError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(TypeError::InvalidDate(s.to_string()))
}
