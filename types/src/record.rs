//! The identity record returned by a successful primary-id lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PrimaryId, SecondaryId};

/// Sex as shown on the result screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to a displayable portrait (a URL or asset path).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortraitRef(String);

impl PortraitRef {
    /// Placeholder image used by the demo data set.
    pub const PLACEHOLDER: &'static str = "/placeholder.svg?height=200&width=200";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn placeholder() -> Self {
        Self::new(Self::PLACEHOLDER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PortraitRef {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// One identity profile.
///
/// Records are reference data: once constructed they are never mutated.
/// Field names on the wire follow the lookup API (`nin`, `bvn`, `firstName`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "nin")]
    pub primary_id: PrimaryId,
    #[serde(rename = "bvn")]
    pub secondary_id: SecondaryId,
    #[serde(rename = "firstName")]
    pub given_name: String,
    #[serde(rename = "lastName")]
    pub family_name: String,
    #[serde(rename = "middleName", default)]
    pub middle_name: String,
    #[serde(rename = "gender")]
    pub sex: Sex,
    #[serde(rename = "image", default)]
    pub portrait_ref: PortraitRef,
}

impl Record {
    /// "Given Family", as shown on the result screen.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }

    /// Whether `candidate` equals this record's secondary id.
    pub fn secondary_matches(&self, candidate: &SecondaryId) -> bool {
        self.secondary_id == *candidate
    }
}
