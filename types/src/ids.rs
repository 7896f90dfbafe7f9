//! Validated identifier types.
//!
//! Both identifiers are fixed-length decimal strings. Validation is purely
//! syntactic: exactly [`ID_LEN`] ASCII digits, nothing else (no whitespace,
//! no sign, no non-ASCII digits).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::IdFormatError;

/// Number of decimal digits in every identifier.
pub const ID_LEN: usize = 11;

/// Which identifier a value or an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdKind {
    /// National identification number, the lookup key.
    Primary,
    /// Bank verification number, the second factor.
    Secondary,
}

impl IdKind {
    /// Short label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "NIN",
            Self::Secondary => "BVN",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `s` is exactly [`ID_LEN`] ASCII decimal digits.
pub fn is_valid_id(s: &str) -> bool {
    s.len() == ID_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

fn validate(kind: IdKind, s: &str) -> Result<(), IdFormatError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdFormatError::NonDigit { kind });
    }
    if s.len() != ID_LEN {
        return Err(IdFormatError::WrongLength {
            kind,
            len: s.chars().count(),
        });
    }
    Ok(())
}

/// The 11-digit lookup key of a [`Record`](crate::Record).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrimaryId(String);

impl PrimaryId {
    pub fn parse(raw: &str) -> Result<Self, IdFormatError> {
        validate(IdKind::Primary, raw)?;
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PrimaryId {
    type Err = IdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PrimaryId {
    type Error = IdFormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate(IdKind::Primary, &s)?;
        Ok(Self(s))
    }
}

impl From<PrimaryId> for String {
    fn from(id: PrimaryId) -> Self {
        id.0
    }
}

impl fmt::Display for PrimaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The 11-digit second factor, only ever compared for equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecondaryId(String);

impl SecondaryId {
    pub fn parse(raw: &str) -> Result<Self, IdFormatError> {
        validate(IdKind::Secondary, raw)?;
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SecondaryId {
    type Err = IdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SecondaryId {
    type Error = IdFormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate(IdKind::Secondary, &s)?;
        Ok(Self(s))
    }
}

impl From<SecondaryId> for String {
    fn from(id: SecondaryId) -> Self {
        id.0
    }
}

impl fmt::Display for SecondaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_eleven_digits() {
        let id = PrimaryId::parse("12345678901").unwrap();
        assert_eq!(id.as_str(), "12345678901");
        assert!(SecondaryId::parse("00000000000").is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        let err = PrimaryId::parse("1234567890").unwrap_err();
        assert_eq!(
            err,
            IdFormatError::WrongLength {
                kind: IdKind::Primary,
                len: 10
            }
        );
        assert!(SecondaryId::parse("123456789012").is_err());
        assert!(PrimaryId::parse("").is_err());
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!(
            SecondaryId::parse("1234567890a").unwrap_err(),
            IdFormatError::NonDigit {
                kind: IdKind::Secondary
            }
        );
        assert!(PrimaryId::parse(" 12345678901").is_err());
        assert!(PrimaryId::parse("+1234567890").is_err());
        // Arabic-Indic digits are not ASCII digits.
        assert!(PrimaryId::parse("١٢٣٤٥٦٧٨٩٠١").is_err());
    }

    #[test]
    fn serde_rejects_malformed_ids() {
        let ok: PrimaryId = serde_json::from_str("\"98765432109\"").unwrap();
        assert_eq!(ok.as_str(), "98765432109");
        assert!(serde_json::from_str::<PrimaryId>("\"987\"").is_err());
    }

    #[test]
    fn kind_labels() {
        assert_eq!(IdKind::Primary.to_string(), "NIN");
        assert_eq!(IdKind::Secondary.to_string(), "BVN");
    }
}
