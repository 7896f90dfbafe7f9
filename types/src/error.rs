//! Identifier validation errors.

use thiserror::Error;

use crate::ids::IdKind;

/// Returned when a string is not exactly [`ID_LEN`](crate::ID_LEN) ASCII digits.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdFormatError {
    #[error("{kind} must be 11 digits, got {len} characters")]
    WrongLength { kind: IdKind, len: usize },

    #[error("{kind} must contain only digits")]
    NonDigit { kind: IdKind },
}

impl IdFormatError {
    /// Which identifier failed validation.
    pub fn kind(&self) -> IdKind {
        match self {
            Self::WrongLength { kind, .. } | Self::NonDigit { kind } => *kind,
        }
    }
}
