use idcheck_types::{IdFormatError, IdKind};
use thiserror::Error;

use crate::Step;

/// Failures produced while driving a verification session.
///
/// The first five kinds are recorded as the session's `last_error` and keep the
/// session on the step that produced them. `Busy` and `InvalidAction` reject the
/// call outright and leave the session untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("invalid format: {0}")]
    InvalidFormat(#[from] IdFormatError),

    #[error("no record matches the submitted NIN")]
    NotFound,

    #[error("BVN does not match the bound record")]
    Mismatch,

    #[error("confirmation failed: {0}")]
    ConfirmationFailed(String),

    #[error("lookup transport failure: {0}")]
    TransportFailure(String),

    #[error("an operation for step {0} is already in flight")]
    Busy(Step),

    #[error("{action} is not allowed in step {step}")]
    InvalidAction { action: &'static str, step: Step },
}

impl FlowError {
    /// The message shown next to the form.
    ///
    /// Transport failures read exactly like a missed lookup; the difference is
    /// only visible in logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFormat(e) => match e.kind() {
                IdKind::Primary => "NIN must be 11 digits".into(),
                IdKind::Secondary => "BVN must be 11 digits".into(),
            },
            Self::NotFound | Self::TransportFailure(_) => "No user found with this NIN.".into(),
            Self::Mismatch => "Invalid BVN number".into(),
            Self::ConfirmationFailed(_) => {
                "Biometric verification failed. Please try again.".into()
            }
            Self::Busy(_) => "Please wait for the current check to finish.".into(),
            Self::InvalidAction { .. } => "That action is not available right now.".into(),
        }
    }

    /// Whether this error is stored as the session's `last_error`.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Self::Busy(_) | Self::InvalidAction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_looks_like_not_found_to_users() {
        let transport = FlowError::TransportFailure("connection refused".into());
        assert_eq!(transport.user_message(), FlowError::NotFound.user_message());
        assert_ne!(transport, FlowError::NotFound);
        assert!(transport.to_string().contains("connection refused"));
    }

    #[test]
    fn guard_errors_are_not_recorded() {
        assert!(!FlowError::Busy(Step::CollectingPrimaryId).is_recorded());
        assert!(FlowError::Mismatch.is_recorded());
    }
}
