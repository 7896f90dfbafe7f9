//! The four verification steps.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Waiting for the NIN. Initial state.
    CollectingPrimaryId,
    /// NIN matched a record; waiting for the BVN.
    CollectingSecondaryId,
    /// BVN matched; waiting for the biometric acknowledgment.
    BiometricCheck,
    /// Terminal. Only `restart` is accepted.
    Complete,
}

impl Step {
    pub const INITIAL: Self = Self::CollectingPrimaryId;

    /// The step `back` returns to, if `back` is allowed here.
    pub fn previous(&self) -> Option<Step> {
        match self {
            Self::CollectingSecondaryId => Some(Self::CollectingPrimaryId),
            Self::BiometricCheck => Some(Self::CollectingSecondaryId),
            Self::CollectingPrimaryId | Self::Complete => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Completion percentage shown in the progress bar.
    pub fn progress(&self) -> u8 {
        match self {
            Self::CollectingPrimaryId => 25,
            Self::CollectingSecondaryId => 50,
            Self::BiometricCheck => 75,
            Self::Complete => 100,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::CollectingPrimaryId => "Step 1: Enter NIN",
            Self::CollectingSecondaryId => "Step 2: Verify BVN",
            Self::BiometricCheck => "Step 3: Biometric Verification",
            Self::Complete => "Verification Successful!",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CollectingPrimaryId => {
                "Please enter your 11-digit National Identification Number"
            }
            Self::CollectingSecondaryId => "Please enter your 11-digit Bank Verification Number",
            Self::BiometricCheck => "Please complete fingerprint verification",
            Self::Complete => "Your identity has been verified successfully",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollectingPrimaryId => "collecting-primary-id",
            Self::CollectingSecondaryId => "collecting-secondary-id",
            Self::BiometricCheck => "biometric-check",
            Self::Complete => "complete",
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_is_only_allowed_from_middle_steps() {
        assert_eq!(Step::CollectingPrimaryId.previous(), None);
        assert_eq!(
            Step::CollectingSecondaryId.previous(),
            Some(Step::CollectingPrimaryId)
        );
        assert_eq!(
            Step::BiometricCheck.previous(),
            Some(Step::CollectingSecondaryId)
        );
        assert_eq!(Step::Complete.previous(), None);
    }

    #[test]
    fn progress_increases_monotonically() {
        let steps = [
            Step::CollectingPrimaryId,
            Step::CollectingSecondaryId,
            Step::BiometricCheck,
            Step::Complete,
        ];
        for pair in steps.windows(2) {
            assert!(pair[0].progress() < pair[1].progress());
        }
        assert_eq!(Step::Complete.progress(), 100);
    }
}
