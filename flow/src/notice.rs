//! User-facing notifications queued by the session.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeVariant {
    Success,
    Destructive,
}

/// A short, dismissable message ("NIN Verified", "Verification Failed", ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Success,
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            title: "Verification Failed".into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }
}
