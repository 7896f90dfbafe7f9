//! Nullable credential platform: scripted device prompts.

use async_trait::async_trait;
use idcheck_flow::{ConfirmationError, CredentialPlatform, CredentialRequest};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A device credential prompt that answers from a script.
///
/// Answers are consumed in order; once the script runs out the `fallback`
/// answer is returned for every further request.
pub struct NullCredentialPlatform {
    script: Mutex<VecDeque<Result<(), ConfirmationError>>>,
    fallback: Result<(), ConfirmationError>,
    requests: Mutex<Vec<CredentialRequest>>,
}

impl NullCredentialPlatform {
    pub fn new(fallback: Result<(), ConfirmationError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Approves every request.
    pub fn approving() -> Self {
        Self::new(Ok(()))
    }

    /// The user dismisses every prompt.
    pub fn rejecting(reason: &str) -> Self {
        Self::new(Err(ConfirmationError::Rejected(reason.to_owned())))
    }

    /// The platform itself errors on every prompt.
    pub fn failing(reason: &str) -> Self {
        Self::new(Err(ConfirmationError::Platform(reason.to_owned())))
    }

    /// Queue a one-off answer ahead of the fallback.
    pub fn then(self, answer: Result<(), ConfirmationError>) -> Self {
        self.script.lock().unwrap().push_back(answer);
        self
    }

    /// Every request the flow made, in order.
    pub fn requests(&self) -> Vec<CredentialRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialPlatform for NullCredentialPlatform {
    async fn request_credential(&self, request: &CredentialRequest) -> Result<(), ConfirmationError> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}
