//! Biometric confirmation strategies.
//!
//! The state machine never touches a sensor. It asks a [`Confirmer`] for a
//! yes/no signal and treats every failure, whatever its cause, the same way.

use async_trait::async_trait;
use idcheck_types::Record;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfirmationError {
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("platform error: {0}")]
    Platform(String),
}

/// Produces the confirmation signal for the biometric step.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    async fn confirm(&self, record: &Record) -> Result<(), ConfirmationError>;
}

/// Waits a fixed "scan" duration, then always succeeds.
pub struct SimulatedScan {
    pub duration: Duration,
}

impl SimulatedScan {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Default for SimulatedScan {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION)
    }
}

#[async_trait]
impl Confirmer for SimulatedScan {
    fn name(&self) -> &str {
        "simulated-scan"
    }

    async fn confirm(&self, _record: &Record) -> Result<(), ConfirmationError> {
        if !self.duration.is_zero() {
            tokio::time::sleep(self.duration).await;
        }
        Ok(())
    }
}

/// What the device credential prompt is told about the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRequest {
    pub user_id: String,
    pub display_name: String,
    pub timeout: Duration,
}

/// A device-level credential check (passkey prompt, OS authentication dialog).
///
/// Whatever the platform returns on success is opaque and discarded.
#[async_trait]
pub trait CredentialPlatform: Send + Sync {
    async fn request_credential(&self, request: &CredentialRequest) -> Result<(), ConfirmationError>;
}

#[async_trait]
impl<P: CredentialPlatform + ?Sized> CredentialPlatform for Arc<P> {
    async fn request_credential(&self, request: &CredentialRequest) -> Result<(), ConfirmationError> {
        (**self).request_credential(request).await
    }
}

/// Defers the biometric step to a [`CredentialPlatform`].
pub struct PlatformCredential<P> {
    platform: P,
    timeout: Duration,
}

impl<P: CredentialPlatform> PlatformCredential<P> {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(platform: P) -> Self {
        Self {
            platform,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<P: CredentialPlatform> Confirmer for PlatformCredential<P> {
    fn name(&self) -> &str {
        "platform-credential"
    }

    async fn confirm(&self, record: &Record) -> Result<(), ConfirmationError> {
        let request = CredentialRequest {
            user_id: record.primary_id.to_string(),
            display_name: record.display_name(),
            timeout: self.timeout,
        };
        match tokio::time::timeout(self.timeout, self.platform.request_credential(&request)).await
        {
            Ok(result) => result,
            Err(_) => Err(ConfirmationError::Platform(format!(
                "no answer within {:?}",
                self.timeout
            ))),
        }
    }
}
