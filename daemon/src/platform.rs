//! Device credential check backed by an external program.
//!
//! The program (for example `fprintd-verify`) runs with the terminal attached
//! so it can prompt the user itself. Exit status 0 means the credential was
//! presented; anything else is a rejection. Output is not inspected.

use async_trait::async_trait;
use idcheck_flow::{ConfirmationError, CredentialPlatform, CredentialRequest};
use tokio::process::Command;
use tracing::{debug, warn};

pub struct CommandCredential {
    program: String,
    args: Vec<String>,
}

impl CommandCredential {
    /// Build from a `[program, args...]` list. Returns `None` when empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl CredentialPlatform for CommandCredential {
    async fn request_credential(&self, request: &CredentialRequest) -> Result<(), ConfirmationError> {
        debug!(
            program = %self.program,
            user = %request.display_name,
            "requesting device credential"
        );
        let status = Command::new(&self.program)
            .args(&self.args)
            .env("IDCHECK_USER_ID", &request.user_id)
            .env("IDCHECK_DISPLAY_NAME", &request.display_name)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                warn!("failed to start {}: {e}", self.program);
                ConfirmationError::Platform(format!("{}: {e}", self.program))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ConfirmationError::Rejected(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request() -> CredentialRequest {
        CredentialRequest {
            user_id: "12345678901".into(),
            display_name: "John Doe".into(),
            timeout: Duration::from_secs(5),
        }
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_argv_is_rejected() {
        assert!(CommandCredential::from_argv(&[]).is_none());
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let cmd = CommandCredential::from_argv(&argv(&["true"])).unwrap();
        assert!(cmd.request_credential(&request()).await.is_ok());
    }

    #[tokio::test]
    async fn non_zero_exit_is_rejection() {
        let cmd = CommandCredential::from_argv(&argv(&["false"])).unwrap();
        let err = cmd.request_credential(&request()).await.unwrap_err();
        assert!(matches!(err, ConfirmationError::Rejected(_)));
    }

    #[tokio::test]
    async fn request_is_passed_through_the_environment() {
        let cmd = CommandCredential::from_argv(&argv(&[
            "sh",
            "-c",
            r#"test "$IDCHECK_DISPLAY_NAME" = "John Doe""#,
        ]))
        .unwrap();
        assert!(cmd.request_credential(&request()).await.is_ok());
    }

    #[tokio::test]
    async fn missing_program_is_platform_error() {
        let cmd = CommandCredential::from_argv(&argv(&["idcheck-no-such-program"])).unwrap();
        let err = cmd.request_credential(&request()).await.unwrap_err();
        assert!(matches!(err, ConfirmationError::Platform(_)));
    }
}
