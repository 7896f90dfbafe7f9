//! `POST /api/verify-nin` over reqwest.

use async_trait::async_trait;
use idcheck_flow::{LookupError, RecordLookup};
use idcheck_types::{PrimaryId, Record};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ClientError;

/// Path of the lookup endpoint on the server.
pub const VERIFY_NIN_PATH: &str = "/api/verify-nin";

#[derive(Serialize)]
struct VerifyNinRequest<'a> {
    nin: &'a str,
}

#[derive(Deserialize)]
struct VerifyNinResponse {
    success: bool,
    #[serde(default)]
    user: Option<Record>,
    #[serde(default)]
    message: Option<String>,
}

/// Looks records up on a remote idcheck server.
#[derive(Clone, Debug)]
pub struct HttpLookupClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpLookupClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:7080`).
    ///
    /// `timeout` bounds each whole request, connect included.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = base_url.trim_end_matches('/');
        let endpoint = format!("{base}{VERIFY_NIN_PATH}");
        reqwest::Url::parse(&endpoint).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self { http, endpoint })
    }

    /// The full lookup URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordLookup for HttpLookupClient {
    async fn find_by_primary_id(&self, id: &PrimaryId) -> Result<Option<Record>, LookupError> {
        tracing::debug!(endpoint = %self.endpoint, "sending NIN lookup");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&VerifyNinRequest { nin: id.as_str() })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Transport(format!("request timed out: {e}"))
                } else {
                    LookupError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body: VerifyNinResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(format!("HTTP {status}: {e}")))?;

        match (status, body.success, body.user) {
            (StatusCode::OK, true, Some(record)) => Ok(Some(record)),
            (StatusCode::OK, true, None) => {
                Err(LookupError::Decode("success response without a user".into()))
            }
            (StatusCode::NOT_FOUND, false, _) => Ok(None),
            (status, _, _) => Err(LookupError::Server {
                status: status.as_u16(),
                message: body.message.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_once() {
        let client = HttpLookupClient::new("http://127.0.0.1:7080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:7080/api/verify-nin");
    }

    #[test]
    fn garbage_url_is_rejected() {
        let err = HttpLookupClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Grab a free port, then close it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client =
            HttpLookupClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
                .unwrap();
        let id = PrimaryId::parse("12345678901").unwrap();
        let err = client.find_by_primary_id(&id).await.unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
    }
}
