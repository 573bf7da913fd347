//! HTTP transport to the remote scoring service.

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::domain::ScoringRequest;
use crate::error::AppError;

/// Status and body of a completed HTTP exchange.
///
/// Decoding is left to the submission controller so every status is handled
/// in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (connect failure, timeout, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scoring request failed: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Sends one scoring request and returns the raw response.
pub trait ScoringTransport {
    fn post_score(&self, request: &ScoringRequest) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed client for `POST {base}/api/v1/score`.
pub struct ScoringClient {
    client: Client,
    score_url: String,
}

impl ScoringClient {
    pub fn new(config: &ScoringConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            score_url: config.score_url(),
        })
    }

    pub fn score_url(&self) -> &str {
        &self.score_url
    }
}

impl ScoringTransport for ScoringClient {
    fn post_score(&self, request: &ScoringRequest) -> Result<RawResponse, TransportError> {
        debug!(url = %self.score_url, "posting scoring request");

        let resp = self
            .client
            .post(&self.score_url)
            .json(request)
            .send()
            .map_err(|e| {
                warn!(error = %e, "scoring request failed");
                TransportError(e.to_string())
            })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| TransportError(format!("failed to read response body: {e}")))?;

        debug!(status, bytes = body.len(), "scoring response received");
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(201, "").is_success());
        assert!(!RawResponse::new(422, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[test]
    fn client_targets_score_path() {
        let config = ScoringConfig::new("http://localhost:8000/", None).unwrap();
        let client = ScoringClient::new(&config).unwrap();
        assert_eq!(client.score_url(), "http://localhost:8000/api/v1/score");
    }
}
