use core::result::Result as CoreResult;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use triage_core::{ClassifierConfig, Error, PriorityLevel, PriorityResult, Result};

use crate::failure::ClassificationFailure;

/// Wire error body used by the classification server for failures.
const ERROR_MODEL_LOADING: &str = "model still loading";

/// Request payload sent to the classification endpoint.
#[derive(Debug, Serialize)]
struct ClassifyRequest<'text> {
    /// Task text to classify.
    text: &'text str,
}

/// Success payload returned by the classification endpoint.
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    /// Priority label assigned by the model.
    priority: PriorityLevel,
}

/// Error payload returned by the classification endpoint.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    /// Stable error code, for example `model still loading`.
    #[serde(default)]
    error: Option<String>,
    /// Optional human-readable detail.
    #[serde(default)]
    message: Option<String>,
}

/// Health-check payload returned by `GET /health`.
#[derive(Debug, Default, Deserialize)]
struct HealthResponse {
    /// Whether the server considers itself healthy.
    #[serde(default)]
    ok: bool,
}

/// HTTP client for the remote priority-classification service.
///
/// One classification call makes exactly one POST to
/// `{base_url}/classify_task` with a hard wall-clock timeout; any
/// response other than a 2xx with a valid priority label is reported
/// as a [`ClassificationFailure`] and the in-flight request is
/// abandoned.
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    /// HTTP client for API requests.
    client: Client,
    /// Base URL of the classification server, without trailing slash.
    base_url: String,
    /// Wall-clock budget for one classification request.
    timeout: Duration,
}

impl RemoteClassifier {
    /// Creates a classifier from endpoint configuration.
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            client: Client::default(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Classifies task text via the remote service.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassificationFailure`] describing why no result
    /// was produced; the caller decides whether to fall back.
    pub async fn classify(&self, text: &str) -> CoreResult<PriorityResult, ClassificationFailure> {
        let trimmed = text.trim();
        debug!(base_url = %self.base_url, "sending classification request");

        let response = self
            .client
            .post(format!("{}/classify_task", self.base_url))
            .timeout(self.timeout)
            .json(&ClassifyRequest { text: trimmed })
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status.is_success() {
            Self::parse_success(trimmed, response).await
        } else {
            Err(Self::classify_failure(status, response).await)
        }
    }

    /// Parses a 2xx response into a result, rejecting anything without
    /// a valid priority label.
    async fn parse_success(
        clean_text: &str,
        response: Response,
    ) -> CoreResult<PriorityResult, ClassificationFailure> {
        let body = response
            .text()
            .await
            .map_err(|error| ClassificationFailure::Transport(error.to_string()))?;

        let parsed: ClassifyResponse = serde_json::from_str(&body)
            .map_err(|_| ClassificationFailure::MalformedResponse(body.clone()))?;

        Ok(PriorityResult::from_classifier(clean_text, parsed.priority))
    }

    /// Maps a non-2xx response onto the failure taxonomy.
    async fn classify_failure(status: StatusCode, response: Response) -> ClassificationFailure {
        let body: ErrorBody = response.json().await.unwrap_or_default();
        if let Some(detail) = &body.message {
            debug!(status = status.as_u16(), detail = %detail, "classifier error detail");
        }

        if status == StatusCode::SERVICE_UNAVAILABLE
            && body.error.as_deref() == Some(ERROR_MODEL_LOADING)
        {
            ClassificationFailure::ModelLoading
        } else if status == StatusCode::REQUEST_TIMEOUT {
            ClassificationFailure::Timeout
        } else {
            warn!(status = status.as_u16(), "classifier upstream error");
            ClassificationFailure::Upstream {
                status: status.as_u16(),
            }
        }
    }

    /// Checks whether the classification server is reachable and healthy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    pub async fn health(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?;
        let body: HealthResponse = response.json().await?;
        Ok(body.ok)
    }

    /// Asks the server to preload its backing model.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server reports a
    /// non-success status.
    pub async fn warmup(&self) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/warmup", self.base_url))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Other(format!(
                "warmup failed with HTTP {}",
                response.status().as_u16()
            )))
        }
    }
}

/// Maps reqwest send/connect errors onto the failure taxonomy.
///
/// A client-side timeout abort is a distinct condition; everything
/// else that never produced a status line is a transport failure.
fn map_send_error(error: reqwest::Error) -> ClassificationFailure {
    if error.is_timeout() {
        ClassificationFailure::Timeout
    } else {
        ClassificationFailure::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_normalizes_base_url() {
        let classifier = RemoteClassifier::new(&ClassifierConfig::default())
            .with_base_url("http://127.0.0.1:9000/");
        assert_eq!(classifier.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_default_config_endpoint() {
        let classifier = RemoteClassifier::new(&ClassifierConfig::default());
        assert_eq!(classifier.base_url(), "http://localhost:3001");
        assert_eq!(classifier.timeout, Duration::from_millis(15_000));
    }

    #[test]
    fn test_success_body_rejects_unknown_priority() {
        let parsed: CoreResult<ClassifyResponse, _> =
            serde_json::from_str("{\"priority\": \"urgent\"}");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_error_body_tolerates_missing_fields() {
        let parsed: ErrorBody = serde_json::from_str("{}").unwrap_or_default();
        assert!(parsed.error.is_none());
        assert!(parsed.message.is_none());
    }
}
