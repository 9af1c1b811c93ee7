// src/validator/nu.rs
// =============================================================================
// Client for the Nu HTML Checker (the engine behind validator.w3.org/nu).
//
// The checker accepts the document as the POST body and, with `out=json`,
// answers with a list of messages:
//
//   { "messages": [ { "type": "error", "lastLine": 3, "message": "..." } ] }
//
// It never sends a validity flag of its own. When the reply has none we
// derive it: the document is valid if no message is an error. Services that
// do send `validity` or `valid` are taken at their word.
// =============================================================================

use super::service::{ServiceError, ServiceReport, ValidationService};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Public W3C instance of the checker
pub const DEFAULT_ENDPOINT: &str = "https://validator.w3.org/nu/?out=json";

/// Validates files by uploading them to a Nu HTML Checker instance
#[derive(Debug, Clone)]
pub struct NuValidatorClient {
    client: Client,
    endpoint: Url,
}

impl NuValidatorClient {
    /// Creates a client for `endpoint`
    ///
    /// `timeout` of None means requests may wait forever.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self> {
        // The public checker rejects requests without a User-Agent
        let mut builder =
            Client::builder().user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    fn transport_error(&self, source: reqwest::Error) -> ServiceError {
        ServiceError::Transport {
            url: self.endpoint.to_string(),
            source,
        }
    }
}

#[async_trait]
impl ValidationService for NuValidatorClient {
    async fn validate(&self, path: &Path) -> Result<ServiceReport, ServiceError> {
        // Step 1: read the whole file; the checker wants the raw bytes
        let body = tokio::fs::read(path)
            .await
            .map_err(|source| ServiceError::Read {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!(file = %path.display(), bytes = body.len(), endpoint = %self.endpoint, "uploading");

        // Step 2: upload it as the request body
        // The checker sniffs nothing, so the content type must say HTML
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        // Step 3: anything but 2xx means the checker didn't do its job
        // (rate limits, maintenance pages, a wrong endpoint)
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
            });
        }

        // Step 4: parse the reply, unknown fields are ignored
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let report: ServiceReport = serde_json::from_slice(&bytes)?;

        Ok(with_derived_validity(report))
    }
}

// Fills in `valid` when the reply carried no validity flag at all
fn with_derived_validity(mut report: ServiceReport) -> ServiceReport {
    if report.validity.is_none() && report.valid.is_none() {
        report.valid = Some(!report.messages.iter().any(|m| m.is_error()));
    }
    report
}
