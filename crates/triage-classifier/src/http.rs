// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the external category service.
//!
//! The service exposes `POST {endpoint}/tools` and `POST {endpoint}/labels`,
//! both taking `{"text": ...}` and answering
//! `{"categories": [{"name": ..., "confidence": ...}]}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use triage_core::{Adapter, AdapterKind, Category, HealthStatus, TextClassifier, TriageError};

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Client for the remote classification service.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
}

impl HttpClassifier {
    /// Build a client for `endpoint`, bounding each request by `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TriageError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TriageError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `text` to `{endpoint}/{axis}`, retrying once on transient statuses.
    async fn classify(&self, axis: &str, text: &str) -> Result<Vec<Category>, TriageError> {
        let url = format!("{}/{axis}", self.endpoint);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, axis, "retrying classification after transient error");
                tokio::time::sleep(Duration::from_millis(200)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(&ClassifyRequest { text })
                .send()
                .await
                .map_err(|e| TriageError::ClassificationUnavailable {
                    message: format!("request to {url} failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, axis, "classification response received");

            if status.is_success() {
                let body: ClassifyResponse =
                    response
                        .json()
                        .await
                        .map_err(|e| TriageError::ClassificationUnavailable {
                            message: format!("malformed classification response: {e}"),
                            source: Some(Box::new(e)),
                        })?;
                return Ok(body.categories);
            }

            let body = response.text().await.unwrap_or_default();
            let error = TriageError::ClassificationUnavailable {
                message: format!("classifier returned {status}: {body}"),
                source: None,
            };
            if !is_transient_error(status) {
                return Err(error);
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| TriageError::ClassificationUnavailable {
            message: "classification failed after retries".into(),
            source: None,
        }))
    }
}

fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 502 | 503 | 504)
}

#[async_trait]
impl Adapter for HttpClassifier {
    fn name(&self) -> &str {
        "http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_kind(&self) -> AdapterKind {
        AdapterKind::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        match self.client.get(format!("{}/health", self.endpoint)).send().await {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Degraded(format!(
                "classifier health endpoint returned {}",
                resp.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("classifier unreachable: {e}"))),
        }
    }
}

#[async_trait]
impl TextClassifier for HttpClassifier {
    async fn classify_tools(&self, text: &str) -> Result<Vec<Category>, TriageError> {
        self.classify("tools", text).await
    }

    async fn classify_labels(&self, text: &str) -> Result<Vec<Category>, TriageError> {
        self.classify("labels", text).await
    }
}
