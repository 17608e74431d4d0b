// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text classifier with canned categories.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use triage_core::{Adapter, AdapterKind, Category, HealthStatus, TextClassifier, TriageError};

/// A classifier that returns whatever it was told to.
///
/// Confidence filtering is left to the engine, so candidates below the
/// threshold are returned as-is.
#[derive(Default)]
pub struct MockClassifier {
    tools: Mutex<Vec<Category>>,
    labels: Mutex<Vec<Category>>,
    delay: Mutex<Option<Duration>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_tools(&self, tools: Vec<Category>) {
        *self.tools.lock().await = tools;
    }

    pub async fn set_labels(&self, labels: Vec<Category>) {
        *self.labels.lock().await = labels;
    }

    /// Sleeps this long before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of classify calls received, both axes together.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(&self, source: &Mutex<Vec<Category>>) -> Result<Vec<Category>, TriageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(TriageError::ClassificationUnavailable {
                message: "mock classifier failure".into(),
                source: None,
            });
        }
        Ok(source.lock().await.clone())
    }
}

#[async_trait]
impl Adapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_kind(&self) -> AdapterKind {
        AdapterKind::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TextClassifier for MockClassifier {
    async fn classify_tools(&self, _text: &str) -> Result<Vec<Category>, TriageError> {
        self.answer(&self.tools).await
    }

    async fn classify_labels(&self, _text: &str) -> Result<Vec<Category>, TriageError> {
        self.answer(&self.labels).await
    }
}
