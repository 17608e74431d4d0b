// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A classifier that never proposes anything.

use async_trait::async_trait;
use triage_core::{Adapter, AdapterKind, Category, HealthStatus, TextClassifier, TriageError};

/// Used when no classification service is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClassifier;

#[async_trait]
impl Adapter for DisabledClassifier {
    fn name(&self) -> &str {
        "disabled"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_kind(&self) -> AdapterKind {
        AdapterKind::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        Ok(HealthStatus::Degraded("classification disabled".into()))
    }
}

#[async_trait]
impl TextClassifier for DisabledClassifier {
    async fn classify_tools(&self, _text: &str) -> Result<Vec<Category>, TriageError> {
        Ok(Vec::new())
    }

    async fn classify_labels(&self, _text: &str) -> Result<Vec<Category>, TriageError> {
        Ok(Vec::new())
    }
}
