// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text classifier trait for the external category service.

use async_trait::async_trait;

use crate::error::TriageError;
use crate::traits::adapter::Adapter;
use crate::types::Category;

/// Proposes tool and label categories for free text.
///
/// Implementations return every candidate they have; confidence filtering is
/// the caller's job. Failures surface as
/// [`TriageError::ClassificationUnavailable`].
#[async_trait]
pub trait TextClassifier: Adapter {
    /// Ranked tool categories for `text`.
    async fn classify_tools(&self, text: &str) -> Result<Vec<Category>, TriageError>;

    /// Ranked label categories for `text`.
    async fn classify_labels(&self, text: &str) -> Result<Vec<Category>, TriageError>;
}
