// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by every collaborator backend.

use async_trait::async_trait;

use crate::error::TriageError;
use crate::types::{AdapterKind, HealthStatus};

/// Identity and health reporting for a collaborator backend.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Returns the semantic version of this backend.
    fn version(&self) -> semver::Version;

    /// Returns which collaborator seam this backend fills.
    fn adapter_kind(&self) -> AdapterKind;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, TriageError>;
}
