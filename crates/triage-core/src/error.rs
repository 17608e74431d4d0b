// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the triage engine and its collaborators.

use thiserror::Error;

use crate::types::ThreadStatus;

/// The primary error type used across the collaborator traits and the engine.
#[derive(Debug, Error)]
pub enum TriageError {
    /// A referenced record does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// The acting user is not allowed to perform the interaction.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The text classifier failed or is unreachable.
    #[error("classification unavailable: {message}")]
    ClassificationUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A read against the document store failed.
    #[error("store read failed: {source}")]
    StoreRead {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A write against the document store failed.
    #[error("store write failed: {source}")]
    StoreWrite {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The stored record changed since it was read.
    #[error("write conflict on {id}: expected version {expected}, found {found}")]
    Conflict { id: String, expected: u64, found: u64 },

    /// Malformed input rejected before any store access.
    #[error("validation error: {0}")]
    Validation(String),

    /// A lifecycle transition not allowed by the status table.
    #[error("illegal status transition {from} -> {to}")]
    InvalidTransition { from: ThreadStatus, to: ThreadStatus },

    /// Configuration errors detected at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// A bounded call did not complete in time.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Requested adapter backend is not registered.
    #[error("adapter not found: {kind}/{name}")]
    AdapterNotFound { kind: String, name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TriageError {
    /// Whether the engine may continue with an empty result instead of failing the event.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            TriageError::StoreRead { .. }
                | TriageError::ClassificationUnavailable { .. }
                | TriageError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_classifier_failures_degrade() {
        let read = TriageError::StoreRead {
            source: "boom".into(),
        };
        let classifier = TriageError::ClassificationUnavailable {
            message: "down".into(),
            source: None,
        };
        assert!(read.is_degradable());
        assert!(classifier.is_degradable());
    }

    #[test]
    fn write_failures_are_terminal() {
        let write = TriageError::StoreWrite {
            source: "disk full".into(),
        };
        let conflict = TriageError::Conflict {
            id: "1.0".into(),
            expected: 1,
            found: 3,
        };
        assert!(!write.is_degradable());
        assert!(!conflict.is_degradable());
        assert_eq!(
            conflict.to_string(),
            "write conflict on 1.0: expected version 1, found 3"
        );
    }
}
