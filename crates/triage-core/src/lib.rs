// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the triage help-channel engine.
//!
//! This crate provides the domain model (threads, replies, reactions, action
//! directives), the lifecycle enumerations with their transition table, the
//! pure metrics primitives, the workspace error type, and the collaborator
//! traits the engine consumes (document store, text classifier).

pub mod error;
pub mod metrics;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TriageError;
pub use metrics::Window;
pub use types::{
    ActionDirective, AdapterKind, Answer, Category, FeedbackStatus, HealthStatus, Interaction,
    Pattern, PatternKind, Reaction, Reply, Statistics, TeamMember, Thread, ThreadKind, ThreadStatus,
    User, UserProfile,
};

pub use traits::{Adapter, TextClassifier, ThreadStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_error_has_all_taxonomy_variants() {
        let _not_found = TriageError::NotFound {
            what: "thread",
            id: "1.0".into(),
        };
        let _unauthorized = TriageError::Unauthorized {
            message: "test".into(),
        };
        let _classifier = TriageError::ClassificationUnavailable {
            message: "test".into(),
            source: None,
        };
        let _read = TriageError::StoreRead {
            source: Box::new(std::io::Error::other("test")),
        };
        let _write = TriageError::StoreWrite {
            source: Box::new(std::io::Error::other("test")),
        };
        let _conflict = TriageError::Conflict {
            id: "1.0".into(),
            expected: 1,
            found: 2,
        };
        let _validation = TriageError::Validation("test".into());
        let _transition = TriageError::InvalidTransition {
            from: ThreadStatus::Fixed,
            to: ThreadStatus::Unresponded,
        };
        let _timeout = TriageError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
    }

    #[test]
    fn adapter_kind_round_trips_through_strings() {
        use std::str::FromStr;

        for kind in [AdapterKind::Store, AdapterKind::Classifier] {
            let s = kind.to_string();
            assert_eq!(AdapterKind::from_str(&s).unwrap(), kind);
        }
    }

    #[test]
    fn collaborator_traits_are_exported() {
        fn _assert_store<T: ThreadStore>() {}
        fn _assert_classifier<T: TextClassifier>() {}
        fn _assert_adapter<T: Adapter>() {}
    }
}
