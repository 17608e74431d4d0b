// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for triage integration tests.
//!
//! Provides in-memory collaborators and a harness for fast, deterministic
//! engine tests without a database or classifier service.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory thread store with write counting and failure injection
//! - [`MockClassifier`] - Classifier with canned categories, failures and delays
//! - [`TestHarness`] - Engine wired to both mocks and a manual clock

pub mod harness;
pub mod mock_classifier;
pub mod mock_store;

pub use harness::{TestHarness, TestHarnessBuilder, BOT_USER_ID, START_TIME};
pub use mock_classifier::MockClassifier;
pub use mock_store::MockStore;
