// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text classifier backends for the triage engine.
//!
//! - [`KeywordClassifier`]: offline heuristic over configured trigger words.
//! - [`HttpClassifier`]: client for the external category service.
//! - [`DisabledClassifier`]: proposes nothing.
//!
//! [`ClassifierRegistry`] resolves the configured backend name to one of these
//! at startup.

pub mod disabled;
pub mod http;
pub mod keyword;
pub mod registry;

pub use disabled::DisabledClassifier;
pub use http::HttpClassifier;
pub use keyword::KeywordClassifier;
pub use registry::ClassifierRegistry;
