// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the lifecycle engine.
//!
//! Both collaborators extend the [`Adapter`] base trait and use
//! `#[async_trait]` so the engine can hold them as trait objects.

pub mod adapter;
pub mod classifier;
pub mod store;

pub use adapter::Adapter;
pub use classifier::TextClassifier;
pub use store::ThreadStore;
