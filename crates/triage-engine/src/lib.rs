// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread lifecycle engine for the triage help channel.
//!
//! [`LifecycleEngine`] consumes canonical [`Event`]s (or platform-shaped
//! [`RawEvent`]s), updates thread records through a [`triage_core::ThreadStore`],
//! and returns the [`triage_core::ActionDirective`]s an external executor
//! should carry out. It never talks to the messaging platform itself.

pub mod analytics;
pub mod clock;
pub mod directive;
pub mod engine;
pub mod event;
mod handlers;
pub mod report;
pub mod settings;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::LifecycleEngine;
pub use event::{Event, EventClassifier, EventKind, RawEvent};
pub use report::{build_report, Report};
pub use settings::EngineSettings;
