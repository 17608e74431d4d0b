// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for engine integration testing.
//!
//! `TestHarness` wires a `LifecycleEngine` to a `MockStore`, a
//! `MockClassifier` and a `ManualClock`, and exposes all three so tests can
//! seed state, drive events and inspect the result.

use std::sync::Arc;
use std::time::Duration;

use triage_config::model::TriageConfig;
use triage_core::{ActionDirective, PatternKind, Thread, TriageError, User};
use triage_engine::{EngineSettings, Event, LifecycleEngine, ManualClock, RawEvent};

use crate::mock_classifier::MockClassifier;
use crate::mock_store::MockStore;

/// Account id the harness engine treats as itself.
pub const BOT_USER_ID: &str = "UBOT0000001";

/// Clock value every harness starts at (a Monday, 2026-10-19 00:00:00 UTC).
pub const START_TIME: f64 = 1_792_368_000.0;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: TriageConfig,
    members: Vec<String>,
    answers: Vec<(String, String, String, bool)>,
    patterns: Vec<(PatternKind, String, String)>,
    now: f64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = TriageConfig::default();
        config.service.bot_user_id = BOT_USER_ID.to_string();
        config.service.dashboard_url = "https://dashboard.test".to_string();
        Self {
            config,
            members: Vec::new(),
            answers: Vec::new(),
            patterns: Vec::new(),
            now: START_TIME,
        }
    }

    /// Put a user on the team roster.
    pub fn with_member(mut self, user_id: &str) -> Self {
        self.members.push(user_id.to_string());
        self
    }

    /// Store a canned answer.
    pub fn with_answer(mut self, tool: &str, label: &str, answer: &str, feedback: bool) -> Self {
        self.answers
            .push((tool.into(), label.into(), answer.into(), feedback));
        self
    }

    /// Store a tool or label pattern.
    pub fn with_pattern(mut self, kind: PatternKind, name: &str, regex: &str) -> Self {
        self.patterns.push((kind, name.into(), regex.into()));
        self
    }

    /// Start the manual clock somewhere else.
    pub fn with_now(mut self, now: f64) -> Self {
        self.now = now;
        self
    }

    /// Adjust the configuration the engine settings are derived from.
    pub fn with_config(mut self, edit: impl FnOnce(&mut TriageConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    /// Build the harness and seed the store.
    pub async fn build(self) -> TestHarness {
        let store = Arc::new(MockStore::new());
        for member in &self.members {
            store.add_member(member).await;
        }
        for (tool, label, answer, feedback) in &self.answers {
            store.add_answer(tool, label, answer, *feedback).await;
        }
        for (kind, name, regex) in &self.patterns {
            store.add_pattern(*kind, name, regex).await;
        }

        let classifier = Arc::new(MockClassifier::new());
        let clock = Arc::new(ManualClock::new(self.now));
        let engine = LifecycleEngine::new(
            store.clone(),
            classifier.clone(),
            EngineSettings::from_config(&self.config),
        )
        .with_clock(clock.clone());

        TestHarness {
            engine,
            store,
            classifier,
            clock,
        }
    }
}

/// A complete engine environment for integration testing.
pub struct TestHarness {
    pub engine: LifecycleEngine,
    pub store: Arc<MockStore>,
    pub classifier: Arc<MockClassifier>,
    pub clock: Arc<ManualClock>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn handle(&self, event: Event) -> Result<Vec<ActionDirective>, TriageError> {
        self.engine.handle(event).await
    }

    pub async fn handle_raw(&self, raw: RawEvent) -> Result<Vec<ActionDirective>, TriageError> {
        self.engine.handle_raw(raw).await
    }

    /// Post a top-level message as `user_id`.
    pub async fn post(
        &self,
        ts: &str,
        user_id: &str,
        text: &str,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        let thread = Thread::new(ts, User::new(user_id, user_id.to_lowercase()), text);
        self.handle(Event::NewMessage { thread }).await
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by.as_secs_f64());
    }
}
