// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lifecycle engine: dispatch plus the shared lookups every handler uses.
//!
//! Handlers follow one failure policy. Store reads and classifier calls on
//! non-critical paths degrade to empty/false with a `warn!`; store writes and
//! version conflicts end the event with an error. A referenced thread that is
//! not tracked yields a single no-op.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicI64;

use tracing::{debug, info, warn};
use triage_core::metrics::designee_window;
use triage_core::{
    ActionDirective, Category, TextClassifier, Thread, ThreadStore, TriageError, Window,
};

use crate::clock::{Clock, SystemClock};
use crate::directive::no_op;
use crate::event::{Event, EventClassifier, RawEvent};
use crate::settings::EngineSettings;

/// Turns inbound events into thread state changes and outbound directives.
pub struct LifecycleEngine {
    pub(crate) store: Arc<dyn ThreadStore>,
    pub(crate) classifier: Arc<dyn TextClassifier>,
    pub(crate) settings: EngineSettings,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) events: EventClassifier,
    /// Epoch seconds of the last sweep whose store read succeeded; `i64::MIN` before the first.
    pub(crate) last_sweep: AtomicI64,
}

impl LifecycleEngine {
    pub fn new(
        store: Arc<dyn ThreadStore>,
        classifier: Arc<dyn TextClassifier>,
        settings: EngineSettings,
    ) -> Self {
        let events = EventClassifier::new(settings.bot_user_id.clone());
        Self {
            store,
            classifier,
            settings,
            clock: Arc::new(SystemClock),
            events,
            last_sweep: AtomicI64::new(i64::MIN),
        }
    }

    /// Replaces the wall clock, typically with a `ManualClock` in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn event_classifier(&self) -> &EventClassifier {
        &self.events
    }

    /// Classifies a platform payload and handles the resulting event.
    pub async fn handle_raw(&self, raw: RawEvent) -> Result<Vec<ActionDirective>, TriageError> {
        let event = self.events.canonicalize(raw, self.clock.now())?;
        self.handle(event).await
    }

    /// Routes a canonical event to its handler.
    ///
    /// The returned list always holds at least one directive.
    pub async fn handle(&self, event: Event) -> Result<Vec<ActionDirective>, TriageError> {
        debug!(event = event.name(), "handling event");
        match event {
            Event::NewMessage { thread } => self.handle_new_message(thread).await,
            Event::Reply { reply } => self.handle_reply(reply).await,
            Event::Reaction { reaction } => self.handle_reaction(reaction).await,
            Event::ReactionRemoved { reaction } => {
                debug!(message_ts = %reaction.message_ts, name = %reaction.name, "reaction removal ignored");
                Ok(no_op())
            }
            Event::Edit {
                ts,
                text,
                edited_ts,
            } => self.handle_edit(&ts, text, edited_ts).await,
            Event::Delete {
                deleted_ts,
                edited_ts,
            } => self.handle_delete(deleted_ts, edited_ts).await,
            Event::TopicChange { ts, author, text } => {
                self.handle_topic_change(ts, author, text).await
            }
            Event::Feedback { interaction } => self.handle_feedback(interaction).await,
            Event::Join { user_id } => Ok(self.handle_join(&user_id)),
            Event::Backfill { events } => self.handle_backfill(events).await,
            Event::ReminderSweep => self.reminder_sweep().await,
            Event::Report { start, end } => self.report(&start, &end).await,
            Event::Ignored { reason } => {
                debug!(%reason, "event ignored");
                Ok(no_op())
            }
        }
    }

    /// Roster lookup that fails open to "not a member".
    pub(crate) async fn is_member(&self, user_id: &str) -> bool {
        match self.store.is_team_member(user_id).await {
            Ok(member) => member,
            Err(e) => {
                warn!(user_id, error = %e, "roster lookup failed, treating as non-member");
                false
            }
        }
    }

    /// Fetches a tracked thread; a failed read counts as untracked.
    pub(crate) async fn resolve_thread(&self, ts: &str) -> Option<Thread> {
        match self.store.find_thread(ts).await {
            Ok(Some(thread)) => Some(thread),
            Ok(None) => {
                debug!(thread_ts = ts, "thread not tracked");
                None
            }
            Err(e) => {
                warn!(thread_ts = ts, error = %e, "thread lookup failed");
                None
            }
        }
    }

    /// Writes `thread` back, guarded by the version it was read at.
    pub(crate) async fn persist(&self, thread: &Thread) -> Result<u64, TriageError> {
        let version = self
            .store
            .upsert_thread(thread, Some(thread.version))
            .await?;
        info!(
            thread_ts = %thread.ts,
            kind = %thread.kind,
            status = %thread.status,
            version,
            "thread persisted"
        );
        Ok(version)
    }

    /// Runs a degradable store read, logging and substituting the default on failure.
    pub(crate) async fn read_or_default<T, F>(&self, what: &str, read: F) -> T
    where
        T: Default,
        F: Future<Output = Result<T, TriageError>>,
    {
        match read.await {
            Ok(value) => value,
            Err(e) => {
                warn!(lookup = what, error = %e, "store read failed, continuing without it");
                T::default()
            }
        }
    }

    /// Tool and label categories from the external classifier.
    pub(crate) async fn classify(&self, text: &str) -> (Vec<Category>, Vec<Category>) {
        let tools = self
            .bounded_classification("tools", self.classifier.classify_tools(text))
            .await;
        let labels = self
            .bounded_classification("labels", self.classifier.classify_labels(text))
            .await;
        (tools, labels)
    }

    async fn bounded_classification<F>(&self, axis: &str, call: F) -> Vec<Category>
    where
        F: Future<Output = Result<Vec<Category>, TriageError>>,
    {
        let timeout = self.settings.classifier_timeout;
        let threshold = self.settings.confidence_threshold;
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(categories)) => categories
                .into_iter()
                .filter(|c| c.confidence > threshold)
                .collect(),
            Ok(Err(e)) => {
                warn!(axis, error = %e, "classifier unavailable");
                Vec::new()
            }
            Err(_elapsed) => {
                warn!(
                    axis,
                    timeout_secs = timeout.as_secs(),
                    "classifier timed out"
                );
                Vec::new()
            }
        }
    }

    /// The designee assigned most recently this week, if any.
    pub(crate) async fn current_designee(&self) -> Option<String> {
        let window = designee_window(self.clock.now_secs())
            .and_then(|(monday, tomorrow)| Window::from_dates(&monday, &tomorrow));
        let window = match window {
            Ok(window) => window,
            Err(e) => {
                warn!(error = %e, "cannot compute designee window");
                return None;
            }
        };
        self.read_or_default("designees", self.store.find_designees(window))
            .await
            .into_iter()
            .last()
            .map(|record| record.author.id)
            .filter(|id| !id.is_empty())
    }

    /// `now + reminder interval`, in epoch seconds.
    pub(crate) fn next_reminder(&self) -> i64 {
        let interval = i64::try_from(self.settings.reminder_interval_secs).unwrap_or(i64::MAX);
        self.clock.now_secs().saturating_add(interval)
    }
}
