// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store trait backing thread records, the roster and canned answers.

use async_trait::async_trait;

use crate::error::TriageError;
use crate::metrics::Window;
use crate::traits::adapter::Adapter;
use crate::types::{Answer, Thread};

/// Read/write access to thread records keyed by platform timestamp.
///
/// Read failures are reported as [`TriageError::StoreRead`] and write failures
/// as [`TriageError::StoreWrite`], so callers can tell degradable lookups from
/// terminal writes.
#[async_trait]
pub trait ThreadStore: Adapter {
    /// Looks up one thread by identity.
    async fn find_thread(&self, ts: &str) -> Result<Option<Thread>, TriageError>;

    /// User-kind threads whose identity falls inside `window`.
    async fn find_threads_by_window(&self, window: Window) -> Result<Vec<Thread>, TriageError>;

    /// User-kind threads that are neither fixed nor deleted and whose
    /// `remind_at` lies in the `window_secs` seconds up to `now`.
    async fn find_threads_due_for_reminder(
        &self,
        now: i64,
        window_secs: u64,
    ) -> Result<Vec<Thread>, TriageError>;

    /// Whether `user_id` is on the team roster.
    async fn is_team_member(&self, user_id: &str) -> Result<bool, TriageError>;

    /// Inserts or replaces a thread and returns the stored version.
    ///
    /// With `expected_version = Some(v)` the write is rejected with
    /// [`TriageError::Conflict`] unless the stored version is still `v`
    /// (a missing record counts as version 0).
    async fn upsert_thread(
        &self,
        thread: &Thread,
        expected_version: Option<u64>,
    ) -> Result<u64, TriageError>;

    /// Threads started by `user_id` inside `window`, any kind except topic.
    async fn find_recent_by_author(
        &self,
        user_id: &str,
        window: Window,
    ) -> Result<Vec<Thread>, TriageError>;

    /// Canned answers matching the detected tools and labels.
    ///
    /// An answer matches when its tool is one of `tools` (or is empty when
    /// `tools` is empty), and likewise for labels.
    async fn match_answers(
        &self,
        tools: &[String],
        labels: &[String],
    ) -> Result<Vec<Answer>, TriageError>;

    /// Tool names whose patterns match `text`, in pattern order.
    async fn match_tools(&self, text: &str) -> Result<Vec<String>, TriageError>;

    /// Label names whose patterns match `text`, in pattern order.
    async fn match_labels(&self, text: &str) -> Result<Vec<String>, TriageError>;

    /// Designee records (topic-kind threads) dated inside `window`, oldest first.
    async fn find_designees(&self, window: Window) -> Result<Vec<Thread>, TriageError>;
}
