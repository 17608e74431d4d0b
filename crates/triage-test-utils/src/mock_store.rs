// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `ThreadStore` for deterministic testing.
//!
//! `MockStore` follows the SQLite store's query semantics (kind filters,
//! closed windows, version checks) and counts every write, so tests can
//! assert that an event produced no store mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use regex::RegexBuilder;
use tokio::sync::Mutex;

use triage_core::metrics::parse_ts;
use triage_core::{
    Adapter, AdapterKind, Answer, HealthStatus, Pattern, PatternKind, Thread, ThreadKind,
    ThreadStatus, ThreadStore, TriageError, Window,
};

/// An in-memory thread store.
#[derive(Default)]
pub struct MockStore {
    threads: Mutex<BTreeMap<String, Thread>>,
    members: Mutex<BTreeSet<String>>,
    answers: Mutex<Vec<Answer>>,
    patterns: Mutex<Vec<Pattern>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_member(&self, user_id: &str) {
        self.members.lock().await.insert(user_id.to_string());
    }

    pub async fn add_answer(&self, tool: &str, label: &str, answer: &str, feedback: bool) {
        let mut answers = self.answers.lock().await;
        let id = answers.len() as i64 + 1;
        answers.push(Answer {
            id: Some(id),
            tool: tool.to_string(),
            label: label.to_string(),
            answer: answer.to_string(),
            feedback,
        });
    }

    pub async fn add_pattern(&self, kind: PatternKind, name: &str, regex: &str) {
        self.patterns.lock().await.push(Pattern {
            kind,
            name: name.to_string(),
            regex: regex.to_string(),
        });
    }

    /// Seeds a thread without counting it as a write.
    pub async fn insert_thread(&self, thread: Thread) {
        self.threads.lock().await.insert(thread.ts.clone(), thread);
    }

    /// Current stored copy of a thread.
    pub async fn thread(&self, ts: &str) -> Option<Thread> {
        self.threads.lock().await.get(ts).cloned()
    }

    pub async fn thread_count(&self) -> usize {
        self.threads.lock().await.len()
    }

    /// Number of successful `upsert_thread` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every read fail with `StoreRead` until switched off.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every write fail with `StoreWrite` until switched off.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), TriageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TriageError::StoreRead {
                source: Box::new(std::io::Error::other("injected read failure")),
            });
        }
        Ok(())
    }

    async fn select<F>(&self, keep: F) -> Result<Vec<Thread>, TriageError>
    where
        F: Fn(&Thread) -> bool,
    {
        self.check_read()?;
        let threads = self.threads.lock().await;
        let mut selected: Vec<Thread> = threads.values().filter(|t| keep(*t)).cloned().collect();
        selected.sort_by(|a, b| {
            let a = parse_ts(&a.ts).unwrap_or_default();
            let b = parse_ts(&b.ts).unwrap_or_default();
            a.total_cmp(&b)
        });
        Ok(selected)
    }

    async fn matching(&self, kind: PatternKind, text: &str) -> Result<Vec<String>, TriageError> {
        self.check_read()?;
        let patterns = self.patterns.lock().await;
        Ok(patterns
            .iter()
            .filter(|p| p.kind == kind)
            .filter(|p| {
                RegexBuilder::new(&p.regex)
                    .case_insensitive(true)
                    .build()
                    .map(|re| re.is_match(text))
                    .unwrap_or(false)
            })
            .map(|p| p.name.clone())
            .collect())
    }
}

#[async_trait]
impl Adapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_kind(&self) -> AdapterKind {
        AdapterKind::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ThreadStore for MockStore {
    async fn find_thread(&self, ts: &str) -> Result<Option<Thread>, TriageError> {
        self.check_read()?;
        Ok(self.threads.lock().await.get(ts).cloned())
    }

    async fn find_threads_by_window(&self, window: Window) -> Result<Vec<Thread>, TriageError> {
        self.select(|t| t.kind == ThreadKind::User && window.contains_ts(&t.ts))
            .await
    }

    async fn find_threads_due_for_reminder(
        &self,
        now: i64,
        window_secs: u64,
    ) -> Result<Vec<Thread>, TriageError> {
        let since = now - window_secs as i64;
        self.select(|t| {
            t.kind == ThreadKind::User
                && !matches!(t.status, ThreadStatus::Fixed | ThreadStatus::Deleted)
                && t.remind_at.is_some_and(|at| at > since && at <= now)
        })
        .await
    }

    async fn is_team_member(&self, user_id: &str) -> Result<bool, TriageError> {
        self.check_read()?;
        Ok(self.members.lock().await.contains(user_id))
    }

    async fn upsert_thread(
        &self,
        thread: &Thread,
        expected_version: Option<u64>,
    ) -> Result<u64, TriageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TriageError::StoreWrite {
                source: Box::new(std::io::Error::other("injected write failure")),
            });
        }
        parse_ts(&thread.ts)?;
        let mut threads = self.threads.lock().await;
        let found = threads.get(&thread.ts).map(|t| t.version).unwrap_or(0);
        if let Some(expected) = expected_version
            && expected != found
        {
            return Err(TriageError::Conflict {
                id: thread.ts.clone(),
                expected,
                found,
            });
        }
        let mut stored = thread.clone();
        stored.version = found + 1;
        threads.insert(stored.ts.clone(), stored);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(found + 1)
    }

    async fn find_recent_by_author(
        &self,
        user_id: &str,
        window: Window,
    ) -> Result<Vec<Thread>, TriageError> {
        self.select(|t| {
            t.author.id == user_id && t.kind != ThreadKind::Topic && window.contains_ts(&t.ts)
        })
        .await
    }

    async fn match_answers(
        &self,
        tools: &[String],
        labels: &[String],
    ) -> Result<Vec<Answer>, TriageError> {
        self.check_read()?;
        Ok(self
            .answers
            .lock()
            .await
            .iter()
            .filter(|a| a.matches(tools, labels))
            .cloned()
            .collect())
    }

    async fn match_tools(&self, text: &str) -> Result<Vec<String>, TriageError> {
        self.matching(PatternKind::Tool, text).await
    }

    async fn match_labels(&self, text: &str) -> Result<Vec<String>, TriageError> {
        self.matching(PatternKind::Label, text).await
    }

    async fn find_designees(&self, window: Window) -> Result<Vec<Thread>, TriageError> {
        self.select(|t| t.kind == ThreadKind::Topic && window.contains_ts(&t.ts))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::User;

    #[tokio::test]
    async fn version_check_rejects_stale_writes() {
        let store = MockStore::new();
        let thread = Thread::new("10.0", User::new("U1", "alice"), "q");
        assert_eq!(store.upsert_thread(&thread, Some(0)).await.unwrap(), 1);
        let err = store.upsert_thread(&thread, Some(0)).await.unwrap_err();
        assert!(matches!(err, TriageError::Conflict { expected: 0, found: 1, .. }));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn injected_failures_use_store_error_kinds() {
        let store = MockStore::new();
        store.fail_reads(true);
        assert!(matches!(
            store.is_team_member("U1").await,
            Err(TriageError::StoreRead { .. })
        ));
        store.fail_writes(true);
        let thread = Thread::new("10.0", User::new("U1", "alice"), "q");
        assert!(matches!(
            store.upsert_thread(&thread, None).await,
            Err(TriageError::StoreWrite { .. })
        ));
    }

    #[tokio::test]
    async fn patterns_match_case_insensitively() {
        let store = MockStore::new();
        store.add_pattern(PatternKind::Tool, "vault", r"\bvault\b").await;
        store.add_pattern(PatternKind::Label, "rights", "droits?").await;
        assert_eq!(store.match_tools("Mon VAULT").await.unwrap(), vec!["vault"]);
        assert_eq!(store.match_labels("pas les droits").await.unwrap(), vec!["rights"]);
        assert!(store.match_tools("rien").await.unwrap().is_empty());
    }
}
