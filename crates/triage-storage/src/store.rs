// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`ThreadStore`].

use async_trait::async_trait;
use regex::RegexBuilder;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

use triage_config::model::StorageConfig;
use triage_core::metrics::{parse_ts, Window};
use triage_core::{
    Adapter, AdapterKind, Answer, HealthStatus, PatternKind, Thread, ThreadStore, TriageError,
};

use crate::database::{map_read_err, map_write_err, Database};

const THREAD_COLUMNS: &str = "document, version";

/// SQLite-backed thread store.
pub struct SqliteThreadStore {
    db: Database,
}

/// Result of a versioned write, decided inside the write transaction.
enum WriteOutcome {
    Written(u64),
    Conflict { found: u64 },
}

impl SqliteThreadStore {
    /// Open the store described by `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self, TriageError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        Ok(Self { db })
    }

    /// Wrap an already-opened database.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Flush and close the underlying database.
    pub async fn close(self) -> Result<(), TriageError> {
        self.db.close().await
    }

    async fn query_threads(
        &self,
        filter: &'static str,
        args: Vec<rusqlite::types::Value>,
    ) -> Result<Vec<Thread>, TriageError> {
        let sql = format!("SELECT {THREAD_COLUMNS} FROM threads WHERE {filter}");
        self.db
            .connection()
            .call(move |conn| -> Result<Vec<Thread>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(rusqlite::params_from_iter(args), thread_from_row)?;
                rows.collect()
            })
            .await
            .map_err(map_read_err)
    }

    async fn matching_patterns(
        &self,
        kind: PatternKind,
        text: &str,
    ) -> Result<Vec<String>, TriageError> {
        let kind_name = kind.to_string();
        let patterns = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<(String, String)>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name, regex FROM patterns WHERE kind = ?1 ORDER BY position, name",
                )?;
                let rows = stmt.query_map(params![kind_name], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect()
            })
            .await
            .map_err(map_read_err)?;

        let mut hits = Vec::new();
        for (name, pattern) in patterns {
            match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                Ok(re) if re.is_match(text) => hits.push(name),
                Ok(_) => {}
                Err(e) => warn!(%kind, name = %name, error = %e, "skipping invalid stored pattern"),
            }
        }
        Ok(hits)
    }
}

/// Decode a `(document, version)` row into a [`Thread`].
fn thread_from_row(row: &Row<'_>) -> rusqlite::Result<Thread> {
    let document: String = row.get(0)?;
    let version: i64 = row.get(1)?;
    let mut thread: Thread = serde_json::from_str(&document).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    thread.version = version as u64;
    Ok(thread)
}

#[async_trait]
impl Adapter for SqliteThreadStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_kind(&self) -> AdapterKind {
        AdapterKind::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_read_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ThreadStore for SqliteThreadStore {
    async fn find_thread(&self, ts: &str) -> Result<Option<Thread>, TriageError> {
        let ts = ts.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<Thread>, rusqlite::Error> {
                conn.query_row(
                    &format!("SELECT {THREAD_COLUMNS} FROM threads WHERE ts = ?1"),
                    params![ts],
                    thread_from_row,
                )
                .optional()
            })
            .await
            .map_err(map_read_err)
    }

    async fn find_threads_by_window(&self, window: Window) -> Result<Vec<Thread>, TriageError> {
        self.query_threads(
            "kind = 'user' AND ts_num >= ?1 AND ts_num <= ?2 ORDER BY ts_num",
            vec![window.start.into(), window.end.into()],
        )
        .await
    }

    async fn find_threads_due_for_reminder(
        &self,
        now: i64,
        window_secs: u64,
    ) -> Result<Vec<Thread>, TriageError> {
        let since = now - window_secs as i64;
        self.query_threads(
            "kind = 'user' AND status NOT IN ('fixed', 'deleted') \
                 AND remind_at IS NOT NULL AND remind_at > ?1 AND remind_at <= ?2 \
                 ORDER BY ts_num",
            vec![since.into(), now.into()],
        )
        .await
    }

    async fn is_team_member(&self, user_id: &str) -> Result<bool, TriageError> {
        let user_id = user_id.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<bool, rusqlite::Error> {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM team_members WHERE user_id = ?1)",
                    params![user_id],
                    |row| row.get(0),
                )
            })
            .await
            .map_err(map_read_err)
    }

    async fn upsert_thread(
        &self,
        thread: &Thread,
        expected_version: Option<u64>,
    ) -> Result<u64, TriageError> {
        let ts_num = parse_ts(&thread.ts)?;
        let document = serde_json::to_string(thread).map_err(|e| TriageError::StoreWrite {
            source: Box::new(e),
        })?;
        let ts = thread.ts.clone();
        let kind = thread.kind.to_string();
        let status = thread.status.to_string();
        let author_id = thread.author.id.clone();
        let remind_at = thread.remind_at;

        let outcome = {
            let ts = ts.clone();
            self.db
                .connection()
                .call(move |conn| -> Result<WriteOutcome, rusqlite::Error> {
                    let tx = conn.transaction()?;
                    let current: Option<i64> = tx
                        .query_row(
                            "SELECT version FROM threads WHERE ts = ?1",
                            params![ts],
                            |row| row.get(0),
                        )
                        .optional()?;
                    let current = current.unwrap_or(0) as u64;
                    if let Some(expected) = expected_version
                        && expected != current
                    {
                        return Ok(WriteOutcome::Conflict { found: current });
                    }
                    let next = current + 1;
                    tx.execute(
                        "INSERT INTO threads (ts, ts_num, kind, status, author_id, remind_at, version, document)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                         ON CONFLICT(ts) DO UPDATE SET
                             ts_num = excluded.ts_num,
                             kind = excluded.kind,
                             status = excluded.status,
                             author_id = excluded.author_id,
                             remind_at = excluded.remind_at,
                             version = excluded.version,
                             document = excluded.document,
                             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                        params![ts, ts_num, kind, status, author_id, remind_at, next as i64, document],
                    )?;
                    tx.commit()?;
                    Ok(WriteOutcome::Written(next))
                })
                .await
                .map_err(map_write_err)?
        };

        match outcome {
            WriteOutcome::Written(version) => {
                debug!(thread_ts = %ts, version, "thread stored");
                Ok(version)
            }
            WriteOutcome::Conflict { found } => Err(TriageError::Conflict {
                id: ts,
                expected: expected_version.unwrap_or_default(),
                found,
            }),
        }
    }

    async fn find_recent_by_author(
        &self,
        user_id: &str,
        window: Window,
    ) -> Result<Vec<Thread>, TriageError> {
        self.query_threads(
            "author_id = ?1 AND kind != 'topic' AND ts_num >= ?2 AND ts_num <= ?3 ORDER BY ts_num",
            vec![user_id.to_string().into(), window.start.into(), window.end.into()],
        )
        .await
    }

    async fn match_answers(
        &self,
        tools: &[String],
        labels: &[String],
    ) -> Result<Vec<Answer>, TriageError> {
        let answers = crate::admin::load_answers(self.db()).await?;
        Ok(answers
            .into_iter()
            .filter(|answer| answer.matches(tools, labels))
            .collect())
    }

    async fn match_tools(&self, text: &str) -> Result<Vec<String>, TriageError> {
        self.matching_patterns(PatternKind::Tool, text).await
    }

    async fn match_labels(&self, text: &str) -> Result<Vec<String>, TriageError> {
        self.matching_patterns(PatternKind::Label, text).await
    }

    async fn find_designees(&self, window: Window) -> Result<Vec<Thread>, TriageError> {
        self.query_threads(
            "kind = 'topic' AND ts_num >= ?1 AND ts_num <= ?2 ORDER BY ts_num",
            vec![window.start.into(), window.end.into()],
        )
        .await
    }
}
