// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Roster, canned answer and pattern administration.

use regex::RegexBuilder;
use rusqlite::params;
use tracing::info;

use triage_core::{Answer, Pattern, PatternKind, TeamMember, TriageError};

use crate::database::{map_read_err, map_write_err, Database};
use crate::store::SqliteThreadStore;

/// All canned answers, oldest first.
pub(crate) async fn load_answers(db: &Database) -> Result<Vec<Answer>, TriageError> {
    db.connection()
        .call(|conn| -> Result<Vec<Answer>, rusqlite::Error> {
            let mut stmt =
                conn.prepare("SELECT id, tool, label, answer, feedback FROM answers ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(Answer {
                    id: Some(row.get(0)?),
                    tool: row.get(1)?,
                    label: row.get(2)?,
                    answer: row.get(3)?,
                    feedback: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_read_err)
}

impl SqliteThreadStore {
    /// Add a user to the roster, updating the display name if already present.
    pub async fn add_team_member(&self, member: &TeamMember) -> Result<(), TriageError> {
        if member.user_id.trim().is_empty() {
            return Err(TriageError::Validation("team member id must not be empty".into()));
        }
        let member = member.clone();
        let user_id = member.user_id.clone();
        self.db()
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO team_members (user_id, name) VALUES (?1, ?2)
                     ON CONFLICT(user_id) DO UPDATE SET name = excluded.name",
                    params![member.user_id, member.name],
                )?;
                Ok(())
            })
            .await
            .map_err(map_write_err)?;
        info!(user_id = %user_id, "team member added");
        Ok(())
    }

    /// Remove a user from the roster. Returns whether they were present.
    pub async fn remove_team_member(&self, user_id: &str) -> Result<bool, TriageError> {
        let user_id = user_id.to_string();
        let removed = self
            .db()
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM team_members WHERE user_id = ?1", params![user_id])
            })
            .await
            .map_err(map_write_err)?;
        Ok(removed > 0)
    }

    /// The roster, ordered by user id.
    pub async fn list_team_members(&self) -> Result<Vec<TeamMember>, TriageError> {
        self.db()
            .connection()
            .call(|conn| -> Result<Vec<TeamMember>, rusqlite::Error> {
                let mut stmt =
                    conn.prepare("SELECT user_id, name FROM team_members ORDER BY user_id")?;
                let rows = stmt.query_map([], |row| {
                    Ok(TeamMember {
                        user_id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?;
                rows.collect()
            })
            .await
            .map_err(map_read_err)
    }

    /// Store a canned answer and return its id.
    pub async fn add_answer(&self, answer: &Answer) -> Result<i64, TriageError> {
        if answer.answer.trim().is_empty() {
            return Err(TriageError::Validation("answer text must not be empty".into()));
        }
        let answer = answer.clone();
        self.db()
            .connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.execute(
                    "INSERT INTO answers (tool, label, answer, feedback) VALUES (?1, ?2, ?3, ?4)",
                    params![answer.tool, answer.label, answer.answer, answer.feedback],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_write_err)
    }

    /// Delete a canned answer. Returns whether it existed.
    pub async fn remove_answer(&self, id: i64) -> Result<bool, TriageError> {
        let removed = self
            .db()
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM answers WHERE id = ?1", params![id])
            })
            .await
            .map_err(map_write_err)?;
        Ok(removed > 0)
    }

    /// All canned answers, oldest first.
    pub async fn list_answers(&self) -> Result<Vec<Answer>, TriageError> {
        load_answers(self.db()).await
    }

    /// Add or replace a detection pattern. The regex is checked before storing.
    pub async fn add_pattern(&self, pattern: &Pattern) -> Result<(), TriageError> {
        if pattern.name.trim().is_empty() {
            return Err(TriageError::Validation("pattern name must not be empty".into()));
        }
        RegexBuilder::new(&pattern.regex)
            .case_insensitive(true)
            .build()
            .map_err(|e| TriageError::Validation(format!("invalid pattern regex: {e}")))?;

        let kind = pattern.kind.to_string();
        let name = pattern.name.clone();
        let regex = pattern.regex.clone();
        self.db()
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO patterns (kind, name, regex, position)
                     VALUES (?1, ?2, ?3,
                             (SELECT COALESCE(MAX(position), 0) + 1 FROM patterns WHERE kind = ?1))
                     ON CONFLICT(kind, name) DO UPDATE SET regex = excluded.regex",
                    params![kind, name, regex],
                )?;
                Ok(())
            })
            .await
            .map_err(map_write_err)?;
        info!(kind = %pattern.kind, name = %pattern.name, "pattern stored");
        Ok(())
    }

    /// Delete a detection pattern. Returns whether it existed.
    pub async fn remove_pattern(&self, kind: PatternKind, name: &str) -> Result<bool, TriageError> {
        let kind = kind.to_string();
        let name = name.to_string();
        let removed = self
            .db()
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "DELETE FROM patterns WHERE kind = ?1 AND name = ?2",
                    params![kind, name],
                )
            })
            .await
            .map_err(map_write_err)?;
        Ok(removed > 0)
    }

    /// Patterns of one kind, in matching order.
    pub async fn list_patterns(&self, kind: PatternKind) -> Result<Vec<Pattern>, TriageError> {
        let kind_name = kind.to_string();
        self.db()
            .connection()
            .call(move |conn| -> Result<Vec<Pattern>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name, regex FROM patterns WHERE kind = ?1 ORDER BY position, name",
                )?;
                let rows = stmt.query_map(params![kind_name], |row| {
                    Ok(Pattern {
                        kind,
                        name: row.get(0)?,
                        regex: row.get(1)?,
                    })
                })?;
                rows.collect()
            })
            .await
            .map_err(map_read_err)
    }
}
