// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection management: PRAGMA setup, migrations and error mapping.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;
use triage_core::TriageError;

use crate::migrations;

/// Handle to the triage SQLite database.
///
/// Every statement runs on the connection's background thread, so writes are
/// serialized. Do not open a second connection for writes.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database file at `path` and migrate it.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, TriageError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| TriageError::StoreWrite {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| TriageError::StoreWrite {
                source: Box::new(e),
            })?;
        debug!(path, wal_mode, "opened database");
        Self::prepare(conn, wal_mode).await
    }

    /// Open a private in-memory database, migrated and ready for use.
    pub async fn open_in_memory() -> Result<Self, TriageError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| TriageError::StoreWrite {
                source: Box::new(e),
            })?;
        Self::prepare(conn, false).await
    }

    async fn prepare(conn: Connection, wal_mode: bool) -> Result<Self, TriageError> {
        conn.call(
            move |conn| -> Result<Result<(), TriageError>, rusqlite::Error> {
                let journal = if wal_mode { "WAL" } else { "DELETE" };
                conn.execute_batch(&format!(
                    "PRAGMA journal_mode = {journal};
                     PRAGMA synchronous = NORMAL;
                     PRAGMA busy_timeout = 5000;
                     PRAGMA foreign_keys = ON;"
                ))?;
                Ok(migrations::run_migrations(conn))
            },
        )
        .await
        .map_err(map_write_err)??;
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), TriageError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_write_err)?;
        self.conn.close().await.map_err(map_write_err)
    }
}

/// Map a failed read to the degradable store error.
pub(crate) fn map_read_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TriageError {
    TriageError::StoreRead {
        source: Box::new(e),
    }
}

/// Map a failed write to the terminal store error.
pub(crate) fn map_write_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TriageError {
    TriageError::StoreWrite {
        source: Box::new(e),
    }
}
