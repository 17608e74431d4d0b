// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.

use triage_core::TriageError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply every pending migration to `conn`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), TriageError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| TriageError::StoreWrite {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        tracing::info!(
            version = migration.version(),
            name = migration.name(),
            "applied schema migration"
        );
    }
    Ok(())
}
