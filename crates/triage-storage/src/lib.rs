// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite document store for the triage engine.
//!
//! Thread records are kept as JSON documents next to the indexed columns the
//! engine's queries filter on. All access goes through the single
//! `tokio-rusqlite` background thread; schema changes are embedded refinery
//! migrations applied on open.

pub mod admin;
pub mod database;
pub mod migrations;
pub mod store;

pub use database::Database;
pub use store::SqliteThreadStore;
