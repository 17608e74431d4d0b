// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One module per event kind, each adding its handler to `LifecycleEngine`.

mod backfill;
mod edit;
mod feedback;
mod join;
mod message;
mod reaction;
mod reminder;
mod reply;
mod report;
mod topic;
