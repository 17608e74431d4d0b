// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info};
use triage_core::metrics::parse_ts;
use triage_core::{ActionDirective, Thread, ThreadKind, ThreadStatus, TriageError, User};

use crate::directive::no_op;
use crate::engine::LifecycleEngine;
use crate::event::designee_from_topic;

impl LifecycleEngine {
    /// Stores a designee assignment announced through a topic change by a
    /// team member. Topic changes by anyone else are dropped.
    pub(crate) async fn handle_topic_change(
        &self,
        ts: String,
        author: User,
        text: String,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        parse_ts(&ts)?;
        let Some(designee) = designee_from_topic(&text) else {
            return Err(TriageError::Validation(format!(
                "topic change {ts} names no designee"
            )));
        };
        if !self.is_member(&author.id).await {
            debug!(user_id = %author.id, "topic change by non-member ignored");
            return Ok(no_op());
        }
        if self.resolve_thread(&ts).await.is_some() {
            debug!(thread_ts = %ts, "designee assignment already stored");
            return Ok(no_op());
        }
        let record = designee_record(ts, designee, text);
        self.persist(&record).await?;
        info!(thread_ts = %record.ts, designee = %record.author.id, "designee assigned");
        Ok(no_op())
    }
}

/// A dated designee assignment, stored in the thread shape.
pub(crate) fn designee_record(ts: String, designee: String, text: String) -> Thread {
    let mut record = Thread::new(ts, User::new(designee, ""), text);
    record.kind = ThreadKind::Topic;
    record.status = ThreadStatus::Unresponded;
    record
}
