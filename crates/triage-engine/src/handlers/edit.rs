// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info, warn};
use triage_core::{ActionDirective, ThreadKind, ThreadStatus, TriageError};

use crate::directive::no_op;
use crate::engine::LifecycleEngine;

impl LifecycleEngine {
    /// Replaces the text of an edited message. Categories are not recomputed.
    pub(crate) async fn handle_edit(
        &self,
        ts: &str,
        text: String,
        edited_ts: Option<String>,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        let Some(mut thread) = self.resolve_thread(ts).await else {
            return Ok(no_op());
        };
        if thread.text == text {
            debug!(thread_ts = ts, "edit leaves text unchanged");
            return Ok(no_op());
        }
        thread.text = text;
        if edited_ts.is_some() {
            thread.edited_ts = edited_ts;
        }
        self.persist(&thread).await?;
        info!(thread_ts = ts, "message text updated");
        Ok(no_op())
    }

    /// Marks a deleted message and, when the bot was its only respondent,
    /// asks for the bot's reply to be deleted too.
    pub(crate) async fn handle_delete(
        &self,
        deleted_ts: Option<String>,
        edited_ts: Option<String>,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        let Some(target) = deleted_ts.clone().or_else(|| edited_ts.clone()) else {
            return Err(TriageError::Validation(
                "delete event carries neither deleted_ts nor edited_ts".into(),
            ));
        };
        let Some(mut thread) = self.resolve_thread(&target).await else {
            return Ok(no_op());
        };
        if thread.kind == ThreadKind::Deleted && thread.status == ThreadStatus::Deleted {
            debug!(thread_ts = %target, "thread already deleted");
            return Ok(no_op());
        }

        let directives = match thread.sole_bot_reply() {
            Some(reply) => vec![ActionDirective::DeletePriorReply {
                ts: reply.ts.clone(),
            }],
            None => no_op(),
        };

        thread.kind = ThreadKind::Deleted;
        if let Err(e) = thread.transition(ThreadStatus::Deleted) {
            warn!(thread_ts = %target, error = %e, "transition skipped");
        }
        thread.remind_at = None;
        thread.deleted_ts = deleted_ts;
        if edited_ts.is_some() {
            thread.edited_ts = edited_ts;
        }
        self.persist(&thread).await?;
        info!(thread_ts = %target, "thread deleted");
        Ok(directives)
    }
}
