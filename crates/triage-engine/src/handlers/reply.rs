// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info, warn};
use triage_core::metrics::delta_minutes;
use triage_core::{ActionDirective, Reply, ThreadStatus, TriageError};

use crate::directive::no_op;
use crate::engine::LifecycleEngine;

impl LifecycleEngine {
    /// Records a reply in a tracked thread.
    ///
    /// The first team reply to an unresponded thread moves it to responded and
    /// fixes its response time. Any reply from outside the team, the bot's own
    /// included, re-arms the reminder of an open thread; a team reply disarms it.
    pub(crate) async fn handle_reply(
        &self,
        mut reply: Reply,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        if reply.thread_ts.is_empty() {
            return Err(TriageError::Validation(format!(
                "reply {} has no thread",
                reply.ts
            )));
        }
        let Some(mut thread) = self.resolve_thread(&reply.thread_ts).await else {
            return Ok(no_op());
        };
        if thread.replies.iter().any(|r| r.ts == reply.ts) {
            debug!(thread_ts = %thread.ts, reply_ts = %reply.ts, "reply already recorded");
            return Ok(no_op());
        }

        reply.from_bot = reply.from_bot
            || (!self.settings.bot_user_id.is_empty()
                && reply.author.id == self.settings.bot_user_id);
        let member = !reply.from_bot && self.is_member(&reply.author.id).await;

        thread.remind_at = if !member && thread.status.is_open() {
            Some(self.next_reminder())
        } else {
            None
        };

        if member && thread.status == ThreadStatus::Unresponded {
            match thread.transition(ThreadStatus::Responded) {
                Ok(()) => match delta_minutes(&thread.ts, &reply.ts) {
                    Ok(minutes) => {
                        if thread.record_response_time(minutes) {
                            info!(thread_ts = %thread.ts, minutes, "response time recorded");
                        }
                    }
                    Err(e) => warn!(thread_ts = %thread.ts, error = %e, "cannot compute response time"),
                },
                Err(e) => warn!(thread_ts = %thread.ts, error = %e, "transition skipped"),
            }
        }

        thread.replies.push(reply);
        self.persist(&thread).await?;
        Ok(no_op())
    }
}
