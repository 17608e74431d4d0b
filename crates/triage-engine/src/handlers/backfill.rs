// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info, warn};
use triage_core::metrics::delta_minutes;
use triage_core::{ActionDirective, Thread, ThreadKind, ThreadStatus, TriageError};

use crate::directive::no_op;
use crate::engine::LifecycleEngine;
use crate::event::{designee_from_topic, EventKind, RawEvent};
use crate::handlers::topic::designee_record;

impl LifecycleEngine {
    /// Catches up on channel history.
    ///
    /// Only top-level messages and topic changes are considered, and anything
    /// already stored is left untouched. Status and response time are rebuilt
    /// from the replies and reactions the history carries. Backfilled threads
    /// are never scheduled for reminders.
    pub(crate) async fn handle_backfill(
        &self,
        events: Vec<RawEvent>,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        let total = events.len();
        let mut stored = 0usize;
        for raw in events {
            let kind = self.events.classify(&raw);
            if !matches!(kind, EventKind::NewMessage | EventKind::TopicChange) {
                debug!(ts = %raw.ts, %kind, "history entry skipped");
                continue;
            }
            match self.store.find_thread(&raw.ts).await {
                Ok(None) => {}
                Ok(Some(_)) => continue,
                Err(e) => {
                    warn!(ts = %raw.ts, error = %e, "cannot check history entry, skipping");
                    continue;
                }
            }
            let member = self.is_member(&raw.user).await;

            let thread = if kind == EventKind::TopicChange {
                let Some(designee) = designee_from_topic(&raw.text).filter(|_| member) else {
                    continue;
                };
                designee_record(raw.ts.clone(), designee, raw.text.clone())
            } else {
                let thread = self.events.thread_from(raw);
                self.rebuild_history(thread, member).await
            };
            self.persist(&thread).await?;
            stored += 1;
        }
        info!(total, stored, "history backfilled");
        Ok(no_op())
    }

    async fn rebuild_history(&self, mut thread: Thread, member: bool) -> Thread {
        thread.kind = if member {
            ThreadKind::Team
        } else {
            ThreadKind::User
        };
        let tools = self
            .read_or_default("tools", self.store.match_tools(&thread.text))
            .await;
        let labels = self
            .read_or_default("labels", self.store.match_labels(&thread.text))
            .await;
        thread.set_categories(tools, labels);
        thread.status = ThreadStatus::Unresponded;

        let mut first_team_reply = None;
        for reply in thread.replies.iter().filter(|r| !r.from_bot) {
            if self.is_member(&reply.author.id).await {
                first_team_reply = Some(reply.ts.clone());
                break;
            }
        }
        if let Some(reply_ts) = first_team_reply {
            thread.status = ThreadStatus::Responded;
            if let Ok(minutes) = delta_minutes(&thread.ts, &reply_ts) {
                thread.record_response_time(minutes);
            }
        }

        let resolved = thread
            .reactions
            .iter()
            .find(|r| r.name == self.settings.resolved_emoji)
            .map(|r| r.ts.clone());
        if let Some(reaction_ts) = resolved {
            thread.status = ThreadStatus::Fixed;
            if let Ok(minutes) = delta_minutes(&thread.ts, &reaction_ts) {
                thread.record_resolution_time(minutes);
            }
        }
        thread.remind_at = None;
        thread.version = 0;
        thread
    }
}
