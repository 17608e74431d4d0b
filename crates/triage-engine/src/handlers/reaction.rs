// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info, warn};
use triage_core::metrics::delta_minutes;
use triage_core::{ActionDirective, Reaction, ThreadStatus, TriageError};

use crate::directive::no_op;
use crate::engine::LifecycleEngine;

impl LifecycleEngine {
    /// Records a reaction; the resolved emoji fixes the thread once.
    pub(crate) async fn handle_reaction(
        &self,
        reaction: Reaction,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        let Some(mut thread) = self.resolve_thread(&reaction.message_ts).await else {
            return Ok(no_op());
        };
        let already_recorded = thread
            .reactions
            .iter()
            .any(|r| r.name == reaction.name && r.ts == reaction.ts && r.users == reaction.users);
        if already_recorded {
            debug!(thread_ts = %thread.ts, name = %reaction.name, "reaction already recorded");
            return Ok(no_op());
        }

        if reaction.name == self.settings.resolved_emoji && thread.status != ThreadStatus::Fixed {
            match thread.transition(ThreadStatus::Fixed) {
                Ok(()) => {
                    match delta_minutes(&reaction.message_ts, &reaction.ts) {
                        Ok(minutes) => {
                            thread.record_resolution_time(minutes);
                        }
                        Err(e) => {
                            warn!(thread_ts = %thread.ts, error = %e, "cannot compute resolution time")
                        }
                    }
                    info!(thread_ts = %thread.ts, "thread fixed");
                }
                Err(e) => warn!(thread_ts = %thread.ts, error = %e, "transition skipped"),
            }
        }

        thread.reactions.push(reaction);
        self.persist(&thread).await?;
        Ok(no_op())
    }
}
