// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::str::FromStr;

use tracing::{info, warn};
use triage_core::metrics::delta_minutes;
use triage_core::{ActionDirective, FeedbackStatus, Interaction, ThreadStatus, TriageError};

use crate::directive::{no_op, render_template, DirectiveBuilder};
use crate::engine::LifecycleEngine;

impl LifecycleEngine {
    /// Applies the author's answer to the feedback prompt.
    ///
    /// "Useful" fixes the thread and reacts with the resolved emoji. "Useless"
    /// pings the current designee in the thread and keeps the reminder armed.
    /// Both close the prompt through the interaction's callback URL.
    pub(crate) async fn handle_feedback(
        &self,
        interaction: Interaction,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        let feedback = match FeedbackStatus::from_str(&interaction.action_value) {
            Ok(status @ (FeedbackStatus::FeedbackUseful | FeedbackStatus::FeedbackUseless)) => {
                status
            }
            _ => {
                return Err(TriageError::Validation(format!(
                    "unknown feedback value {:?}",
                    interaction.action_value
                )));
            }
        };
        if interaction.thread_ts.is_empty() || interaction.response_url.is_empty() {
            return Err(TriageError::Validation(
                "feedback interaction needs thread_ts and response_url".into(),
            ));
        }

        let Some(mut thread) = self.resolve_thread(&interaction.thread_ts).await else {
            return Ok(no_op());
        };
        if thread.author.id != interaction.action_user_id {
            warn!(
                thread_ts = %thread.ts,
                user_id = %interaction.action_user_id,
                "feedback from someone other than the author"
            );
            return Err(TriageError::Unauthorized {
                message: format!(
                    "only the author of {} can give feedback on it",
                    thread.ts
                ),
            });
        }

        thread.feedback_status = feedback;
        thread.feedback_ts = Some(interaction.action_ts.clone()).filter(|ts| !ts.is_empty());

        let messages = &self.settings.messages;
        let mut builder = DirectiveBuilder::new();
        if feedback == FeedbackStatus::FeedbackUseful {
            match thread.transition(ThreadStatus::Fixed) {
                Ok(()) => {
                    if let Ok(minutes) = delta_minutes(&thread.ts, &interaction.action_ts) {
                        thread.record_resolution_time(minutes);
                    }
                    builder.react(&thread.ts, &self.settings.resolved_emoji);
                }
                Err(e) => warn!(thread_ts = %thread.ts, error = %e, "transition skipped"),
            }
            builder.update(&interaction.response_url, messages.feedback_thanks.clone());
        } else {
            let designee = self.current_designee().await;
            let escalation = render_template(&messages.escalation, designee.as_deref(), messages);
            if thread.status.is_open() {
                thread.remind_at = Some(self.next_reminder());
            }
            builder
                .reply(&thread.ts, escalation.clone())
                .update(&interaction.response_url, escalation);
        }

        self.persist(&thread).await?;
        info!(thread_ts = %thread.ts, feedback = %feedback, "feedback recorded");
        Ok(builder.build())
    }
}
