// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info};
use triage_core::metrics::parse_ts;
use triage_core::{
    ActionDirective, FeedbackStatus, Thread, ThreadKind, ThreadStatus, TriageError, Window,
};

use crate::directive::{no_op, DirectiveBuilder};
use crate::engine::LifecycleEngine;

impl LifecycleEngine {
    /// Handles a fresh top-level message.
    ///
    /// Non-members get an acknowledgment (or a "use threads" nudge when they
    /// posted in the duplicate window), followed by any canned answers, and a
    /// feedback prompt when one of those answers asks for it. Members get a
    /// single no-op. The thread is stored either way.
    pub(crate) async fn handle_new_message(
        &self,
        mut thread: Thread,
    ) -> Result<Vec<ActionDirective>, TriageError> {
        let ts_value = parse_ts(&thread.ts)?;
        if thread.author.id.is_empty() {
            return Err(TriageError::Validation(format!(
                "message {} has no author",
                thread.ts
            )));
        }

        // Redelivered events must not produce a second acknowledgment.
        if let Ok(Some(existing)) = self.store.find_thread(&thread.ts).await {
            debug!(thread_ts = %existing.ts, "message already tracked");
            return Ok(no_op());
        }

        let member = self.is_member(&thread.author.id).await;

        let duplicate = if member {
            false
        } else {
            let window = Window::trailing(ts_value, self.settings.duplicate_window_secs);
            self.read_or_default(
                "recent messages",
                self.store.find_recent_by_author(&thread.author.id, window),
            )
            .await
            .iter()
            .any(|recent| recent.ts != thread.ts)
        };

        let tools = self
            .read_or_default("tools", self.store.match_tools(&thread.text))
            .await;
        let labels = self
            .read_or_default("labels", self.store.match_labels(&thread.text))
            .await;
        let answers = self
            .read_or_default("answers", self.store.match_answers(&tools, &labels))
            .await;
        let (ai_tools, ai_labels) = self.classify(&thread.text).await;
        debug!(
            thread_ts = %thread.ts,
            ?tools,
            ?labels,
            answers = answers.len(),
            ai_tools = ai_tools.len(),
            ai_labels = ai_labels.len(),
            "message classified"
        );

        thread.kind = if member {
            ThreadKind::Team
        } else {
            ThreadKind::User
        };
        thread.status = ThreadStatus::Unresponded;
        thread.set_categories(tools, labels);
        thread.ai_tools = ai_tools;
        thread.ai_labels = ai_labels;
        thread.remind_at = (!member).then(|| self.next_reminder());
        thread.feedback_status = FeedbackStatus::NoFeedback;
        thread.version = 0;

        let directives = if member {
            no_op()
        } else {
            let messages = &self.settings.messages;
            let mut text = if duplicate {
                messages.use_threads.clone()
            } else {
                messages.acknowledgment.clone()
            };
            for answer in &answers {
                text.push('\n');
                text.push_str(&answer.answer);
            }
            let mut builder = DirectiveBuilder::new();
            builder.reply(&thread.ts, text);
            if answers.iter().any(|a| a.feedback) {
                builder.feedback_prompt(&thread.ts, messages);
                thread.feedback_status = FeedbackStatus::AskedFeedback;
            }
            builder.build()
        };

        self.persist(&thread).await?;
        info!(
            thread_ts = %thread.ts,
            user_id = %thread.author.id,
            member,
            duplicate,
            "new message tracked"
        );
        Ok(directives)
    }
}
