// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::Ordering;

use tracing::{info, warn};
use triage_core::{ActionDirective, TriageError};

use crate::directive::{render_template, DirectiveBuilder};
use crate::engine::LifecycleEngine;

impl LifecycleEngine {
    /// Nudges the current designee in every thread whose reminder fell due
    /// since the previous sweep.
    ///
    /// The scanned window is the configured sweep window, widened to reach
    /// back to the last successful sweep when ticks arrive late. A failed read
    /// leaves the mark in place so the next sweep covers the gap.
    pub(crate) async fn reminder_sweep(&self) -> Result<Vec<ActionDirective>, TriageError> {
        let now = self.clock.now_secs();
        let window = self.sweep_window(now);
        let due = match self.store.find_threads_due_for_reminder(now, window).await {
            Ok(due) => {
                self.last_sweep.fetch_max(now, Ordering::SeqCst);
                due
            }
            Err(e) => {
                warn!(error = %e, window, "store read failed, reminders deferred");
                Vec::new()
            }
        };
        if due.is_empty() {
            return Ok(DirectiveBuilder::new().build());
        }

        let designee = self.current_designee().await;
        let messages = &self.settings.messages;
        let text = render_template(&messages.reminder, designee.as_deref(), messages);
        let mut builder = DirectiveBuilder::new();
        for thread in &due {
            builder.reply(&thread.ts, text.clone());
        }
        info!(count = due.len(), now, "reminders due");
        Ok(builder.build())
    }

    fn sweep_window(&self, now: i64) -> u64 {
        let configured = self.settings.reminder_window_secs;
        match self.last_sweep.load(Ordering::SeqCst) {
            i64::MIN => configured,
            last => u64::try_from(now.saturating_sub(last))
                .unwrap_or(0)
                .max(configured),
        }
    }
}
