// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::debug;
use triage_core::ActionDirective;

use crate::engine::LifecycleEngine;

impl LifecycleEngine {
    /// Shows the channel rules to someone who just joined.
    pub(crate) fn handle_join(&self, user_id: &str) -> Vec<ActionDirective> {
        debug!(user_id, "welcoming new channel member");
        vec![ActionDirective::Ephemeral {
            user_id: user_id.to_string(),
            text: self.settings.messages.welcome.clone(),
        }]
    }
}
