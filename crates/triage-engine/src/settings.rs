// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine settings resolved from the loaded configuration.

use std::time::Duration;

use triage_config::model::{MessagesConfig, TriageConfig};

/// Everything a handler needs to know that does not come from an event.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Platform identity of the system's own account.
    pub bot_user_id: String,
    pub dashboard_url: String,
    pub reminder_interval_secs: u64,
    pub duplicate_window_secs: u64,
    pub reminder_window_secs: u64,
    /// Classifier candidates must score strictly above this to be kept.
    pub confidence_threshold: f64,
    pub resolved_emoji: String,
    pub classifier_timeout: Duration,
    pub messages: MessagesConfig,
}

impl EngineSettings {
    pub fn from_config(config: &TriageConfig) -> Self {
        Self {
            bot_user_id: config.service.bot_user_id.clone(),
            dashboard_url: config.service.dashboard_url.clone(),
            reminder_interval_secs: config.engine.reminder_interval_secs,
            duplicate_window_secs: config.engine.duplicate_window_secs,
            reminder_window_secs: config.engine.reminder_window_secs,
            confidence_threshold: config.engine.confidence_threshold,
            resolved_emoji: config.engine.resolved_emoji.clone(),
            classifier_timeout: Duration::from_secs(config.engine.classifier_timeout_secs),
            messages: config.messages.clone(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&TriageConfig::default())
    }
}
