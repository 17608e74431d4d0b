// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level triage configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TriageConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Lifecycle engine thresholds and intervals.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Text classifier backend selection.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// User-facing message texts.
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Platform user id of the system's own account.
    #[serde(default)]
    pub bot_user_id: String,

    /// Link rendered at the bottom of weekly reports.
    #[serde(default)]
    pub dashboard_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            bot_user_id: String::new(),
            dashboard_url: String::new(),
        }
    }
}

fn default_service_name() -> String {
    "triage".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Lifecycle engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Delay before an open thread is nudged again.
    #[serde(default = "default_reminder_interval_secs")]
    pub reminder_interval_secs: u64,

    /// Trailing window in which a second top-level post counts as a duplicate.
    #[serde(default = "default_duplicate_window_secs")]
    pub duplicate_window_secs: u64,

    /// Trailing window scanned by each reminder sweep.
    #[serde(default = "default_reminder_window_secs")]
    pub reminder_window_secs: u64,

    /// Classifier categories must score strictly above this value.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Reaction name marking a thread as resolved.
    #[serde(default = "default_resolved_emoji")]
    pub resolved_emoji: String,

    /// Upper bound on each classifier call.
    #[serde(default = "default_classifier_timeout_secs")]
    pub classifier_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reminder_interval_secs: default_reminder_interval_secs(),
            duplicate_window_secs: default_duplicate_window_secs(),
            reminder_window_secs: default_reminder_window_secs(),
            confidence_threshold: default_confidence_threshold(),
            resolved_emoji: default_resolved_emoji(),
            classifier_timeout_secs: default_classifier_timeout_secs(),
        }
    }
}

fn default_reminder_interval_secs() -> u64 {
    3600
}

fn default_duplicate_window_secs() -> u64 {
    120
}

fn default_reminder_window_secs() -> u64 {
    60
}

fn default_confidence_threshold() -> f64 {
    0.5
}

fn default_resolved_emoji() -> String {
    "heavy_check_mark".to_string()
}

fn default_classifier_timeout_secs() -> u64 {
    10
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("triage").join("triage.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("triage.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Text classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Registered backend name: `keyword`, `http` or `disabled`.
    #[serde(default = "default_classifier_backend")]
    pub backend: String,

    /// Base URL of the external classification service (`http` backend).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Keyword tables for the offline `keyword` backend.
    #[serde(default)]
    pub keywords: KeywordTables,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: default_classifier_backend(),
            endpoint: None,
            keywords: KeywordTables::default(),
        }
    }
}

fn default_classifier_backend() -> String {
    "keyword".to_string()
}

/// Category name to trigger words, for tools and for labels.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordTables {
    #[serde(default)]
    pub tools: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub labels: BTreeMap<String, Vec<String>>,
}

/// User-facing texts. `{designee}` is replaced by a mention of the current
/// designated responder.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesConfig {
    #[serde(default = "default_acknowledgment")]
    pub acknowledgment: String,

    /// Sent instead of the acknowledgment when the author posted again too soon.
    #[serde(default = "default_use_threads")]
    pub use_threads: String,

    #[serde(default = "default_feedback_question")]
    pub feedback_question: String,

    #[serde(default = "default_feedback_useful_button")]
    pub feedback_useful_button: String,

    #[serde(default = "default_feedback_useless_button")]
    pub feedback_useless_button: String,

    #[serde(default = "default_escalation")]
    pub escalation: String,

    #[serde(default = "default_feedback_thanks")]
    pub feedback_thanks: String,

    #[serde(default = "default_reminder")]
    pub reminder: String,

    /// Substituted for `{designee}` when nobody is on duty.
    #[serde(default = "default_no_designee")]
    pub no_designee: String,

    #[serde(default = "default_welcome")]
    pub welcome: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            acknowledgment: default_acknowledgment(),
            use_threads: default_use_threads(),
            feedback_question: default_feedback_question(),
            feedback_useful_button: default_feedback_useful_button(),
            feedback_useless_button: default_feedback_useless_button(),
            escalation: default_escalation(),
            feedback_thanks: default_feedback_thanks(),
            reminder: default_reminder(),
            no_designee: default_no_designee(),
            welcome: default_welcome(),
        }
    }
}

fn default_acknowledgment() -> String {
    "Merci pour ton message.".to_string()
}

fn default_use_threads() -> String {
    "Merci de respecter les threads.".to_string()
}

fn default_feedback_question() -> String {
    "Cette réponse a t'elle permis de résoudre ton souci ?".to_string()
}

fn default_feedback_useful_button() -> String {
    "Oui, merci ! :slightly_smiling_face:".to_string()
}

fn default_feedback_useless_button() -> String {
    "Non, contacter le pompier :fire:".to_string()
}

fn default_escalation() -> String {
    "Je rends la main au pompier. Au secours {designee}".to_string()
}

fn default_feedback_thanks() -> String {
    "Ravi d'avoir pu aider".to_string()
}

fn default_reminder() -> String {
    "Du nouveau {designee} ?".to_string()
}

fn default_no_designee() -> String {
    "l'équipe".to_string()
}

fn default_welcome() -> String {
    concat!(
        ":wave: _Bienvenue sur le chan de support_\n\n",
        ":warning: *A lire avant de poster* :warning:\n\n",
        ":fireman: Une personne de l'équipe est dédiée chaque semaine à la gestion du support\n",
        ":redcard: Merci de ne pas utiliser de @here ou @channel\n",
        ":point_right: Merci d'exposer ta question dans ton premier message\n",
        ":threadplz: Merci de continuer la discussion en thread",
    )
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults_match_operating_values() {
        let engine = EngineConfig::default();
        assert_eq!(engine.reminder_interval_secs, 3600);
        assert_eq!(engine.duplicate_window_secs, 120);
        assert_eq!(engine.reminder_window_secs, 60);
        assert_eq!(engine.confidence_threshold, 0.5);
        assert_eq!(engine.resolved_emoji, "heavy_check_mark");
        assert_eq!(engine.classifier_timeout_secs, 10);
    }

    #[test]
    fn message_templates_carry_designee_placeholder() {
        let messages = MessagesConfig::default();
        assert!(messages.escalation.contains("{designee}"));
        assert!(messages.reminder.contains("{designee}"));
        assert_eq!(messages.acknowledgment, "Merci pour ton message.");
    }
}
