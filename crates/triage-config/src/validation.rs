// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::TriageConfig;

/// Classifier backends known to the registry.
pub const KNOWN_BACKENDS: &[&str] = &["keyword", "http", "disabled"];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &TriageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` must be one of {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let engine = &config.engine;
    if !(0.0..=1.0).contains(&engine.confidence_threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.confidence_threshold must be within [0, 1], got {}",
                engine.confidence_threshold
            ),
        });
    }

    for (key, value) in [
        ("reminder_interval_secs", engine.reminder_interval_secs),
        ("duplicate_window_secs", engine.duplicate_window_secs),
        ("reminder_window_secs", engine.reminder_window_secs),
        ("classifier_timeout_secs", engine.classifier_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("engine.{key} must be greater than zero"),
            });
        }
    }

    if engine.resolved_emoji.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "engine.resolved_emoji must not be empty".to_string(),
        });
    }

    let backend = config.classifier.backend.as_str();
    if !KNOWN_BACKENDS.contains(&backend) {
        let suggestion = crate::diagnostic::suggest_key(backend, KNOWN_BACKENDS);
        errors.push(ConfigError::Validation {
            message: match suggestion {
                Some(s) => format!("classifier.backend `{backend}` is unknown, did you mean `{s}`?"),
                None => format!(
                    "classifier.backend `{backend}` is unknown, expected one of {}",
                    KNOWN_BACKENDS.join(", ")
                ),
            },
        });
    }

    if backend == "http"
        && config
            .classifier
            .endpoint
            .as_deref()
            .is_none_or(|e| e.trim().is_empty())
    {
        errors.push(ConfigError::MissingKey {
            key: "classifier.endpoint".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&TriageConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let mut config = TriageConfig::default();
        config.storage.database_path = "  ".to_string();
        config.engine.confidence_threshold = 1.5;
        config.engine.reminder_interval_secs = 0;
        config.engine.resolved_emoji = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "got: {errors:?}");
    }

    #[test]
    fn http_backend_requires_endpoint() {
        let mut config = TriageConfig::default();
        config.classifier.backend = "http".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::MissingKey { key } if key == "classifier.endpoint")
        ));

        config.classifier.endpoint = Some("http://localhost:8080".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_backend_gets_suggestion() {
        let mut config = TriageConfig::default();
        config.classifier.backend = "keywrd".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::Validation { message } if message.contains("did you mean `keyword`")
        )));
    }
}
