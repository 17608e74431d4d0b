// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage doctor` command implementation.
//!
//! Checks the loaded configuration, the database and the classifier backend.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use triage_classifier::ClassifierRegistry;
use triage_config::model::TriageConfig;
use triage_core::{Adapter, HealthStatus, TriageError};
use triage_storage::Database;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

pub async fn run_doctor(config: &TriageConfig, plain: bool) -> Result<(), TriageError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_identity(config),
        check_database(config).await,
        check_classifier(config).await,
    ];

    println!();
    println!("  triage doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", render_line(result, use_color));
    }

    println!();
    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Events cannot be attributed without the system's own user id.
fn check_identity(config: &TriageConfig) -> CheckResult {
    let start = Instant::now();
    if config.service.bot_user_id.trim().is_empty() {
        return CheckResult::new(
            "Identity",
            CheckStatus::Fail,
            "service.bot_user_id is not set",
            start,
        );
    }
    if config.service.dashboard_url.trim().is_empty() {
        return CheckResult::new(
            "Identity",
            CheckStatus::Warn,
            "service.dashboard_url is not set (reports will carry an empty link)",
            start,
        );
    }
    CheckResult::new("Identity", CheckStatus::Pass, &config.service.bot_user_id, start)
}

async fn check_database(config: &TriageConfig) -> CheckResult {
    let start = Instant::now();
    let db_path = &config.storage.database_path;

    if !Path::new(db_path).exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first run)"),
            start,
        );
    }

    match Database::open(db_path, config.storage.wal_mode).await {
        Ok(db) => match db.close().await {
            Ok(()) => CheckResult::new("Database", CheckStatus::Pass, "migrated", start),
            Err(e) => CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
        },
        Err(e) => CheckResult::new(
            "Database",
            CheckStatus::Fail,
            format!("open failed: {e}"),
            start,
        ),
    }
}

async fn check_classifier(config: &TriageConfig) -> CheckResult {
    let start = Instant::now();
    let timeout = Duration::from_secs(config.engine.classifier_timeout_secs);
    let classifier = match ClassifierRegistry::with_builtins().build(&config.classifier, timeout) {
        Ok(c) => c,
        Err(e) => return CheckResult::new("Classifier", CheckStatus::Fail, e.to_string(), start),
    };

    let name = classifier.name().to_string();
    match tokio::time::timeout(timeout, classifier.health_check()).await {
        Ok(Ok(HealthStatus::Healthy)) => CheckResult::new(
            "Classifier",
            CheckStatus::Pass,
            format!("{name} healthy"),
            start,
        ),
        Ok(Ok(HealthStatus::Degraded(why))) => CheckResult::new(
            "Classifier",
            CheckStatus::Warn,
            format!("{name} degraded: {why}"),
            start,
        ),
        Ok(Ok(HealthStatus::Unhealthy(why))) => CheckResult::new(
            "Classifier",
            CheckStatus::Fail,
            format!("{name} unhealthy: {why}"),
            start,
        ),
        Ok(Err(e)) => CheckResult::new("Classifier", CheckStatus::Fail, e.to_string(), start),
        Err(_) => CheckResult::new(
            "Classifier",
            CheckStatus::Fail,
            format!("{name} health check timed out ({}s)", timeout.as_secs()),
            start,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bot_id_fails_identity() {
        let config = TriageConfig::default();
        assert_eq!(check_identity(&config).status, CheckStatus::Fail);
    }

    #[test]
    fn missing_dashboard_only_warns() {
        let mut config = TriageConfig::default();
        config.service.bot_user_id = "UBOT0000001".into();
        assert_eq!(check_identity(&config).status, CheckStatus::Warn);
        config.service.dashboard_url = "https://dashboard.test".into();
        assert_eq!(check_identity(&config).status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn absent_database_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TriageConfig::default();
        config.storage.database_path = dir.path().join("absent.db").to_string_lossy().into_owned();
        assert_eq!(check_database(&config).await.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn unknown_classifier_backend_fails() {
        let mut config = TriageConfig::default();
        config.classifier.backend = "oracle".into();
        assert_eq!(check_classifier(&config).await.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn keyword_backend_without_tables_is_degraded() {
        let config = TriageConfig::default();
        assert_eq!(check_classifier(&config).await.status, CheckStatus::Warn);
    }

    #[test]
    fn plain_rendering_uses_bracket_tags() {
        let result = CheckResult {
            name: "Database".into(),
            status: CheckStatus::Fail,
            message: "open failed".into(),
            duration: Duration::from_millis(3),
        };
        let line = render_line(&result, false);
        assert!(line.contains("[FAIL]"));
        assert!(line.contains("open failed (3ms)"));
    }
}
