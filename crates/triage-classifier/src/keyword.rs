// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic keyword classifier.
//!
//! Scores each configured category by the share of its trigger words found
//! in the text. Runs offline, no network calls.

use std::collections::BTreeMap;

use async_trait::async_trait;
use triage_config::model::KeywordTables;
use triage_core::{Adapter, AdapterKind, Category, HealthStatus, TextClassifier, TriageError};

/// Confidence given to a category when a single trigger word matches.
const BASE_CONFIDENCE: f64 = 0.5;

/// Keyword-table classifier.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    tools: BTreeMap<String, Vec<String>>,
    labels: BTreeMap<String, Vec<String>>,
}

impl KeywordClassifier {
    pub fn new(tables: &KeywordTables) -> Self {
        Self {
            tools: lowercase(&tables.tools),
            labels: lowercase(&tables.labels),
        }
    }

    /// Score every category with at least one hit, best first.
    ///
    /// One hit scores exactly [`BASE_CONFIDENCE`], which does not pass the
    /// engine's strict threshold; matching every trigger word scores 1.0.
    fn score(table: &BTreeMap<String, Vec<String>>, text: &str) -> Vec<Category> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut categories: Vec<Category> = table
            .iter()
            .filter(|(_, triggers)| !triggers.is_empty())
            .filter_map(|(name, triggers)| {
                let hits = triggers
                    .iter()
                    .filter(|t| words.iter().any(|w| w == *t))
                    .count();
                (hits > 0).then(|| {
                    let share = hits as f64 / triggers.len() as f64;
                    Category::new(name.clone(), BASE_CONFIDENCE + (1.0 - BASE_CONFIDENCE) * share)
                })
            })
            .collect();
        categories.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.name.cmp(&b.name))
        });
        categories
    }
}

fn lowercase(table: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    table
        .iter()
        .map(|(name, words)| {
            (
                name.clone(),
                words.iter().map(|w| w.to_lowercase()).collect(),
            )
        })
        .collect()
}

#[async_trait]
impl Adapter for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_kind(&self) -> AdapterKind {
        AdapterKind::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TriageError> {
        if self.tools.is_empty() && self.labels.is_empty() {
            return Ok(HealthStatus::Degraded("no keyword tables configured".into()));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TextClassifier for KeywordClassifier {
    async fn classify_tools(&self, text: &str) -> Result<Vec<Category>, TriageError> {
        Ok(Self::score(&self.tools, text))
    }

    async fn classify_labels(&self, text: &str) -> Result<Vec<Category>, TriageError> {
        Ok(Self::score(&self.labels, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> KeywordClassifier {
        let mut tables = KeywordTables::default();
        tables
            .tools
            .insert("vault".into(), vec!["vault".into(), "secret".into()]);
        tables
            .tools
            .insert("kafka".into(), vec!["kafka".into(), "topic".into(), "consumer".into()]);
        tables
            .labels
            .insert("rights".into(), vec!["droits".into(), "Permission".into()]);
        KeywordClassifier::new(&tables)
    }

    #[tokio::test]
    async fn full_match_scores_one() {
        let found = classifier()
            .classify_tools("Mon secret Vault a disparu")
            .await
            .unwrap();
        assert_eq!(found, vec![Category::new("vault", 1.0)]);
    }

    #[tokio::test]
    async fn partial_match_is_ranked_below_full_match() {
        let found = classifier()
            .classify_tools("vault secret pour mon consumer kafka")
            .await
            .unwrap();
        assert_eq!(found[0].name, "vault");
        assert_eq!(found[1].name, "kafka");
        assert!(found[1].confidence > 0.5 && found[1].confidence < 1.0);
    }

    #[tokio::test]
    async fn trigger_words_are_case_insensitive() {
        let found = classifier()
            .classify_labels("pas de PERMISSION ni de droits")
            .await
            .unwrap();
        assert_eq!(found, vec![Category::new("rights", 1.0)]);
    }

    #[tokio::test]
    async fn substrings_do_not_count() {
        let found = classifier().classify_tools("vaulted ceilings").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn empty_tables_report_degraded() {
        let health = KeywordClassifier::default().health_check().await.unwrap();
        assert!(matches!(health, HealthStatus::Degraded(_)));
    }
}
