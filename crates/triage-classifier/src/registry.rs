// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry mapping configured backend names to classifier constructors.
//!
//! Backends are registered explicitly at startup; resolution is a plain map
//! lookup on the `classifier.backend` config value.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use triage_config::model::ClassifierConfig;
use triage_core::{TextClassifier, TriageError};

use crate::{DisabledClassifier, HttpClassifier, KeywordClassifier};

/// Builds a classifier from its configuration section and request timeout.
pub type ClassifierConstructor =
    fn(&ClassifierConfig, Duration) -> Result<Arc<dyn TextClassifier>, TriageError>;

/// Name to constructor map for classifier backends.
#[derive(Default)]
pub struct ClassifierRegistry {
    constructors: BTreeMap<String, ClassifierConstructor>,
}

impl ClassifierRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `keyword`, `http` and `disabled` backends.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("keyword", build_keyword);
        registry.register("http", build_http);
        registry.register("disabled", build_disabled);
        registry
    }

    /// Register (or replace) a backend constructor.
    pub fn register(&mut self, name: impl Into<String>, constructor: ClassifierConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    /// Registered backend names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Construct the backend named by `config.backend`.
    pub fn build(
        &self,
        config: &ClassifierConfig,
        timeout: Duration,
    ) -> Result<Arc<dyn TextClassifier>, TriageError> {
        let constructor =
            self.constructors
                .get(&config.backend)
                .ok_or_else(|| TriageError::AdapterNotFound {
                    kind: "classifier".into(),
                    name: config.backend.clone(),
                })?;
        let classifier = constructor(config, timeout)?;
        info!(backend = %config.backend, "classifier backend ready");
        Ok(classifier)
    }
}

fn build_keyword(
    config: &ClassifierConfig,
    _timeout: Duration,
) -> Result<Arc<dyn TextClassifier>, TriageError> {
    Ok(Arc::new(KeywordClassifier::new(&config.keywords)))
}

fn build_http(
    config: &ClassifierConfig,
    timeout: Duration,
) -> Result<Arc<dyn TextClassifier>, TriageError> {
    let endpoint = config
        .endpoint
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| TriageError::Config("classifier.endpoint is required for the http backend".into()))?;
    Ok(Arc::new(HttpClassifier::new(endpoint, timeout)?))
}

fn build_disabled(
    _config: &ClassifierConfig,
    _timeout: Duration,
) -> Result<Arc<dyn TextClassifier>, TriageError> {
    Ok(Arc::new(DisabledClassifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::Adapter;

    #[test]
    fn builtins_are_registered() {
        let registry = ClassifierRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["disabled", "http", "keyword"]);
    }

    #[test]
    fn resolves_configured_backend() {
        let registry = ClassifierRegistry::with_builtins();
        let config = ClassifierConfig::default();
        let classifier = registry.build(&config, Duration::from_secs(1)).unwrap();
        assert_eq!(classifier.name(), "keyword");
    }

    #[test]
    fn unknown_backend_is_adapter_not_found() {
        let registry = ClassifierRegistry::with_builtins();
        let config = ClassifierConfig {
            backend: "grpc".into(),
            ..ClassifierConfig::default()
        };
        let err = registry.build(&config, Duration::from_secs(1)).err().unwrap();
        assert!(matches!(
            err,
            TriageError::AdapterNotFound { ref name, .. } if name == "grpc"
        ));
    }

    #[test]
    fn http_backend_requires_endpoint() {
        let registry = ClassifierRegistry::with_builtins();
        let config = ClassifierConfig {
            backend: "http".into(),
            ..ClassifierConfig::default()
        };
        let err = registry.build(&config, Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, TriageError::Config(_)));
    }

    #[test]
    fn custom_backends_can_be_registered() {
        fn build_custom(
            _config: &ClassifierConfig,
            _timeout: Duration,
        ) -> Result<Arc<dyn TextClassifier>, TriageError> {
            Ok(Arc::new(DisabledClassifier))
        }

        let mut registry = ClassifierRegistry::new();
        registry.register("custom", build_custom);
        let config = ClassifierConfig {
            backend: "custom".into(),
            ..ClassifierConfig::default()
        };
        assert_eq!(
            registry.build(&config, Duration::from_secs(1)).unwrap().name(),
            "disabled"
        );
    }
}
