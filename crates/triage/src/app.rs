// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of store, classifier and engine from configuration.

use std::sync::Arc;

use tracing::{info, warn};
use triage_classifier::ClassifierRegistry;
use triage_config::model::TriageConfig;
use triage_core::{ThreadStore, TriageError};
use triage_engine::{EngineSettings, LifecycleEngine};
use triage_storage::SqliteThreadStore;

/// Assembled runtime. The concrete store is kept so shutdown can checkpoint it.
pub struct App {
    pub engine: LifecycleEngine,
    pub store: Arc<SqliteThreadStore>,
}

impl App {
    pub async fn build(config: &TriageConfig) -> Result<Self, TriageError> {
        let settings = EngineSettings::from_config(config);
        if settings.bot_user_id.is_empty() {
            return Err(TriageError::Config(
                "service.bot_user_id must be set to process events".into(),
            ));
        }

        let classifier = ClassifierRegistry::with_builtins()
            .build(&config.classifier, settings.classifier_timeout)?;
        let store = Arc::new(SqliteThreadStore::open(&config.storage).await?);

        info!(
            database = %config.storage.database_path,
            classifier = %config.classifier.backend,
            "triage runtime ready"
        );

        let engine =
            LifecycleEngine::new(store.clone() as Arc<dyn ThreadStore>, classifier, settings);
        Ok(Self { engine, store })
    }

    /// Drop the engine and checkpoint the database.
    pub async fn shutdown(self) -> Result<(), TriageError> {
        let Self { engine, store } = self;
        drop(engine);
        match Arc::try_unwrap(store) {
            Ok(store) => store.close().await,
            Err(_) => {
                warn!("store still shared at shutdown, skipping checkpoint");
                Ok(())
            }
        }
    }
}

/// Opens only the store, for commands that never touch the engine.
pub async fn open_store(config: &TriageConfig) -> Result<SqliteThreadStore, TriageError> {
    SqliteThreadStore::open(&config.storage).await
}
