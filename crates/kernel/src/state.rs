//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::content::{ContentTypeRegistry, ItemService, ValidationMode};
use crate::db;
use crate::store::{ContentStore, PgStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn ContentStore>,
    content_types: ContentTypeRegistry,
    items: ItemService,
}

impl AppState {
    /// Initialize state against Postgres, applying the schema.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config).await?;

        let store = PgStore::new(pool);
        store
            .migrate()
            .await
            .context("failed to apply database schema")?;

        let mode = ValidationMode::from_compat_flag(config.compat_shallow_validation);
        Ok(Self::with_store(Arc::new(store), mode))
    }

    /// Build state over any store backend. Used directly by tests with the
    /// in-memory store.
    pub fn with_store(store: Arc<dyn ContentStore>, mode: ValidationMode) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                content_types: ContentTypeRegistry::new(store.clone()),
                items: ItemService::new(store.clone(), mode),
                store,
            }),
        }
    }

    pub fn content_types(&self) -> &ContentTypeRegistry {
        &self.inner.content_types
    }

    pub fn items(&self) -> &ItemService {
        &self.inner.items
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.inner.store
    }
}
