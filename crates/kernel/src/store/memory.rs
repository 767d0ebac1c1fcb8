//! In-memory store backend.
//!
//! Enforces the same uniqueness invariants as the Postgres backend so the
//! integration suite exercises identical conflict behavior. Locks are held
//! only across synchronous map operations, never across an await point.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{ContentItem, ContentStatus, ContentType};

use super::{ContentStore, StoreError};

/// HashMap-backed content store.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<MemInner>,
}

#[derive(Default)]
struct MemInner {
    types: HashMap<Uuid, ContentType>,
    items: HashMap<Uuid, ContentItem>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemStore {
    async fn list_types(&self) -> Result<Vec<ContentType>, StoreError> {
        let inner = self.inner.read();
        let mut types: Vec<ContentType> = inner.types.values().cloned().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn find_type(&self, id: Uuid) -> Result<Option<ContentType>, StoreError> {
        Ok(self.inner.read().types.get(&id).cloned())
    }

    async fn insert_type(&self, content_type: &ContentType) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.types.values().any(|t| t.slug == content_type.slug) {
            return Err(StoreError::Conflict("content_type_slug_key".to_string()));
        }
        inner.types.insert(content_type.id, content_type.clone());
        Ok(())
    }

    async fn delete_type(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        if inner.types.remove(&id).is_none() {
            return Ok(false);
        }
        inner.items.retain(|_, item| item.content_type_id != id);
        Ok(true)
    }

    async fn list_items(
        &self,
        content_type_id: Option<Uuid>,
        status: Option<ContentStatus>,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let inner = self.inner.read();
        let mut items: Vec<ContentItem> = inner
            .items
            .values()
            .filter(|item| content_type_id.is_none_or(|t| item.content_type_id == t))
            .filter(|item| status.is_none_or(|s| item.status == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items)
    }

    async fn find_item(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError> {
        Ok(self.inner.read().items.get(&id).cloned())
    }

    async fn insert_item(&self, item: &ContentItem) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let taken = inner
            .items
            .values()
            .any(|other| other.content_type_id == item.content_type_id && other.slug == item.slug);
        if taken {
            return Err(StoreError::Conflict("content_item_type_slug_key".to_string()));
        }
        inner.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn update_item(&self, item: &ContentItem) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let taken = inner.items.values().any(|other| {
            other.id != item.id
                && other.content_type_id == item.content_type_id
                && other.slug == item.slug
        });
        if taken {
            return Err(StoreError::Conflict("content_item_type_slug_key".to_string()));
        }
        inner.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().items.remove(&id).is_some())
    }

    async fn healthy(&self) -> bool {
        true
    }
}
