//! Content item service.
//!
//! Owns item records: creation, partial update, publish/unpublish, and
//! deletion. Required-field validation runs on create and on any
//! transition into PUBLISHED; drafts may carry missing required fields
//! once created (a partial update never re-validates unless it publishes).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ContentItem, ContentStatus, ContentType, ItemWithType};
use crate::store::{ContentStore, StoreError};

use super::validate::{ValidationMode, validate_fields};

/// Input for creating a content item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub content_type_id: Uuid,
    pub title: String,
    pub slug: String,
    pub status: Option<ContentStatus>,
    pub fields: Option<serde_json::Value>,
}

/// Partial update for a content item; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<ContentStatus>,
    pub fields: Option<serde_json::Value>,
}

/// ANDed list filters; absent filters match all.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFilter {
    pub content_type_id: Option<Uuid>,
    pub status: Option<ContentStatus>,
}

/// Service for content item operations.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ContentStore>,
    mode: ValidationMode,
}

impl ItemService {
    pub fn new(store: Arc<dyn ContentStore>, mode: ValidationMode) -> Self {
        Self { store, mode }
    }

    /// List items matching the filter, newest-updated first, each with its
    /// owning content type embedded.
    pub async fn list(&self, filter: ItemFilter) -> AppResult<Vec<ItemWithType>> {
        let items = self
            .store
            .list_items(filter.content_type_id, filter.status)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("list content items")))?;

        let types: HashMap<Uuid, ContentType> = self
            .store
            .list_types()
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("list content types")))?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| {
                let content_type = types.get(&item.content_type_id).cloned();
                ItemWithType { item, content_type }
            })
            .collect())
    }

    /// Fetch one item with its full content type and ordered fields.
    pub async fn get(&self, id: Uuid) -> AppResult<ItemWithType> {
        let item = self.load(id).await?;
        let content_type = self
            .store
            .find_type(item.content_type_id)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("fetch content type")))?;

        Ok(ItemWithType { item, content_type })
    }

    /// Create a new item.
    ///
    /// The owning type must exist; the slug must be free within that type;
    /// required fields must be present in the payload. Creating directly
    /// as PUBLISHED stamps `published_at`.
    pub async fn create(&self, input: CreateItem) -> AppResult<ContentItem> {
        let content_type = self
            .store
            .find_type(input.content_type_id)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("fetch content type")))?
            .ok_or(AppError::NotFound("Content type not found"))?;

        let fields = input.fields.unwrap_or_else(|| serde_json::json!({}));
        validate_fields(&content_type.fields, &fields, self.mode)
            .map_err(|v| AppError::Validation(v.message(false)))?;

        let now = Utc::now();
        let status = input.status.unwrap_or(ContentStatus::Draft);
        let item = ContentItem {
            id: Uuid::now_v7(),
            content_type_id: input.content_type_id,
            title: input.title,
            slug: input.slug,
            status,
            fields,
            created_at: now,
            updated_at: now,
            published_at: (status == ContentStatus::Published).then_some(now),
        };

        self.store.insert_item(&item).await.map_err(item_conflict)?;

        info!(item_id = %item.id, type_id = %item.content_type_id, slug = %item.slug, "content item created");
        Ok(item)
    }

    /// Apply a partial update.
    ///
    /// A patch whose status is PUBLISHED while the item is not currently
    /// published is a publishing transition: required fields are validated
    /// against the effective map (patch fields if supplied, else stored)
    /// and `published_at` is stamped. All other patches skip validation and
    /// leave `published_at` untouched.
    pub async fn update(&self, id: Uuid, patch: UpdateItem) -> AppResult<ContentItem> {
        let existing = self.load(id).await?;

        let publishing =
            patch.status == Some(ContentStatus::Published) && !existing.is_published();

        if publishing {
            let content_type = self
                .store
                .find_type(existing.content_type_id)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::Error::new(e).context("fetch content type"))
                })?
                .ok_or(AppError::NotFound("Content type not found"))?;

            let effective = patch.fields.as_ref().unwrap_or(&existing.fields);
            validate_fields(&content_type.fields, effective, self.mode)
                .map_err(|v| AppError::Validation(v.message(true)))?;
        }

        let now = Utc::now();
        let item = ContentItem {
            title: patch.title.unwrap_or(existing.title),
            slug: patch.slug.unwrap_or(existing.slug),
            status: patch.status.unwrap_or(existing.status),
            fields: patch.fields.unwrap_or(existing.fields),
            updated_at: now,
            published_at: if publishing { Some(now) } else { existing.published_at },
            ..existing
        };

        self.store.update_item(&item).await.map_err(item_conflict)?;

        info!(item_id = %id, status = item.status.as_str(), "content item updated");
        Ok(item)
    }

    /// Publish an item, validating its currently stored fields.
    pub async fn publish(&self, id: Uuid) -> AppResult<ContentItem> {
        let existing = self.load(id).await?;

        let content_type = self
            .store
            .find_type(existing.content_type_id)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("fetch content type")))?
            .ok_or(AppError::NotFound("Content type not found"))?;

        validate_fields(&content_type.fields, &existing.fields, self.mode)
            .map_err(|v| AppError::Validation(v.message(true)))?;

        let now = Utc::now();
        let item = ContentItem {
            status: ContentStatus::Published,
            updated_at: now,
            published_at: Some(now),
            ..existing
        };

        self.store.update_item(&item).await.map_err(item_conflict)?;

        info!(item_id = %id, "content item published");
        Ok(item)
    }

    /// Revert an item to DRAFT. Skips validation and leaves `published_at`
    /// at its prior value, preserving publication history.
    pub async fn unpublish(&self, id: Uuid) -> AppResult<ContentItem> {
        let existing = self.load(id).await?;

        let item = ContentItem {
            status: ContentStatus::Draft,
            updated_at: Utc::now(),
            ..existing
        };

        self.store.update_item(&item).await.map_err(item_conflict)?;

        info!(item_id = %id, "content item unpublished");
        Ok(item)
    }

    /// Delete an item. Items own no children, so no cascade is needed.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = self
            .store
            .delete_item(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("delete content item")))?;

        if !deleted {
            return Err(AppError::NotFound("Content item not found"));
        }

        info!(item_id = %id, "content item deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<ContentItem> {
        self.store
            .find_item(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("fetch content item")))?
            .ok_or(AppError::NotFound("Content item not found"))
    }
}

fn item_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::Conflict(_) => AppError::Conflict("Slug already in use for this content type"),
        e => AppError::Internal(anyhow::Error::new(e).context("persist content item")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{FieldDeclaration, FieldType, TypeDeclaration};
    use crate::store::MemStore;

    async fn setup() -> (ItemService, ContentType) {
        let store: Arc<dyn ContentStore> = Arc::new(MemStore::new());
        let registry = super::super::ContentTypeRegistry::new(store.clone());
        let content_type = registry
            .create(TypeDeclaration {
                name: "Post".to_string(),
                slug: "post".to_string(),
                fields: vec![FieldDeclaration {
                    name: "Title".to_string(),
                    key: "title".to_string(),
                    field_type: FieldType::Text,
                    required: true,
                    children: vec![],
                }],
            })
            .await
            .unwrap();

        (ItemService::new(store, ValidationMode::Deep), content_type)
    }

    fn create_input(type_id: Uuid, slug: &str, fields: serde_json::Value) -> CreateItem {
        CreateItem {
            content_type_id: type_id,
            title: "Hi".to_string(),
            slug: slug.to_string(),
            status: None,
            fields: Some(fields),
        }
    }

    #[tokio::test]
    async fn create_defaults_to_draft_without_published_at() {
        let (items, ct) = setup().await;
        let item = items
            .create(create_input(ct.id, "hi", serde_json::json!({"title": "Hello"})))
            .await
            .unwrap();

        assert_eq!(item.status, ContentStatus::Draft);
        assert!(item.published_at.is_none());
    }

    #[tokio::test]
    async fn create_missing_required_field_persists_nothing() {
        let (items, ct) = setup().await;
        let err = items
            .create(create_input(ct.id, "hi", serde_json::json!({})))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(msg) if msg == "Field 'Title' is required"));
        assert!(items.list(ItemFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_unknown_type_is_not_found() {
        let (items, _) = setup().await;
        let err = items
            .create(create_input(Uuid::now_v7(), "hi", serde_json::json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Content type not found")));
    }

    #[tokio::test]
    async fn publish_validates_stored_fields() {
        let (items, ct) = setup().await;
        // A draft can lose its required field through a non-publishing update.
        let item = items
            .create(create_input(ct.id, "hi", serde_json::json!({"title": "Hello"})))
            .await
            .unwrap();
        items
            .update(
                item.id,
                UpdateItem {
                    fields: Some(serde_json::json!({})),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap();

        let err = items.publish(item.id).await.unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg == "Field 'Title' is required to publish")
        );

        // Status unchanged on failed publish.
        let stored = items.get(item.id).await.unwrap();
        assert_eq!(stored.item.status, ContentStatus::Draft);
        assert!(stored.item.published_at.is_none());
    }

    #[tokio::test]
    async fn unpublish_preserves_published_at() {
        let (items, ct) = setup().await;
        let item = items
            .create(create_input(ct.id, "hi", serde_json::json!({"title": "Hello"})))
            .await
            .unwrap();

        let published = items.publish(item.id).await.unwrap();
        let first_published_at = published.published_at.unwrap();

        let draft = items.unpublish(item.id).await.unwrap();
        assert_eq!(draft.status, ContentStatus::Draft);
        assert_eq!(draft.published_at, Some(first_published_at));

        // Re-publishing stamps a fresh timestamp.
        let republished = items.publish(item.id).await.unwrap();
        assert!(republished.published_at.unwrap() >= first_published_at);
    }

    #[tokio::test]
    async fn update_publish_uses_patch_fields_when_supplied() {
        let (items, ct) = setup().await;
        let item = items
            .create(create_input(ct.id, "hi", serde_json::json!({"title": null})))
            .await
            .unwrap();
        // Stored fields have an explicit null title; publishing patch that
        // removes the key entirely must fail against the patch map.
        let err = items
            .update(
                item.id,
                UpdateItem {
                    status: Some(ContentStatus::Published),
                    fields: Some(serde_json::json!({})),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Without patch fields, validation runs against the stored map and
        // passes (null counts as present).
        let published = items
            .update(
                item.id,
                UpdateItem {
                    status: Some(ContentStatus::Published),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(published.status, ContentStatus::Published);
        assert!(published.published_at.is_some());
    }

    #[tokio::test]
    async fn archive_skips_validation_and_keeps_published_at() {
        let (items, ct) = setup().await;
        let item = items
            .create(create_input(ct.id, "hi", serde_json::json!({"title": "Hello"})))
            .await
            .unwrap();
        let published = items.publish(item.id).await.unwrap();

        let archived = items
            .update(
                item.id,
                UpdateItem {
                    status: Some(ContentStatus::Archived),
                    fields: Some(serde_json::json!({})),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(archived.status, ContentStatus::Archived);
        assert_eq!(archived.published_at, published.published_at);
    }
}
