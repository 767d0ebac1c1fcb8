//! Content type registry.
//!
//! Owns content type definitions and their ordered field trees. Types are
//! created whole and deleted with a cascade; structural update is not
//! supported (schema changes are delete-and-recreate, so existing items
//! are never silently invalidated by an in-place field rename or retype).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ContentField, ContentType, FieldDeclaration, FieldType, TypeDeclaration};
use crate::store::{ContentStore, StoreError};

/// Registry of content types.
#[derive(Clone)]
pub struct ContentTypeRegistry {
    store: Arc<dyn ContentStore>,
}

impl ContentTypeRegistry {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// List all content types, ordered by name ascending.
    pub async fn list(&self) -> AppResult<Vec<ContentType>> {
        self.store
            .list_types()
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("list content types")))
    }

    /// Fetch one content type with its ordered field tree.
    pub async fn get(&self, id: Uuid) -> AppResult<ContentType> {
        self.store
            .find_type(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("fetch content type")))?
            .ok_or(AppError::NotFound("Content type not found"))
    }

    /// Create a content type from a declaration.
    ///
    /// Assigns ids and dense 0-based order indexes to every field (and,
    /// recursively, to collection children), then persists the whole tree
    /// transactionally. A duplicate slug surfaces as Conflict from the
    /// store's unique constraint.
    pub async fn create(&self, declaration: TypeDeclaration) -> AppResult<ContentType> {
        check_declaration(&declaration.fields).map_err(AppError::Validation)?;

        let now = Utc::now();
        let content_type = ContentType {
            id: Uuid::now_v7(),
            name: declaration.name,
            slug: declaration.slug,
            fields: build_fields(declaration.fields),
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_type(&content_type)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::Conflict("Slug already in use"),
                e => AppError::Internal(anyhow::Error::new(e).context("create content type")),
            })?;

        info!(type_id = %content_type.id, slug = %content_type.slug, "content type created");
        Ok(content_type)
    }

    /// Delete a content type, cascading its items and fields.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = self
            .store
            .delete_type(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("delete content type")))?;

        if !deleted {
            return Err(AppError::NotFound("Content type not found"));
        }

        info!(type_id = %id, "content type deleted");
        Ok(())
    }
}

/// Structural checks on a declared field tree: non-empty keys, sibling key
/// uniqueness, and children only under COLLECTION fields.
fn check_declaration(fields: &[FieldDeclaration]) -> Result<(), String> {
    let mut seen = HashSet::new();

    for field in fields {
        if field.key.trim().is_empty() {
            return Err(format!("Field '{}' must have a key", field.name));
        }
        if !seen.insert(field.key.as_str()) {
            return Err(format!("Duplicate field key '{}'", field.key));
        }
        if !field.children.is_empty() && field.field_type != FieldType::Collection {
            return Err(format!(
                "Field '{}' cannot declare children unless it is a COLLECTION",
                field.name
            ));
        }
        check_declaration(&field.children)?;
    }

    Ok(())
}

/// Materialize declarations into fields, assigning ids and order indexes.
fn build_fields(declarations: Vec<FieldDeclaration>) -> Vec<ContentField> {
    declarations
        .into_iter()
        .enumerate()
        .map(|(position, decl)| ContentField {
            id: Uuid::now_v7(),
            name: decl.name,
            key: decl.key,
            field_type: decl.field_type,
            required: decl.required,
            order: position as i32,
            children: build_fields(decl.children),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn registry() -> ContentTypeRegistry {
        ContentTypeRegistry::new(Arc::new(MemStore::new()))
    }

    fn decl(name: &str, key: &str, field_type: FieldType) -> FieldDeclaration {
        FieldDeclaration {
            name: name.to_string(),
            key: key.to_string(),
            field_type,
            required: false,
            children: vec![],
        }
    }

    #[tokio::test]
    async fn create_assigns_dense_order_per_sibling_group() {
        let registry = registry();

        let mut gallery = decl("Gallery", "gallery", FieldType::Collection);
        gallery.children = vec![
            decl("Image", "image", FieldType::Image),
            decl("Caption", "caption", FieldType::Text),
        ];

        let created = registry
            .create(TypeDeclaration {
                name: "Page".to_string(),
                slug: "page".to_string(),
                fields: vec![decl("Title", "title", FieldType::Text), gallery],
            })
            .await
            .unwrap();

        assert_eq!(created.fields[0].order, 0);
        assert_eq!(created.fields[1].order, 1);
        // Children get their own dense ordering within the parent.
        assert_eq!(created.fields[1].children[0].order, 0);
        assert_eq!(created.fields[1].children[1].order, 1);
    }

    #[tokio::test]
    async fn duplicate_sibling_key_is_rejected() {
        let registry = registry();

        let err = registry
            .create(TypeDeclaration {
                name: "Page".to_string(),
                slug: "page".to_string(),
                fields: vec![
                    decl("Title", "title", FieldType::Text),
                    decl("Other Title", "title", FieldType::Text),
                ],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(msg) if msg.contains("title")));
    }

    #[tokio::test]
    async fn same_key_under_different_parents_is_allowed() {
        let registry = registry();

        let mut gallery = decl("Gallery", "gallery", FieldType::Collection);
        gallery.children = vec![decl("Title", "title", FieldType::Text)];

        registry
            .create(TypeDeclaration {
                name: "Page".to_string(),
                slug: "page".to_string(),
                fields: vec![decl("Title", "title", FieldType::Text), gallery],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn children_require_collection_type() {
        let registry = registry();

        let mut bad = decl("Body", "body", FieldType::Text);
        bad.children = vec![decl("Nested", "nested", FieldType::Text)];

        let err = registry
            .create(TypeDeclaration {
                name: "Page".to_string(),
                slug: "page".to_string(),
                fields: vec![bad],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(msg) if msg.contains("COLLECTION")));
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let registry = registry();
        let make = |name: &str| TypeDeclaration {
            name: name.to_string(),
            slug: "post".to_string(),
            fields: vec![],
        };

        registry.create(make("Post")).await.unwrap();
        let err = registry.create(make("Other")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Exactly one type persisted.
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_type_is_not_found() {
        let err = registry().delete(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
