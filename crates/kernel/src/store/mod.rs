//! Persistence layer.
//!
//! The [`ContentStore`] trait is the CRUD contract consumed by the content
//! services. The Postgres backend is the production store; the in-memory
//! backend backs the integration tests and local development.
//!
//! Slug uniqueness is enforced *inside* the store (unique indexes in
//! Postgres, equivalent checks in memory) and surfaced as
//! [`StoreError::Conflict`]. Services never pre-read to check uniqueness,
//! so concurrent creates with the same slug cannot race past the check.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ContentItem, ContentStatus, ContentType};

pub use memory::MemStore;
pub use postgres::PgStore;

/// Errors surfaced by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated; carries the constraint name.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// CRUD contract over content types and content items.
///
/// Mutating operations execute as a single atomic unit; a failed call
/// leaves persisted state unchanged.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All content types with their field trees, ordered by name ascending
    /// (fields by order ascending).
    async fn list_types(&self) -> Result<Vec<ContentType>, StoreError>;

    /// One content type with its ordered field tree.
    async fn find_type(&self, id: Uuid) -> Result<Option<ContentType>, StoreError>;

    /// Persist a content type and its full field tree transactionally.
    /// Violating the global slug constraint yields [`StoreError::Conflict`].
    async fn insert_type(&self, content_type: &ContentType) -> Result<(), StoreError>;

    /// Delete a content type, cascading items → fields → type as one
    /// atomic unit. Returns false when the type does not exist.
    async fn delete_type(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Items matching the ANDed filters, ordered by updated_at descending.
    async fn list_items(
        &self,
        content_type_id: Option<Uuid>,
        status: Option<ContentStatus>,
    ) -> Result<Vec<ContentItem>, StoreError>;

    async fn find_item(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError>;

    /// Persist a new item. Violating the per-type slug constraint yields
    /// [`StoreError::Conflict`].
    async fn insert_item(&self, item: &ContentItem) -> Result<(), StoreError>;

    /// Persist the full state of an existing item. Slug constraint
    /// violations (excluding the item's own row) yield
    /// [`StoreError::Conflict`].
    async fn update_item(&self, item: &ContentItem) -> Result<(), StoreError>;

    /// Returns false when the item does not exist.
    async fn delete_item(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Whether the backing store is reachable.
    async fn healthy(&self) -> bool;
}
