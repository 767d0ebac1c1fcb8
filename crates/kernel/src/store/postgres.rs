//! PostgreSQL store backend.
//!
//! Types, fields, and items live in three tables (see `schema.sql`). The
//! field tree is stored flat with a self-referencing `parent_field_id` and
//! reassembled on read. Slug and sibling-key uniqueness are unique indexes;
//! violations surface as [`StoreError::Conflict`] via Postgres error 23505.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{ContentField, ContentItem, ContentStatus, ContentType, FieldType};

use super::{ContentStore, StoreError};

const SCHEMA: &str = include_str!("schema.sql");

/// Postgres-backed content store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the idempotent schema DDL.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Load all field rows for one content type, ordered by sort_order.
    async fn load_field_rows(&self, content_type_id: Uuid) -> Result<Vec<FieldRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, parent_field_id, name, key, field_type, required, sort_order \
             FROM content_field WHERE content_type_id = $1 ORDER BY sort_order ASC",
        )
        .bind(content_type_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(field_row).collect()
    }
}

/// Flat field row as stored; reassembled into a tree on read.
struct FieldRow {
    id: Uuid,
    parent_field_id: Option<Uuid>,
    name: String,
    key: String,
    field_type: FieldType,
    required: bool,
    sort_order: i32,
}

fn decode_error(column: &str, value: &str) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(
        format!("unrecognized {column} value: {value}").into(),
    ))
}

fn field_row(row: &PgRow) -> Result<FieldRow, StoreError> {
    let raw_type: String = row.try_get("field_type")?;
    let field_type =
        FieldType::parse(&raw_type).ok_or_else(|| decode_error("field_type", &raw_type))?;

    Ok(FieldRow {
        id: row.try_get("id")?,
        parent_field_id: row.try_get("parent_field_id")?,
        name: row.try_get("name")?,
        key: row.try_get("key")?,
        field_type,
        required: row.try_get("required")?,
        sort_order: row.try_get("sort_order")?,
    })
}

fn item_row(row: &PgRow) -> Result<ContentItem, StoreError> {
    let raw_status: String = row.try_get("status")?;
    let status =
        ContentStatus::parse(&raw_status).ok_or_else(|| decode_error("status", &raw_status))?;

    Ok(ContentItem {
        id: row.try_get("id")?,
        content_type_id: row.try_get("content_type_id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        status,
        fields: row.try_get("fields")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        published_at: row.try_get("published_at")?,
    })
}

/// Rebuild the field tree for one parent from ordered flat rows.
fn build_tree(rows: &[FieldRow], parent: Option<Uuid>) -> Vec<ContentField> {
    rows.iter()
        .filter(|r| r.parent_field_id == parent)
        .map(|r| ContentField {
            id: r.id,
            name: r.name.clone(),
            key: r.key.clone(),
            field_type: r.field_type,
            required: r.required,
            order: r.sort_order,
            children: build_tree(rows, Some(r.id)),
        })
        .collect()
}

/// Flatten a field tree into insert order, pairing each field with its
/// parent id.
fn flatten_tree<'a>(
    fields: &'a [ContentField],
    parent: Option<Uuid>,
    out: &mut Vec<(&'a ContentField, Option<Uuid>)>,
) {
    for field in fields {
        out.push((field, parent));
        flatten_tree(&field.children, Some(field.id), out);
    }
}

/// Map a unique-index violation to [`StoreError::Conflict`].
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            let constraint = db.constraint().unwrap_or("unique").to_string();
            return StoreError::Conflict(constraint);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_types(&self) -> Result<Vec<ContentType>, StoreError> {
        let type_rows = sqlx::query(
            "SELECT id, name, slug, created_at, updated_at FROM content_type ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut types = Vec::with_capacity(type_rows.len());
        for row in &type_rows {
            let id: Uuid = row.try_get("id")?;
            let field_rows = self.load_field_rows(id).await?;
            types.push(ContentType {
                id,
                name: row.try_get("name")?,
                slug: row.try_get("slug")?,
                fields: build_tree(&field_rows, None),
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            });
        }

        Ok(types)
    }

    async fn find_type(&self, id: Uuid) -> Result<Option<ContentType>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, slug, created_at, updated_at FROM content_type WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let field_rows = self.load_field_rows(id).await?;

        Ok(Some(ContentType {
            id,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            fields: build_tree(&field_rows, None),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }

    async fn insert_type(&self, content_type: &ContentType) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO content_type (id, name, slug, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(content_type.id)
        .bind(&content_type.name)
        .bind(&content_type.slug)
        .bind(content_type.created_at)
        .bind(content_type.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let mut flat = Vec::new();
        flatten_tree(&content_type.fields, None, &mut flat);

        for (field, parent_id) in flat {
            sqlx::query(
                "INSERT INTO content_field \
                 (id, content_type_id, parent_field_id, name, key, field_type, required, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(field.id)
            .bind(content_type.id)
            .bind(parent_id)
            .bind(&field.name)
            .bind(&field.key)
            .bind(field.field_type.as_str())
            .bind(field.required)
            .bind(field.order)
            .execute(&mut *tx)
            .await
            .map_err(map_unique_violation)?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_type(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Referential order: items, then fields, then the type itself.
        sqlx::query("DELETE FROM content_item WHERE content_type_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM content_field WHERE content_type_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM content_type WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_items(
        &self,
        content_type_id: Option<Uuid>,
        status: Option<ContentStatus>,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let mut query = String::from(
            "SELECT id, content_type_id, title, slug, status, fields, \
             created_at, updated_at, published_at FROM content_item WHERE 1=1",
        );
        let mut param_idx = 1;

        if content_type_id.is_some() {
            query.push_str(&format!(" AND content_type_id = ${param_idx}"));
            param_idx += 1;
        }
        if status.is_some() {
            query.push_str(&format!(" AND status = ${param_idx}"));
        }
        query.push_str(" ORDER BY updated_at DESC");

        let mut query_builder = sqlx::query(&query);
        if let Some(type_id) = content_type_id {
            query_builder = query_builder.bind(type_id);
        }
        if let Some(status) = status {
            query_builder = query_builder.bind(status.as_str());
        }

        let rows = query_builder.fetch_all(&self.pool).await?;
        rows.iter().map(item_row).collect()
    }

    async fn find_item(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError> {
        let row = sqlx::query(
            "SELECT id, content_type_id, title, slug, status, fields, \
             created_at, updated_at, published_at FROM content_item WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(item_row).transpose()
    }

    async fn insert_item(&self, item: &ContentItem) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO content_item \
             (id, content_type_id, title, slug, status, fields, created_at, updated_at, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(item.id)
        .bind(item.content_type_id)
        .bind(&item.title)
        .bind(&item.slug)
        .bind(item.status.as_str())
        .bind(&item.fields)
        .bind(item.created_at)
        .bind(item.updated_at)
        .bind(item.published_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn update_item(&self, item: &ContentItem) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE content_item SET title = $1, slug = $2, status = $3, fields = $4, \
             updated_at = $5, published_at = $6 WHERE id = $7",
        )
        .bind(&item.title)
        .bind(&item.slug)
        .bind(item.status.as_str())
        .bind(&item.fields)
        .bind(item.updated_at)
        .bind(item.published_at)
        .bind(item.id)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM content_item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
