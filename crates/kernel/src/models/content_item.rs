//! Content item records.
//!
//! Items are the concrete content records conforming to a content type's
//! schema. Field values live in a free-form JSON object keyed by field key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContentType;

/// Publication status of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    /// Stable string form, matching the wire format and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(Self::Draft),
            "PUBLISHED" => Some(Self::Published),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A content item: one record conforming to a content type's schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Owning content type.
    pub content_type_id: Uuid,

    pub title: String,

    /// URL-safe identifier, unique among items of the same content type.
    pub slug: String,

    pub status: ContentStatus,

    /// Field-value map keyed by field key; shape follows the owning type's
    /// field tree.
    pub fields: serde_json::Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Set when the item transitions into PUBLISHED; never cleared on
    /// unpublish (publication history is preserved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

/// An item with its owning content type embedded, as returned by the
/// list and get operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithType {
    #[serde(flatten)]
    pub item: ContentItem,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_item(status: ContentStatus) -> ContentItem {
        let now = Utc::now();
        ContentItem {
            id: Uuid::now_v7(),
            content_type_id: Uuid::now_v7(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            status,
            fields: serde_json::json!({}),
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ContentStatus::Published).unwrap(),
            "\"PUBLISHED\""
        );
        assert_eq!(ContentStatus::parse("ARCHIVED"), Some(ContentStatus::Archived));
        assert_eq!(ContentStatus::parse("archived"), None);
    }

    #[test]
    fn item_status_checks() {
        assert!(sample_item(ContentStatus::Published).is_published());
        assert!(!sample_item(ContentStatus::Draft).is_published());
    }

    #[test]
    fn unset_published_at_is_omitted() {
        let value = serde_json::to_value(sample_item(ContentStatus::Draft)).unwrap();
        assert!(value.get("publishedAt").is_none());
        assert_eq!(value["status"], "DRAFT");
        assert!(value["contentTypeId"].is_string());
    }
}
