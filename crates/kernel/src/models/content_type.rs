//! Content type and field definitions.
//!
//! A content type is a named schema: an ordered tree of typed fields that
//! content items are validated against. Types are created whole and never
//! structurally updated; schema changes are delete-and-recreate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of value a field holds, in wire format (SCREAMING CASE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Image,
    Reference,
    /// A nested group of fields, described by `children`.
    Collection,
}

impl FieldType {
    /// Stable string form, matching the wire format and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Image => "IMAGE",
            Self::Reference => "REFERENCE",
            Self::Collection => "COLLECTION",
        }
    }

    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TEXT" => Some(Self::Text),
            "NUMBER" => Some(Self::Number),
            "BOOLEAN" => Some(Self::Boolean),
            "DATE" => Some(Self::Date),
            "IMAGE" => Some(Self::Image),
            "REFERENCE" => Some(Self::Reference),
            "COLLECTION" => Some(Self::Collection),
            _ => None,
        }
    }
}

/// One schema entry within a content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentField {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Human-readable label, used in validation messages.
    pub name: String,

    /// Lookup key inside an item's field-value map. Unique among siblings.
    pub key: String,

    /// Field value kind.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether items must supply this field to publish.
    pub required: bool,

    /// Dense 0-based position among siblings; defines display order.
    pub order: i32,

    /// Nested fields. Only populated when `field_type` is COLLECTION.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentField>,
}

/// A content type: a named, slugged schema of ordered fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// URL-safe identifier, globally unique across content types.
    pub slug: String,

    /// Ordered field tree.
    pub fields: Vec<ContentField>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field declaration as submitted by a caller; ids and order are assigned
/// by the registry at creation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDeclaration {
    pub name: String,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub children: Vec<FieldDeclaration>,
}

/// Content type declaration as submitted by a caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}
