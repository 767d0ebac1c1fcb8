//! Data model shared across services, stores, and routes.

pub mod content_item;
pub mod content_type;

pub use content_item::{ContentItem, ContentStatus, ItemWithType};
pub use content_type::{ContentField, ContentType, FieldDeclaration, FieldType, TypeDeclaration};
