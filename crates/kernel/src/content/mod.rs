//! Content-modeling services.
//!
//! The registry owns content type definitions, the item service owns
//! content item records and their status transitions, and the validation
//! engine checks field-value maps against field trees for both.

pub mod item_service;
pub mod type_registry;
pub mod validate;

pub use item_service::{CreateItem, ItemFilter, ItemService, UpdateItem};
pub use type_registry::ContentTypeRegistry;
pub use validate::{FieldViolation, ValidationMode, ViolationKind, validate_fields};
