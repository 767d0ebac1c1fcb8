//! Field validation engine.
//!
//! Checks an item's field-value map against a content type's field tree.
//! Validation is fail-fast: fields are evaluated in stored order and the
//! first violation is returned, so callers receive one field per failed
//! call.
//!
//! Two checks run per field:
//!
//! - presence: required fields must have an entry under their key. A JSON
//!   null counts as present (an explicitly empty value), matching how the
//!   wire format distinguishes "not supplied" from "supplied empty".
//! - kind: supplied non-null values must structurally match the declared
//!   field type (numbers numeric, dates RFC 3339 strings, and so on).
//!
//! COLLECTION fields recurse into their children by default; shallow mode
//! restores top-level-only checking for compatibility with deployments
//! migrated from the legacy backend.

use serde_json::Value;

use crate::models::{ContentField, FieldType};

/// How deep validation descends into COLLECTION fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Recurse through COLLECTION children (default).
    Deep,
    /// Top-level fields only; legacy-compatible.
    Shallow,
}

impl ValidationMode {
    pub fn from_compat_flag(shallow: bool) -> Self {
        if shallow { Self::Shallow } else { Self::Deep }
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Required field has no entry in the value map.
    Missing,
    /// Supplied value does not match the declared field type.
    WrongKind(FieldType),
}

/// First validation failure found, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Display name of the field.
    pub name: String,
    /// Lookup key of the field.
    pub key: String,
    pub kind: ViolationKind,
}

impl FieldViolation {
    /// Caller-facing message. Publish-path failures carry the transition
    /// context, matching the message shapes front-ends already key off.
    pub fn message(&self, publishing: bool) -> String {
        match &self.kind {
            ViolationKind::Missing => {
                if publishing {
                    format!("Field '{}' is required to publish", self.name)
                } else {
                    format!("Field '{}' is required", self.name)
                }
            }
            ViolationKind::WrongKind(expected) => {
                format!("Field '{}' expects a {} value", self.name, expected.as_str())
            }
        }
    }
}

/// Validate a field-value map against a field list.
///
/// `values` is expected to be a JSON object; any other shape is treated as
/// an empty map (every required field is then missing).
pub fn validate_fields(
    fields: &[ContentField],
    values: &Value,
    mode: ValidationMode,
) -> Result<(), FieldViolation> {
    for field in fields {
        let entry = values.as_object().and_then(|map| map.get(&field.key));

        let Some(value) = entry else {
            if field.required {
                return Err(violation(field, ViolationKind::Missing));
            }
            continue;
        };

        // Null is an explicitly empty value: it satisfies the presence
        // check and is exempt from kind checking.
        if value.is_null() {
            continue;
        }

        check_kind(field, value)?;

        if field.field_type == FieldType::Collection && mode == ValidationMode::Deep {
            validate_collection(field, value, mode)?;
        }
    }

    Ok(())
}

fn violation(field: &ContentField, kind: ViolationKind) -> FieldViolation {
    FieldViolation {
        name: field.name.clone(),
        key: field.key.clone(),
        kind,
    }
}

fn check_kind(field: &ContentField, value: &Value) -> Result<(), FieldViolation> {
    let ok = match field.field_type {
        FieldType::Text | FieldType::Image | FieldType::Reference => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Date => value
            .as_str()
            .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
        FieldType::Collection => value.is_object() || value.is_array(),
    };

    if ok {
        Ok(())
    } else {
        Err(violation(field, ViolationKind::WrongKind(field.field_type)))
    }
}

/// Validate a COLLECTION value (one nested object, or an array of them)
/// against the field's children.
fn validate_collection(
    field: &ContentField,
    value: &Value,
    mode: ValidationMode,
) -> Result<(), FieldViolation> {
    match value {
        Value::Object(_) => validate_fields(&field.children, value, mode),
        Value::Array(elements) => {
            for element in elements {
                if !element.is_object() {
                    return Err(violation(field, ViolationKind::WrongKind(FieldType::Collection)));
                }
                validate_fields(&field.children, element, mode)?;
            }
            Ok(())
        }
        // check_kind already rejected other shapes.
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn field(name: &str, key: &str, field_type: FieldType, required: bool) -> ContentField {
        ContentField {
            id: Uuid::now_v7(),
            name: name.to_string(),
            key: key.to_string(),
            field_type,
            required,
            order: 0,
            children: vec![],
        }
    }

    fn ordered(mut fields: Vec<ContentField>) -> Vec<ContentField> {
        for (i, f) in fields.iter_mut().enumerate() {
            f.order = i as i32;
        }
        fields
    }

    #[test]
    fn missing_required_field_is_reported() {
        let fields = vec![field("Title", "title", FieldType::Text, true)];
        let err = validate_fields(&fields, &json!({}), ValidationMode::Deep).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Missing);
        assert_eq!(err.name, "Title");
        assert_eq!(err.message(false), "Field 'Title' is required");
        assert_eq!(err.message(true), "Field 'Title' is required to publish");
    }

    #[test]
    fn first_missing_field_in_order_wins() {
        let fields = ordered(vec![
            field("Title", "title", FieldType::Text, true),
            field("Body", "body", FieldType::Text, true),
        ]);
        let err = validate_fields(&fields, &json!({}), ValidationMode::Deep).unwrap_err();
        assert_eq!(err.key, "title");
    }

    #[test]
    fn null_satisfies_presence_and_skips_kind_check() {
        let fields = vec![field("Count", "count", FieldType::Number, true)];
        validate_fields(&fields, &json!({"count": null}), ValidationMode::Deep).unwrap();
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let fields = vec![field("Summary", "summary", FieldType::Text, false)];
        validate_fields(&fields, &json!({}), ValidationMode::Deep).unwrap();
    }

    #[test]
    fn non_object_value_map_treated_as_empty() {
        let fields = vec![field("Title", "title", FieldType::Text, true)];
        let err = validate_fields(&fields, &json!("nope"), ValidationMode::Deep).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Missing);
    }

    #[test]
    fn kind_mismatches_are_reported() {
        let cases = [
            (FieldType::Text, json!(42)),
            (FieldType::Number, json!("42")),
            (FieldType::Boolean, json!("yes")),
            (FieldType::Date, json!("not-a-date")),
            (FieldType::Image, json!(1)),
            (FieldType::Reference, json!(true)),
            (FieldType::Collection, json!("flat")),
        ];

        for (field_type, value) in cases {
            let fields = vec![field("F", "f", field_type, false)];
            let err =
                validate_fields(&fields, &json!({"f": value}), ValidationMode::Deep).unwrap_err();
            assert_eq!(err.kind, ViolationKind::WrongKind(field_type), "{field_type:?}");
        }
    }

    #[test]
    fn valid_kinds_pass() {
        let fields = ordered(vec![
            field("Title", "title", FieldType::Text, true),
            field("Count", "count", FieldType::Number, true),
            field("Flag", "flag", FieldType::Boolean, true),
            field("When", "when", FieldType::Date, true),
            field("Cover", "cover", FieldType::Image, false),
            field("Author", "author", FieldType::Reference, false),
        ]);
        let values = json!({
            "title": "Hi",
            "count": 3.5,
            "flag": false,
            "when": "2026-08-29T12:00:00Z",
            "cover": "/images/cover.png",
            "author": "user-1",
        });
        validate_fields(&fields, &values, ValidationMode::Deep).unwrap();
    }

    fn gallery_type() -> Vec<ContentField> {
        let mut gallery = field("Gallery", "gallery", FieldType::Collection, true);
        gallery.children = ordered(vec![
            field("Image", "image", FieldType::Image, true),
            field("Caption", "caption", FieldType::Text, false),
        ]);
        vec![gallery]
    }

    #[test]
    fn deep_mode_recurses_into_collections() {
        let fields = gallery_type();
        let values = json!({"gallery": [{"caption": "no image"}]});
        let err = validate_fields(&fields, &values, ValidationMode::Deep).unwrap_err();
        assert_eq!(err.name, "Image");
        assert_eq!(err.kind, ViolationKind::Missing);
    }

    #[test]
    fn deep_mode_accepts_single_object_collections() {
        let fields = gallery_type();
        let values = json!({"gallery": {"image": "/a.png"}});
        validate_fields(&fields, &values, ValidationMode::Deep).unwrap();
    }

    #[test]
    fn deep_mode_rejects_non_object_collection_elements() {
        let fields = gallery_type();
        let values = json!({"gallery": ["/a.png"]});
        let err = validate_fields(&fields, &values, ValidationMode::Deep).unwrap_err();
        assert_eq!(err.kind, ViolationKind::WrongKind(FieldType::Collection));
    }

    #[test]
    fn shallow_mode_skips_collection_children() {
        let fields = gallery_type();
        let values = json!({"gallery": [{"caption": "no image"}]});
        validate_fields(&fields, &values, ValidationMode::Shallow).unwrap();
    }
}
