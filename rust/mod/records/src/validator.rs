//! Request validator.
//!
//! Each resource declares a schema: forbidden identity-bearing keys,
//! required field rules (checked in declaration order), and optional
//! rules checked only when the field is present. Validation is
//! fail-fast — the first violation wins — and a pure function of
//! `(body, schema)`.

use promptdeck_core::error::error_code;
use promptdeck_core::ServiceError;
use serde_json::{Map, Value};

/// Identity-bearing keys that must never be accepted from a client,
/// even when editing one's own record.
pub const FORBIDDEN_IDENTITY_KEYS: &[&str] = &["userId", "user_id", "authorId"];

/// What shape a field must have.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Non-empty string after trimming.
    Text,
    /// Any non-null JSON value (object, array, or scalar).
    Structured,
    /// Non-empty array of strings.
    StringArray,
    /// Integer >= 0.
    NonNegInt,
    /// Number >= 0.
    NonNegReal,
    /// Positive integer referencing another record; existence is the
    /// controller's job.
    Reference,
    /// Boolean.
    Bool,
    /// String drawn from a fixed set.
    Enum(&'static [&'static str]),
}

/// One field's validation rule, with the wire codes it produces.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Wire name of the field.
    pub name: &'static str,
    /// Human label used in error messages.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Code when the field is absent or null.
    pub missing: &'static str,
    /// Code when the field is present but malformed.
    pub invalid: &'static str,
}

impl FieldRule {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        missing: &'static str,
        invalid: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            missing,
            invalid,
        }
    }
}

/// Declarative validation schema for one resource's create operation.
pub struct ResourceSchema {
    pub forbidden: &'static [&'static str],
    pub required: &'static [FieldRule],
    /// Checked only when present and non-null.
    pub optional: &'static [FieldRule],
}

/// Validate a creation body against a resource schema.
pub fn validate_create(
    body: &Map<String, Value>,
    schema: &ResourceSchema,
) -> Result<(), ServiceError> {
    check_forbidden(body, schema.forbidden)?;

    for rule in schema.required {
        match body.get(rule.name) {
            None | Some(Value::Null) => return Err(missing_error(rule)),
            Some(value) => check_kind(rule, value)?,
        }
    }

    for rule in schema.optional {
        if let Some(value) = body.get(rule.name) {
            if !value.is_null() {
                check_kind(rule, value)?;
            }
        }
    }

    Ok(())
}

/// Validate a partial-update body: forbidden keys always rejected, rules
/// applied only to fields actually present. Unrecognized keys pass
/// through untouched.
pub fn validate_update(
    body: &Map<String, Value>,
    forbidden: &'static [&'static str],
    rules: &[FieldRule],
) -> Result<(), ServiceError> {
    check_forbidden(body, forbidden)?;

    for rule in rules {
        if let Some(value) = body.get(rule.name) {
            if !value.is_null() {
                check_kind(rule, value)?;
            }
        }
    }

    Ok(())
}

fn check_forbidden(
    body: &Map<String, Value>,
    forbidden: &'static [&'static str],
) -> Result<(), ServiceError> {
    for key in forbidden {
        if body.contains_key(*key) {
            return Err(ServiceError::validation(
                error_code::USER_ID_NOT_ALLOWED,
                "User ID cannot be provided in request body",
            ));
        }
    }
    Ok(())
}

fn missing_error(rule: &FieldRule) -> ServiceError {
    let message = match rule.kind {
        FieldKind::StringArray => {
            format!("{} are required and must be a non-empty array", rule.label)
        }
        FieldKind::NonNegInt | FieldKind::NonNegReal | FieldKind::Reference => {
            format!("Valid {} value is required", rule.label)
        }
        _ => format!("{} is required", rule.label),
    };
    ServiceError::validation(rule.missing, message)
}

fn check_kind(rule: &FieldRule, value: &Value) -> Result<(), ServiceError> {
    let ok = match rule.kind {
        FieldKind::Text => value
            .as_str()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false),
        FieldKind::Structured => !value.is_null(),
        FieldKind::StringArray => value
            .as_array()
            .map(|items| !items.is_empty() && items.iter().all(Value::is_string))
            .unwrap_or(false),
        FieldKind::NonNegInt => value.as_i64().map(|n| n >= 0).unwrap_or(false),
        FieldKind::NonNegReal => value.as_f64().map(|n| n >= 0.0).unwrap_or(false),
        FieldKind::Reference => value.as_i64().map(|n| n > 0).unwrap_or(false),
        FieldKind::Bool => value.is_boolean(),
        FieldKind::Enum(allowed) => value
            .as_str()
            .map(|s| allowed.contains(&s))
            .unwrap_or(false),
    };

    if ok {
        return Ok(());
    }

    let message = match rule.kind {
        FieldKind::Text => format!("{} must be a non-empty string", rule.label),
        FieldKind::Structured => format!("{} is required", rule.label),
        FieldKind::StringArray => {
            format!("{} must be a non-empty array of strings", rule.label)
        }
        FieldKind::NonNegInt => format!("{} must be a non-negative integer", rule.label),
        FieldKind::NonNegReal => format!("{} must be a non-negative number", rule.label),
        FieldKind::Reference => format!("Valid {} is required", rule.label),
        FieldKind::Bool => format!("{} must be a boolean", rule.label),
        FieldKind::Enum(allowed) => {
            format!("{} must be one of: {}", rule.label, allowed.join(", "))
        }
    };
    Err(ServiceError::validation(rule.invalid, message))
}
