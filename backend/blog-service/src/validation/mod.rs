//! Field-level validation for form submissions.
//!
//! Two strategies coexist: handlers can check raw values one by one with
//! [`FieldErrors::require`], or declare rules with `#[derive(Validate)]` and
//! convert the outcome with [`FieldErrors::from_validation`]. Either way every
//! failing field is reported, not just the first.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// Error message per form field; `None` marks a field that passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Option<String>>);

impl FieldErrors {
    /// Start with every field of the form marked valid.
    pub fn for_fields(fields: &[&str]) -> Self {
        Self(fields.iter().map(|f| (f.to_string(), None)).collect())
    }

    /// Record `message` for `field` unless `value` is present and non-empty.
    pub fn require(&mut self, field: &str, value: Option<&str>, message: &str) {
        let present = value.map(|v| !v.is_empty()).unwrap_or(false);
        let entry = self.0.entry(field.to_string()).or_default();
        if !present {
            *entry = Some(message.to_string());
        }
    }

    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), Some(message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.as_deref())
    }

    pub fn has_errors(&self) -> bool {
        self.0.values().any(Option::is_some)
    }

    /// Keep the first message of each failing field reported by `validator`.
    pub fn from_validation(fields: &[&str], errors: &ValidationErrors) -> Self {
        let mut result = Self::for_fields(fields);
        for (field, field_errors) in errors.field_errors() {
            let name: &str = &field;
            let message = field_errors
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{} is invalid", name));
            result.set(name, message);
        }
        result
    }
}

/// Run the declared rules of `form`, returning the field map on failure.
pub fn validate_form<T: Validate>(form: &T, fields: &[&str]) -> Result<(), FieldErrors> {
    form.validate()
        .map_err(|errors| FieldErrors::from_validation(fields, &errors))
}
