//! Validation helpers for `strata`.
//!
//! These routines turn raw form input (CLI strings, JSON objects) into
//! typed values and return structured validation errors without
//! mutating storage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use strata_lib::error::ValidationError;
use strata_lib::{SettingKey, SettingValue, ValueKind};

static CURRENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency regex"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Parses a whole settings form (a JSON object of key → value) into
/// typed entries.
pub struct FormValidator;

impl FormValidator {
    /// Parse and validate every field of a form.
    ///
    /// All fields are checked; the error case carries one entry per
    /// offending field so the caller can report them together.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any field fails.
    pub fn parse_object(
        object: &serde_json::Map<String, JsonValue>,
    ) -> Result<Vec<(SettingKey, SettingValue)>, Vec<ValidationError>> {
        let mut entries = Vec::new();
        let mut errors = Vec::new();

        for (field, raw) in object {
            let key: SettingKey = match field.parse() {
                Ok(key) => key,
                Err(_) => {
                    errors.push(ValidationError::new(field.clone(), "unknown setting key"));
                    continue;
                }
            };

            match coerce_json(key, raw) {
                Ok(value) => {
                    if let Err(mut value_errors) = ValueValidator::validate(key, &value) {
                        errors.append(&mut value_errors);
                    } else {
                        entries.push((key, value));
                    }
                }
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() { Ok(entries) } else { Err(errors) }
    }
}

/// Coerce one JSON value into the typed value its key expects.
///
/// Booleans are accepted for flag keys only; numbers for integer keys;
/// strings go through the registry's kind-aware parser. Anything else
/// is a field error.
///
/// # Errors
///
/// Returns a `ValidationError` naming the field on mismatch.
pub fn coerce_json(key: SettingKey, raw: &JsonValue) -> Result<SettingValue, ValidationError> {
    let field = key.as_str();
    match raw {
        JsonValue::Bool(b) => {
            if key.kind() == ValueKind::Flag {
                Ok(SettingValue::Flag(*b))
            } else {
                Err(ValidationError::new(
                    field,
                    format!("expected {}, got a boolean", key.kind().name()),
                ))
            }
        }
        JsonValue::Number(n) => {
            if key.kind() == ValueKind::Integer {
                n.as_i64().map(SettingValue::Integer).ok_or_else(|| {
                    ValidationError::new(field, "expected an integer, got a fraction")
                })
            } else {
                Err(ValidationError::new(
                    field,
                    format!("expected {}, got a number", key.kind().name()),
                ))
            }
        }
        JsonValue::String(s) => key
            .parse_value(s)
            .map_err(|e| ValidationError::new(field, e.to_string())),
        other => Err(ValidationError::new(
            field,
            format!("expected a scalar, got {other}"),
        )),
    }
}

/// Semantic checks applied on top of kind conformance.
pub struct ValueValidator;

impl ValueValidator {
    /// Validate a typed value and return all violations found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any rule is violated.
    pub fn validate(key: SettingKey, value: &SettingValue) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let field = key.as_str();

        match (key, value) {
            (SettingKey::DefaultCurrency, SettingValue::Text(s)) => {
                if !CURRENCY_CODE.is_match(s) {
                    errors.push(ValidationError::new(
                        field,
                        "must be a 3-letter uppercase currency code",
                    ));
                }
            }
            (
                SettingKey::DecimalSeparator | SettingKey::ThousandsSeparator,
                SettingValue::Text(s),
            ) => {
                if s.chars().count() != 1 {
                    errors.push(ValidationError::new(field, "must be a single character"));
                }
            }
            (SettingKey::DecimalFormat, SettingValue::Integer(n)) => {
                if !(0..=6).contains(n) {
                    errors.push(ValidationError::new(field, "must be between 0 and 6"));
                }
            }
            (SettingKey::MailPort, SettingValue::Integer(n)) => {
                if !(1..=65_535).contains(n) {
                    errors.push(ValidationError::new(field, "must be a valid port (1-65535)"));
                }
            }
            (SettingKey::StorageMaxUploadMb, SettingValue::Integer(n)) => {
                if *n <= 0 {
                    errors.push(ValidationError::new(field, "must be positive"));
                }
            }
            (SettingKey::MailFromAddress, SettingValue::Text(s)) => {
                if !EMAIL.is_match(s) {
                    errors.push(ValidationError::new(field, "must be an email address"));
                }
            }
            (SettingKey::SlackWebhook, SettingValue::Text(s)) => {
                if !s.starts_with("https://") {
                    errors.push(ValidationError::new(field, "must be an https:// URL"));
                }
            }
            _ => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
