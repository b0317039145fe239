//! Field-scoped constraint checks.
//!
//! Each function inspects one field and returns at most one [`Error`]: the
//! first constraint that fails. A blank value is reported as blank and never
//! also as too short.

use chrono::{DateTime, Utc};
use validator::ValidateLength;

use super::Error;
use crate::identifier::Identifier;

pub fn blank(field: &str) -> Error {
    Error::new(format!("'{field}' should not be null or blank"))
}

pub fn null(field: &str) -> Error {
    Error::new(format!("'{field}' should not be null"))
}

pub fn length(field: &str, min: usize, max: usize) -> Error {
    Error::new(format!("'{field}' must be between {min} and {max} characters"))
}

/// Required text trimmed to `min..=max` characters.
pub fn required_text(field: &str, value: &str, min: usize, max: usize) -> Option<Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(blank(field));
    }

    if !trimmed.validate_length(Some(min as u64), Some(max as u64), None) {
        return Some(length(field, min, max));
    }
    None
}

/// Optional text of at most `max` characters.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Option<Error> {
    match value {
        Some(text) if !text.trim().validate_length(None, Some(max as u64), None) => {
            Some(length(field, 0, max))
        }
        _ => None,
    }
}

/// A required reference to another aggregate.
pub fn required_reference<I: Identifier>(field: &str, id: &I) -> Option<Error> {
    id.is_blank().then(|| null(field))
}

/// `value` must be `now` or later.
pub fn not_before_now(field: &str, value: DateTime<Utc>, now: DateTime<Utc>) -> Option<Error> {
    (value < now).then(|| Error::new(format!("'{field}' should not be before now")))
}
