//! Input validation helpers
//!
//! Text length limits for the free-text fields an order carries. SQLite
//! TEXT has no built-in length enforcement.

use crate::orders::OrderError;

/// Customer name
pub const MAX_NAME_LEN: usize = 200;

/// Order and line item notes
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers, discount card ids
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), OrderError> {
    if value.trim().is_empty() {
        return Err(OrderError::Validation(format!("{field} is required")));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), OrderError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), OrderError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}
