//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so all limits are
//! applied here, before any state mutation.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Attendee names on a cover
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / proof-of-payment paths
pub const MAX_URL_LEN: usize = 2048;

/// Covers a single purchase request may contain
pub const MAX_COVERS_PER_REQUEST: i64 = 15;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate the attendee name list of a purchase request.
///
/// `names.len() == quantity`, every name non-empty after trimming. Runs
/// before any row is written.
pub fn validate_cover_names(names: &[String], quantity: i64) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::validation(format!(
            "Quantity must be at least 1, got {quantity}"
        )));
    }
    if quantity > MAX_COVERS_PER_REQUEST {
        return Err(AppError::validation(format!(
            "Quantity must be at most {MAX_COVERS_PER_REQUEST}, got {quantity}"
        )));
    }
    if names.len() as i64 != quantity {
        return Err(AppError::validation(format!(
            "Expected {quantity} names, got {}",
            names.len()
        )));
    }
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(AppError::validation(format!("Name {} must not be empty", i + 1)));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(AppError::validation(format!(
                "Name {} is too long ({} chars, max {MAX_NAME_LEN})",
                i + 1,
                name.len()
            )));
        }
    }
    Ok(())
}
