//! Validation failures for incoming requests.
//!
//! The `Display` text of each variant is the human-readable message returned
//! to the caller, so keep it short and user-facing.

use thiserror::Error;

use crate::types::EmailError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was missing or blank.
    #[error("{0} is required.")]
    Required(&'static str),

    #[error("Product price must be greater than 0.")]
    NonPositivePrice,

    #[error("Stock quantity cannot be negative.")]
    NegativeStock,

    #[error("Stock quantity is too large.")]
    StockTooLarge,

    #[error("Category does not exist.")]
    UnknownCategory,

    #[error("Unknown {field}: {value}")]
    UnknownVariant { field: &'static str, value: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{field} must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },
}

/// Trim `value` and fail with [`ValidationError::Required`] when nothing is left.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] naming `field`.
pub fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed)
    }
}

/// Trim an optional field, mapping blank input to `None`.
#[must_use]
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Enforce a character limit matching the column width.
///
/// # Errors
///
/// Returns [`ValidationError::TooLong`] when `value` exceeds `max` characters.
pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("Name", "  Rose "), Ok("Rose"));
        assert_eq!(
            required("Name", " \t"),
            Err(ValidationError::Required("Name"))
        );
        assert_eq!(
            ValidationError::Required("Name").to_string(),
            "Name is required."
        );
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(None), None);
        assert_eq!(optional(Some(" hi ")), Some("hi".to_string()));
    }

    #[test]
    fn test_max_len_counts_chars() {
        assert!(max_len("Name", "ééé", 3).is_ok());
        assert!(max_len("Name", "éééé", 3).is_err());
    }
}
