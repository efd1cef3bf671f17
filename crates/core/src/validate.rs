//! Field checks shared by reference-data constructors.

use crate::error::{DomainError, DomainResult};

/// Maximum length of a short display name (units, items, groups, storages).
pub const MAX_NAME_LEN: usize = 50;

/// Maximum length of an item's full name.
pub const MAX_FULL_NAME_LEN: usize = 255;

/// Trim `value` and require it to be non-empty and at most `max_len` characters.
///
/// `field` only feeds the error message.
pub fn text(field: &str, value: &str, max_len: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Shorthand for [`text`] with [`MAX_NAME_LEN`].
pub fn name(field: &str, value: &str) -> DomainResult<String> {
    text(field, value, MAX_NAME_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(name("name", "  Sugar ").unwrap(), "Sugar");
    }

    #[test]
    fn rejects_blank_values() {
        let err = name("name", "   ").unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn length_is_counted_in_characters() {
        // Cyrillic letters are two bytes each in UTF-8.
        let fifty = "г".repeat(MAX_NAME_LEN);
        assert!(name("name", &fifty).is_ok());

        let err = name("name", &format!("{fifty}г")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("at most 50")));
    }
}
