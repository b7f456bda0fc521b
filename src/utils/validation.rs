//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Validating non-empty strings
//! - Detecting duplicate identifiers in sibling lists

use crate::error::{Error, Result};
use std::collections::HashSet;

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Require every id in `ids` to appear once.
///
/// The error names the first repeated id.
pub fn require_unique<'a, I>(ids: I, field: &str) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::validation_invalid_argument(
                field,
                format!("Duplicate id '{}'", id),
                Some(id.to_string()),
                None,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_empty_trims_whitespace() {
        let result = require_non_empty("  hello  ", "field", "msg");
        assert_eq!(result.unwrap(), "hello");
    }

    #[test]
    fn require_non_empty_fails_for_whitespace_only() {
        let result = require_non_empty("   ", "field", "Cannot be empty");
        assert!(result.is_err());
    }

    #[test]
    fn require_unique_accepts_distinct_ids() {
        assert!(require_unique(["comp", "precomp", "roto"], "id").is_ok());
    }

    #[test]
    fn require_unique_names_first_duplicate() {
        let err = require_unique(["comp", "roto", "comp", "roto"], "id").unwrap_err();
        assert_eq!(err.details["id"], "comp");
    }
}
