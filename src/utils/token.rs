//! Token name and `key=value` argument helpers.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// ASCII identifier: a letter or underscore followed by letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a single `key=value` assignment. The value may be empty and may contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(Error::validation_invalid_argument(
            "token",
            format!("Expected key=value, got '{}'", raw),
            None,
            None,
        ));
    };

    let key = key.trim();
    if !is_identifier(key) {
        return Err(Error::validation_invalid_argument(
            "token",
            format!("Token name '{}' is not a valid identifier", key),
            None,
            None,
        ));
    }

    Ok((key.to_string(), value.to_string()))
}

/// Parse a list of `key=value` assignments. Later assignments overwrite earlier ones.
pub fn parse_assignments(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for item in raw {
        let (key, value) = parse_assignment(item)?;
        map.insert(key, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("shot"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("shot2"));
        assert!(!is_identifier("2shot"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("my shot"));
        assert!(!is_identifier("shot-name"));
    }

    #[test]
    fn assignment_keeps_equals_in_value() {
        let (k, v) = parse_assignment("description=a=b").unwrap();
        assert_eq!(k, "description");
        assert_eq!(v, "a=b");
    }

    #[test]
    fn assignment_without_equals_fails() {
        assert!(parse_assignment("shot").is_err());
        assert!(parse_assignment("bad name=1").is_err());
    }

    #[test]
    fn later_assignments_win() {
        let map =
            parse_assignments(&["shot=sh010".to_string(), "shot=sh020".to_string()]).unwrap();
        assert_eq!(map["shot"], "sh020");
    }
}
