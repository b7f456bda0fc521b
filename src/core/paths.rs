use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base compnamer config directory (~/.config/compnamer/, %APPDATA%\compnamer on Windows)
pub fn compnamer() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("compnamer"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("compnamer"))
    }
}

/// Global compnamer.json config file path
pub fn compnamer_json() -> Result<PathBuf> {
    Ok(compnamer()?.join("compnamer.json"))
}

/// Expand a leading `~` in a user-supplied path argument.
pub fn expand(raw: &str) -> String {
    shellexpand::tilde(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_in_config_dir() {
        let dir = compnamer().unwrap();
        let file = compnamer_json().unwrap();
        assert_eq!(file.parent().unwrap(), dir.as_path());
        assert!(file.ends_with("compnamer.json"));
    }

    #[test]
    fn expand_leaves_plain_paths_alone() {
        assert_eq!(expand("/jobs/show/sh010"), "/jobs/show/sh010");
        assert_eq!(expand("jobs/~/x"), "jobs/~/x");
    }

    #[test]
    fn expand_replaces_leading_tilde() {
        let expanded = expand("~/jobs");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/jobs"));
    }
}
