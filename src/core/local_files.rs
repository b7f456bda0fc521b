use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Entry returned from directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl Entry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    /// Final path component, if it is valid UTF-8.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// Read-only file system queries used by naming.
pub trait FileSystem {
    fn read(&self, path: &Path) -> Result<String>;
    /// Non-recursive listing. A missing or unreadable directory is an error.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::internal_io(
                    format!("File not found: {}", path.display()),
                    Some("read file".to_string()),
                )
            } else {
                Error::internal_io(e.to_string(), Some("read file".to_string()))
            }
        })
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let context = Some(format!("list directory {}", dir.display()));

        let entries = fs::read_dir(dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::internal_io(format!("Directory not found: {}", dir.display()), context.clone())
            } else {
                Error::internal_io(e.to_string(), context.clone())
            }
        })?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::internal_io(e.to_string(), context.clone()))?;
            let path = entry.path();
            let is_dir = path.is_dir();
            result.push(Entry { path, is_dir });
        }

        Ok(result)
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    #[test]
    fn test_local_fs_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("templates.json");
        fs::write(&path, "[]").unwrap();

        assert_eq!(local().read(&path).unwrap(), "[]");
    }

    #[test]
    fn test_local_fs_read_missing() {
        let dir = tempdir().unwrap();
        let err = local().read(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.details["error"]
            .as_str()
            .unwrap()
            .starts_with("File not found"));
    }

    #[test]
    fn test_local_fs_list() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sh010_v001.nk"), "").unwrap();
        fs::create_dir(dir.path().join("renders")).unwrap();

        let mut entries = local().list(dir.path()).unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name(), Some("renders"));
        assert!(entries[0].is_dir);
        assert_eq!(entries[1].file_name(), Some("sh010_v001.nk"));
        assert!(!entries[1].is_dir);
    }

    #[test]
    fn test_local_fs_list_missing_dir_is_error() {
        let dir = tempdir().unwrap();
        let err = local().list(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalIoError);
    }
}
