//! Next-version lookup from a directory listing.
//!
//! Only the `{version}` token varies during a scan: every other token is
//! substituted from the mapping and matched literally. Matching is anchored at
//! the start of the file name only, so trailing text such as `_username` or
//! `.nk` is allowed.

use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};
use crate::naming::VERSION_TOKEN;
use crate::pattern::{build, CompiledPattern, Piece, Tokens};
use std::collections::BTreeSet;
use std::path::Path;

/// ASCII digits; `\d` would also accept other Unicode digits.
const VERSION_EXPRESSION: &str = "[0-9]+";

/// Matcher that captures only the version of names built from `pattern`.
pub fn version_matcher(pattern: &str, tokens: &Tokens) -> Result<CompiledPattern> {
    let mut has_version = false;

    let compiled = build(pattern, true, false, |name, _| {
        if name == VERSION_TOKEN {
            has_version = true;
            return Ok(Piece::Capture(VERSION_EXPRESSION.to_string()));
        }
        tokens
            .get(name)
            .map(|value| Piece::Literal(value.clone()))
            .ok_or_else(|| Error::name_missing_token(name, pattern))
    })?;

    if !has_version {
        return Err(Error::validation_invalid_argument(
            "pattern",
            format!("Pattern '{}' has no {{{}}} token", pattern, VERSION_TOKEN),
            None,
            None,
        ));
    }

    Ok(compiled)
}

/// Versions already present in `directory` for `pattern`.
///
/// Directories are skipped, as are names whose version does not fit in a `u32`.
pub fn existing_versions<F: FileSystem + ?Sized>(
    fs: &F,
    directory: &Path,
    pattern: &str,
    tokens: &Tokens,
) -> Result<BTreeSet<u32>> {
    let matcher = version_matcher(pattern, tokens)?;
    let mut versions = BTreeSet::new();

    for entry in fs.list(directory)? {
        if entry.is_dir {
            continue;
        }
        let Some(name) = entry.file_name() else {
            continue;
        };
        let version = matcher
            .captures(name)
            .and_then(|captured| captured.get(VERSION_TOKEN).cloned())
            .and_then(|raw| raw.parse::<u32>().ok());
        if let Some(version) = version {
            versions.insert(version);
        }
    }

    Ok(versions)
}

/// One past the highest existing version, or `1` when there is none.
pub fn fetch_next_version<F: FileSystem + ?Sized>(
    fs: &F,
    directory: &Path,
    pattern: &str,
    tokens: &Tokens,
) -> Result<u32> {
    let versions = existing_versions(fs, directory, pattern, tokens)?;
    Ok(versions.last().map_or(1, |max| max.saturating_add(1)))
}

/// [`fetch_next_version`] against the local filesystem.
pub fn next_version(directory: &Path, pattern: &str, tokens: &Tokens) -> Result<u32> {
    fetch_next_version(&local_files::local(), directory, pattern, tokens)
}

/// Zero-padded version string, e.g. `3` with width 3 is `003`.
pub fn format_version(version: u32, width: usize) -> String {
    format!("{:0width$}", version, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::local_files::Entry;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const PATTERN: &str = "{project}_{shot}_{description}_v{version}";

    fn tokens() -> Tokens {
        [
            ("project", "project2"),
            ("shot", "sh002"),
            ("description", "comp"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    struct FakeFs(Vec<Entry>);

    impl FileSystem for FakeFs {
        fn read(&self, path: &Path) -> Result<String> {
            Err(Error::internal_io("not readable", Some(path.display().to_string())))
        }

        fn list(&self, _dir: &Path) -> Result<Vec<Entry>> {
            Ok(self.0.clone())
        }
    }

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), "").unwrap();
    }

    #[test]
    fn empty_directory_starts_at_one() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_version(dir.path(), PATTERN, &tokens()).unwrap(), 1);
    }

    #[test]
    fn single_existing_version() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "project2_sh002_comp_v001.nk");
        assert_eq!(next_version(dir.path(), PATTERN, &tokens()).unwrap(), 2);
    }

    #[test]
    fn ignores_other_shots_directories_and_junk() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "project2_sh002_comp_v002_ana.nk");
        touch(&dir, "project2_sh003_comp_v009.nk");
        touch(&dir, "project2_sh002_roto_v007.nk");
        touch(&dir, "project2_sh002_comp_vXYZ.nk");
        touch(&dir, "notes.txt");
        fs::create_dir(dir.path().join("project2_sh002_comp_v050")).unwrap();

        assert_eq!(next_version(dir.path(), PATTERN, &tokens()).unwrap(), 3);
    }

    #[test]
    fn leading_zeros_and_gaps() {
        let fs = FakeFs(vec![
            Entry::file("/x/project2_sh002_comp_v0010.nk"),
            Entry::file("/x/project2_sh002_comp_v002.nk"),
        ]);
        let versions = existing_versions(&fs, Path::new("/x"), PATTERN, &tokens()).unwrap();
        assert_eq!(versions.into_iter().collect::<Vec<_>>(), vec![2, 10]);
        assert_eq!(
            fetch_next_version(&fs, Path::new("/x"), PATTERN, &tokens()).unwrap(),
            11
        );
    }

    #[test]
    fn overflowing_version_is_unmatched() {
        let fs = FakeFs(vec![
            Entry::file("/x/project2_sh002_comp_v99999999999.nk"),
            Entry::file("/x/project2_sh002_comp_v004.nk"),
        ]);
        assert_eq!(
            fetch_next_version(&fs, Path::new("/x"), PATTERN, &tokens()).unwrap(),
            5
        );
    }

    #[test]
    fn token_values_match_literally() {
        let mut mapping = tokens();
        mapping.insert("description".to_string(), "comp.v2".to_string());
        let fs = FakeFs(vec![
            Entry::file(PathBuf::from("/x/project2_sh002_compXv2_v004.nk")),
            Entry::file(PathBuf::from("/x/project2_sh002_comp.v2_v001.nk")),
        ]);
        assert_eq!(
            fetch_next_version(&fs, Path::new("/x"), PATTERN, &mapping).unwrap(),
            2
        );
    }

    #[test]
    fn repeated_scans_agree() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "project2_sh002_comp_v004.nk");
        let first = next_version(dir.path(), PATTERN, &tokens()).unwrap();
        let second = next_version(dir.path(), PATTERN, &tokens()).unwrap();
        assert_eq!(first, second);

        touch(&dir, "project2_sh002_comp_v005.nk");
        assert_eq!(next_version(dir.path(), PATTERN, &tokens()).unwrap(), 6);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = next_version(&dir.path().join("missing"), PATTERN, &tokens()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalIoError);
    }

    #[test]
    fn missing_token_and_missing_version_token() {
        let err = version_matcher(PATTERN, &Tokens::new()).unwrap_err();
        assert_eq!(err.missing_token(), Some("project"));

        let err = version_matcher("{project}_final", &tokens()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
    }

    #[test]
    fn format_pads_to_width() {
        assert_eq!(format_version(3, 3), "003");
        assert_eq!(format_version(1234, 3), "1234");
        assert_eq!(format_version(7, 0), "7");
    }
}
