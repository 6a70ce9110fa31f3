//! `PROJECT_NUMBER` stamping for the Doxyfile.

use crate::Result;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::path::Path;
use tracing::{info, warn};

static PROJECT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^PROJECT_NUMBER\s*=.*").expect("Invalid PROJECT_NUMBER regex")
});

/// Replace the `PROJECT_NUMBER` directive with `version`.
///
/// Only lines starting with the key are rewritten. Text without the key comes
/// back unchanged. `version` is inserted literally (no `$` expansion).
pub fn patch_project_number(contents: &str, version: &str) -> String {
    let line = format!("PROJECT_NUMBER = {version}");
    PROJECT_NUMBER_REGEX
        .replace_all(contents, NoExpand(&line))
        .into_owned()
}

/// Whether `contents` has a `PROJECT_NUMBER` directive to patch.
pub fn has_project_number(contents: &str) -> bool {
    PROJECT_NUMBER_REGEX.is_match(contents)
}

/// Patch the Doxyfile at `path` in place.
///
/// Returns whether a `PROJECT_NUMBER` line was found. A missing key is not an
/// error; the file is left as it was.
pub async fn update_doxyfile(path: &Path, version: &str) -> Result<bool> {
    info!(path = %path.display(), version = %version, "Updating Doxyfile with project number");
    let contents = tokio::fs::read_to_string(path).await?;

    if !has_project_number(&contents) {
        warn!(path = %path.display(), "No PROJECT_NUMBER directive found");
        return Ok(false);
    }

    let patched = patch_project_number(&contents, version);
    tokio::fs::write(path, patched).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOXYFILE: &str = "\
# Doxyfile 1.11.0
PROJECT_NAME           = \"FastLED\"
PROJECT_NUMBER         = 3.9.0
PROJECT_BRIEF          = \"LED driver\"
# PROJECT_NUMBER = commented
OUTPUT_DIRECTORY       = .
";

    #[test]
    fn test_patch_replaces_only_the_directive() {
        let patched = patch_project_number(DOXYFILE, "3.10.0");
        let expected =
            DOXYFILE.replace("PROJECT_NUMBER         = 3.9.0", "PROJECT_NUMBER = 3.10.0");
        assert_eq!(patched, expected);
        assert!(patched.contains("# PROJECT_NUMBER = commented"));
    }

    #[test]
    fn test_patch_is_idempotent() {
        let once = patch_project_number(DOXYFILE, "1a2b3c4");
        let twice = patch_project_number(&once, "1a2b3c4");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_has_project_number() {
        assert!(has_project_number(DOXYFILE));
        assert!(!has_project_number("# PROJECT_NUMBER = commented\n"));
    }

    #[test]
    fn test_patch_without_key_is_unchanged() {
        let text = "PROJECT_NAME = \"x\"\nproject_number = 1\n";
        assert_eq!(patch_project_number(text, "2.0"), text);
    }

    #[test]
    fn test_patch_inserts_version_literally() {
        let patched = patch_project_number("PROJECT_NUMBER = old\n", "$1 ${x}");
        assert_eq!(patched, "PROJECT_NUMBER = $1 ${x}\n");
    }

    #[test]
    fn test_patch_empty_value() {
        let patched = patch_project_number("PROJECT_NUMBER=\nNEXT = 1\n", "3.9.2");
        assert_eq!(patched, "PROJECT_NUMBER = 3.9.2\nNEXT = 1\n");
    }

    #[tokio::test]
    async fn test_update_doxyfile_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Doxyfile");
        std::fs::write(&path, DOXYFILE).unwrap();

        assert!(update_doxyfile(&path, "3.10.0").await.unwrap());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("PROJECT_NUMBER = 3.10.0\n"));
        assert!(!contents.contains("3.9.0\n"));
    }

    #[tokio::test]
    async fn test_update_doxyfile_without_key_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Doxyfile");
        std::fs::write(&path, "PROJECT_NAME = \"x\"\n").unwrap();

        assert!(!update_doxyfile(&path, "3.10.0").await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "PROJECT_NAME = \"x\"\n");
    }

    #[tokio::test]
    async fn test_update_missing_doxyfile_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(update_doxyfile(&dir.path().join("Doxyfile"), "1.0").await.is_err());
    }
}
