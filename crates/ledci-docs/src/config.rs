//! Docs publishing configuration.

use serde::Serialize;
use std::path::PathBuf;

pub const DOXYGEN_VERSION: &str = "1.11.0";
pub const DOXYGEN_AWESOME_VERSION: &str = "2.3.3";
pub const DOXYGEN_CSS_REPO: &str = "https://github.com/jothepro/doxygen-awesome-css";
pub const DOXYGEN_DOWNLOAD_BASE: &str = "https://www.doxygen.nl/files";

/// Directory under the docs dir that holds the theme checkout.
pub const THEME_DIR_NAME: &str = "doxygen-awesome-css";

/// How Doxygen gets installed on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Zip archive; the executable is searched for after extraction.
    Windows,
    /// Tarball; the executable path is derived from the archive layout.
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Settings for the docs pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    pub doxygen_version: String,
    pub theme_version: String,
    pub theme_repo: String,

    /// Directory holding the Doxyfile; Doxygen runs from here.
    pub docs_dir: PathBuf,
    pub doxyfile_name: String,
    pub html_dir: PathBuf,

    /// Where Doxygen archives are downloaded and unpacked.
    pub tool_dir: PathBuf,

    /// Repository queried for tags and SHAs.
    pub repo_dir: PathBuf,

    /// Explicit release tag; wins over git tags.
    pub release_tag: Option<String>,

    pub platform: Platform,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            doxygen_version: DOXYGEN_VERSION.to_string(),
            theme_version: DOXYGEN_AWESOME_VERSION.to_string(),
            theme_repo: DOXYGEN_CSS_REPO.to_string(),
            docs_dir: PathBuf::from("docs"),
            doxyfile_name: "Doxyfile".to_string(),
            html_dir: PathBuf::from("docs/html"),
            tool_dir: std::env::temp_dir(),
            repo_dir: PathBuf::from("."),
            release_tag: None,
            platform: Platform::current(),
        }
    }
}

impl DocsConfig {
    /// Set the release tag; blank values count as unset.
    pub fn with_release_tag(mut self, tag: Option<String>) -> Self {
        self.release_tag = tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    pub fn doxyfile_path(&self) -> PathBuf {
        self.docs_dir.join(&self.doxyfile_name)
    }

    pub fn theme_dir(&self) -> PathBuf {
        self.docs_dir.join(THEME_DIR_NAME)
    }

    pub fn windows_archive_url(&self) -> String {
        format!(
            "{DOXYGEN_DOWNLOAD_BASE}/doxygen-{}.windows.x64.bin.zip",
            self.doxygen_version
        )
    }

    pub fn unix_archive_name(&self) -> String {
        format!("doxygen-{}.linux.bin.tar.gz", self.doxygen_version)
    }

    pub fn unix_archive_url(&self) -> String {
        format!("{DOXYGEN_DOWNLOAD_BASE}/{}", self.unix_archive_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = DocsConfig::default();
        assert_eq!(config.doxyfile_path(), PathBuf::from("docs/Doxyfile"));
        assert_eq!(config.theme_dir(), PathBuf::from("docs/doxygen-awesome-css"));
        assert_eq!(config.html_dir, PathBuf::from("docs/html"));
    }

    #[test]
    fn test_archive_urls() {
        let config = DocsConfig::default();
        assert_eq!(
            config.windows_archive_url(),
            "https://www.doxygen.nl/files/doxygen-1.11.0.windows.x64.bin.zip"
        );
        assert_eq!(
            config.unix_archive_url(),
            "https://www.doxygen.nl/files/doxygen-1.11.0.linux.bin.tar.gz"
        );
    }

    #[test]
    fn test_blank_release_tag_is_unset() {
        let config = DocsConfig::default().with_release_tag(Some("  ".to_string()));
        assert!(config.release_tag.is_none());

        let config = config.with_release_tag(Some("3.10.0".to_string()));
        assert_eq!(config.release_tag.as_deref(), Some("3.10.0"));
    }

    #[test]
    fn test_current_platform() {
        let expected = if cfg!(windows) { Platform::Windows } else { Platform::Unix };
        assert_eq!(Platform::current(), expected);
    }
}
