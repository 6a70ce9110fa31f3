//! ledci-docs - Doxygen documentation publishing
//!
//! Steps, in order:
//! - Resolve the version from `RELEASE_TAG`, the newest numeric git tag, or HEAD
//! - Install Doxygen (zip on Windows, tarball elsewhere) and the awesome-css theme
//! - Stamp `PROJECT_NUMBER` into the Doxyfile
//! - Run Doxygen from the docs directory

pub mod config;
pub mod doxyfile;
pub mod error;
pub mod publisher;
pub mod toolchain;
pub mod version;

pub use config::{DocsConfig, Platform};
pub use doxyfile::{has_project_number, patch_project_number, update_doxyfile};
pub use error::DocsError;
pub use publisher::{generate_docs, DocsPublisher, PublishReport};
pub use toolchain::{install_doxygen, install_theme};
pub use version::{compare_versions, git_info, latest_version_tag, resolve_version, VersionInfo};

/// Result type for docs operations
pub type Result<T> = std::result::Result<T, DocsError>;
