//! Error types for ledci-docs

use ledci_core::CiError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while publishing docs
#[derive(Error, Debug)]
pub enum DocsError {
    /// An expected file is missing after extraction
    #[error("{what} not found under {}", .root.display())]
    NotFound { what: String, root: PathBuf },

    /// Download failed (network error or non-2xx status)
    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),

    /// Zip archive could not be read or extracted
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// External command failed
    #[error(transparent)]
    Command(#[from] CiError),

    /// Blocking extraction task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for DocsError {
    fn from(err: tokio::task::JoinError) -> Self {
        DocsError::Task(err.to_string())
    }
}
