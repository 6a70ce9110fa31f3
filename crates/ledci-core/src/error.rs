//! Error taxonomy for external command execution.

/// Errors raised while driving external tools.
#[derive(Debug, thiserror::Error)]
pub enum CiError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` failed with exit code {exit_code}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("git error: {0}")]
    Git(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledci-core operations.
pub type Result<T> = std::result::Result<T, CiError>;
