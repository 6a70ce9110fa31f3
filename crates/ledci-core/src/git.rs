//! Git queries used to stamp documentation with a version.

use std::path::Path;

use crate::error::{CiError, Result};
use crate::process::{run_command, CommandSpec};

/// List all tags in the repository.
///
/// Returns `None` when `git tag` fails (e.g. not a repository); callers treat
/// that as "no tags".
pub async fn list_tags(repo_dir: &Path) -> Result<Option<Vec<String>>> {
    let spec = CommandSpec::new("git", ["tag"])
        .current_dir(repo_dir)
        .unchecked();
    let output = run_command(&spec).await?;
    if !output.success {
        return Ok(None);
    }
    Ok(Some(
        output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}

/// Abbreviated HEAD commit SHA (`git rev-parse --short HEAD`).
pub async fn short_head_sha(repo_dir: &Path) -> Result<String> {
    rev_parse(repo_dir, &["rev-parse", "--short", "HEAD"]).await
}

/// Full HEAD commit SHA (`git rev-parse HEAD`).
pub async fn head_sha(repo_dir: &Path) -> Result<String> {
    rev_parse(repo_dir, &["rev-parse", "HEAD"]).await
}

async fn rev_parse(repo_dir: &Path, args: &[&str]) -> Result<String> {
    let spec = CommandSpec::new("git", args.iter().copied()).current_dir(repo_dir);
    let output = run_command(&spec).await?;
    let sha = output.stdout.trim().to_string();
    if sha.is_empty() {
        return Err(CiError::Git(format!("git {} returned empty output", args.join(" "))));
    }
    Ok(sha)
}
