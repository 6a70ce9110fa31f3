//! Version resolution from release tags and git history.

use crate::Result;
use ledci_core::git;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

/// Version stamped into the docs, plus a human-readable commit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub project_number: String,
    pub commit_message: String,
}

/// Pick the project number: release tag, then latest tag, then short SHA.
///
/// The commit message appends the full SHA whenever the project number is not
/// the short SHA itself.
pub fn resolve_version(
    release_tag: Option<&str>,
    latest_tag: Option<&str>,
    short_sha: &str,
    full_sha: &str,
) -> VersionInfo {
    let project_number = [release_tag, latest_tag]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(short_sha)
        .to_string();

    let commit_message = if project_number != short_sha {
        format!("{project_number} ({full_sha})")
    } else {
        project_number.clone()
    };

    VersionInfo {
        project_number,
        commit_message,
    }
}

/// Highest tag starting with a digit, by [`compare_versions`].
pub fn latest_version_tag<'a, I>(tags: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .map(str::trim)
        .filter(|tag| tag.starts_with(|c: char| c.is_ascii_digit()))
        .max_by(|a, b| compare_versions(a, b))
        .map(str::to_string)
}

/// Version ordering in the style of `sort -V`.
///
/// Strings are split into alternating non-digit and digit runs. Non-digit runs
/// compare bytewise; digit runs compare numerically, ignoring leading zeros.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());

    while !a.is_empty() || !b.is_empty() {
        let (a_text, a_rest) = split_run(a, |c| !c.is_ascii_digit());
        let (b_text, b_rest) = split_run(b, |c| !c.is_ascii_digit());
        match a_text.cmp(b_text) {
            Ordering::Equal => {}
            other => return other,
        }

        let (a_num, a_rest) = split_run(a_rest, |c| c.is_ascii_digit());
        let (b_num, b_rest) = split_run(b_rest, |c| c.is_ascii_digit());
        match compare_numeric(a_num, b_num) {
            Ordering::Equal => {}
            other => return other,
        }

        a = a_rest;
        b = b_rest;
    }

    Ordering::Equal
}

fn split_run(s: &[u8], pred: impl Fn(u8) -> bool) -> (&[u8], &[u8]) {
    let len = s.iter().take_while(|c| pred(**c)).count();
    s.split_at(len)
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let strip = |s: &[u8]| -> usize { s.iter().take_while(|c| **c == b'0').count() };
    let a = &a[strip(a)..];
    let b = &b[strip(b)..];
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Query git in `repo_dir` and resolve the docs version.
///
/// A failing `git tag` counts as "no tags"; the SHA lookups must succeed.
pub async fn git_info(repo_dir: &Path, release_tag: Option<&str>) -> Result<VersionInfo> {
    let tags = git::list_tags(repo_dir).await?.unwrap_or_default();
    let latest_tag = latest_version_tag(tags.iter().map(String::as_str));

    let short_sha = git::short_head_sha(repo_dir).await?;
    let full_sha = git::head_sha(repo_dir).await?;

    let info = resolve_version(release_tag, latest_tag.as_deref(), &short_sha, &full_sha);
    info!(project_number = %info.project_number, "Resolved docs version");
    info!(commit_message = %info.commit_message, "Docs commit message");
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: &str = "1a2b3c4";
    const FULL: &str = "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b";

    #[test]
    fn test_release_tag_wins() {
        let info = resolve_version(Some("3.10.0"), Some("3.9.2"), SHORT, FULL);
        assert_eq!(info.project_number, "3.10.0");
        assert_eq!(info.commit_message, format!("3.10.0 ({FULL})"));
    }

    #[test]
    fn test_latest_tag_without_release_tag() {
        let info = resolve_version(None, Some("3.9.2"), SHORT, FULL);
        assert_eq!(info.project_number, "3.9.2");
        assert_eq!(info.commit_message, format!("3.9.2 ({FULL})"));
    }

    #[test]
    fn test_empty_release_tag_falls_through() {
        let info = resolve_version(Some(""), Some("3.9.2"), SHORT, FULL);
        assert_eq!(info.project_number, "3.9.2");
    }

    #[test]
    fn test_short_sha_fallback() {
        let info = resolve_version(None, None, SHORT, FULL);
        assert_eq!(info.project_number, SHORT);
        assert_eq!(info.commit_message, SHORT);
    }

    #[test]
    fn test_compare_versions_numeric_runs() {
        assert_eq!(compare_versions("3.10.0", "3.9.2"), Ordering::Greater);
        assert_eq!(compare_versions("3.9.2", "3.9.10"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Less);
        assert_eq!(compare_versions("1.01", "1.1"), Ordering::Equal);
        assert_eq!(compare_versions("2.0.0", "2.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("3.9.0-rc1", "3.9.0-rc2"), Ordering::Less);
    }

    #[test]
    fn test_latest_version_tag_filters_non_numeric() {
        let tags = ["v4.0.0", "3.9.2", "3.10.0", "release-9", "3.9.10", ""];
        assert_eq!(latest_version_tag(tags), Some("3.10.0".to_string()));
    }

    #[test]
    fn test_latest_version_tag_none() {
        assert_eq!(latest_version_tag(["v1.0", "nightly"]), None);
        assert_eq!(latest_version_tag(Vec::<&str>::new()), None);
    }
}
