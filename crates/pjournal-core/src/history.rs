//! Version-control collaborator interface.
//!
//! The engine never runs git itself. A [`HistoryProvider`] hands it raw
//! commits and the remote URL; this module also owns the pure parsing of the
//! batched `git log` output and of GitHub-style remote URLs.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;

/// Start-of-record marker in the batched `git log` format.
pub const COMMIT_START: &str = "COMMIT_START";
/// End-of-record marker in the batched `git log` format.
pub const COMMIT_END: &str = "COMMIT_END";

/// `git log --format` string producing `{hash, ISO date, body}` blocks.
pub const LOG_FORMAT: &str = "COMMIT_START%n%H%n%aI%n%B%nCOMMIT_END";

/// Placeholder used when the remote URL cannot be parsed.
pub const UNKNOWN: &str = "unknown";

static GITHUB_REMOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com[:/]([^/]+)/([^/.]+)").expect("valid regex"));

/// A commit as supplied by version control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub hash: String,
    /// Authored date, ISO 8601.
    pub date: String,
    pub message: String,
}

/// Source of commit history and repository metadata.
pub trait HistoryProvider {
    /// The most recent `limit` commits.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PjError::Git`] when history is unavailable (no
    /// repository, no commits).
    fn recent_commits(&self, limit: usize) -> Result<Vec<RawCommit>>;

    /// The configured remote URL, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PjError::Git`] when the repository config cannot be read.
    fn remote_url(&self) -> Result<Option<String>>;
}

/// Repository identity for the aggregate output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub owner: String,
    pub url: String,
}

impl ProjectInfo {
    /// Identity derived from a remote URL; `unknown` placeholders when absent
    /// or not GitHub-shaped.
    #[must_use]
    pub fn from_remote(url: Option<&str>) -> Self {
        let url = url.map(str::trim).unwrap_or_default();
        let (owner, name) = GITHUB_REMOTE
            .captures(url)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()));

        Self {
            name,
            owner,
            url: url.to_string(),
        }
    }
}

/// Parse the output of `git log --format=LOG_FORMAT`.
///
/// Blocks without a hash line are dropped.
#[must_use]
pub fn parse_log(output: &str) -> Vec<RawCommit> {
    output
        .split(COMMIT_START)
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| {
            let block = block.trim();
            let block = block.strip_suffix(COMMIT_END).unwrap_or(block);
            let mut lines = block.lines();
            let hash = lines.next()?.trim().to_string();
            if hash.is_empty() {
                return None;
            }
            let date = lines.next().unwrap_or_default().trim().to_string();
            let message = lines.collect::<Vec<_>>().join("\n").trim().to_string();
            Some(RawCommit {
                hash,
                date,
                message,
            })
        })
        .collect()
}
