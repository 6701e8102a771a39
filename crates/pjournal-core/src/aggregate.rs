//! Ranked merge of commit, journal and thinking records.
//!
//! Sources are processed from highest to lowest priority (thinking, journal,
//! commit). The first record seen for a commit hash wins; records without a
//! hash are always kept. Two hashes name the same commit when one is a
//! prefix of the other, so a journal's short `commit:` reference matches the
//! full hash from history.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::history::ProjectInfo;
use crate::record::{CommitRecord, JournalRecord, PromptRecord, Source, ThinkingRecord};

/// Format generation of the aggregate file.
pub const OUTPUT_VERSION: &str = "4.0";

/// Length of the abbreviated hash written into generated journals.
pub const SHORT_HASH_LEN: usize = 7;

/// Per-source counts.
///
/// Commit counts are taken before de-duplication and journal/thinking counts
/// after it, so `commits + journals + thinking_logs` can exceed `total`.
/// `total` is the exact length of the merged list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractStats {
    pub total_commits: usize,
    pub prompt_commits: usize,
    pub v4_commits: usize,
    pub legacy_commits: usize,
    pub journals: usize,
    pub thinking_logs: usize,
    pub total: usize,
}

/// Merged records plus their counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merged {
    pub stats: ExtractStats,
    pub prompts: Vec<PromptRecord>,
}

/// The persisted aggregate document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateOutput {
    pub version: &'static str,
    pub project: ProjectInfo,
    pub extracted_at: DateTime<Utc>,
    pub stats: ExtractStats,
    pub prompts: Vec<PromptRecord>,
}

impl AggregateOutput {
    #[must_use]
    pub fn new(project: ProjectInfo, extracted_at: DateTime<Utc>, merged: Merged) -> Self {
        Self {
            version: OUTPUT_VERSION,
            project,
            extracted_at,
            stats: merged.stats,
            prompts: merged.prompts,
        }
    }
}

/// Abbreviated, lowercase form of a commit hash.
#[must_use]
pub fn short_hash(hash: &str) -> String {
    normalize_hash(hash).chars().take(SHORT_HASH_LEN).collect()
}

fn normalize_hash(hash: &str) -> String {
    hash.trim().to_ascii_lowercase()
}

/// Whether two hashes, either possibly abbreviated, name the same commit.
#[must_use]
pub fn same_commit(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_hash(a), normalize_hash(b));
    !a.is_empty() && !b.is_empty() && (a.starts_with(&b) || b.starts_with(&a))
}

/// Keep the highest-priority record per hash, in input priority order.
///
/// `records` must already be ordered from highest to lowest priority.
#[must_use]
pub fn dedup(records: impl IntoIterator<Item = PromptRecord>) -> Vec<PromptRecord> {
    let mut seen: Vec<String> = Vec::new();
    records
        .into_iter()
        .filter(|record| match record.hash() {
            Some(hash) if seen.iter().any(|s| same_commit(s, hash)) => false,
            Some(hash) => {
                seen.push(hash.to_string());
                true
            }
            None => true,
        })
        .collect()
}

/// Sort newest first; records without a usable date go last.
pub fn sort_by_date_desc(records: &mut [PromptRecord]) {
    // Option orders None before Some, so reversing puts undated records last.
    records.sort_by_key(|record| Reverse(record.timestamp()));
}

/// Merge the three sources into one de-duplicated, date-ordered list.
///
/// `total_commits` is the number of commits scanned before classification.
#[must_use]
pub fn merge(
    total_commits: usize,
    commits: Vec<CommitRecord>,
    journals: Vec<JournalRecord>,
    thinking: Vec<ThinkingRecord>,
) -> Merged {
    let v4_commits = commits
        .iter()
        .filter(|c| c.source == Source::CommitV4)
        .count();
    let prompt_commits = commits.len();

    let ranked = thinking
        .into_iter()
        .map(PromptRecord::Thinking)
        .chain(journals.into_iter().map(PromptRecord::Journal))
        .chain(commits.into_iter().map(PromptRecord::Commit));

    let mut prompts = dedup(ranked);
    sort_by_date_desc(&mut prompts);

    let count = |source: Source| prompts.iter().filter(|p| p.source() == source).count();
    let stats = ExtractStats {
        total_commits,
        prompt_commits,
        v4_commits,
        legacy_commits: prompt_commits - v4_commits,
        journals: count(Source::Journal),
        thinking_logs: count(Source::Thinking),
        total: prompts.len(),
    };

    Merged { stats, prompts }
}
