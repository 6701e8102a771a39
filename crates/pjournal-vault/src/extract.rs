//! The extract pipeline: history + journals + thinking logs into one file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use pjournal_core::aggregate::{merge, AggregateOutput};
use pjournal_core::error::{PjError, Result};
use pjournal_core::{commit, Config, HistoryProvider, ProjectInfo};

use crate::store::JournalStore;

/// Gather every source and merge them.
///
/// Missing history or remote is logged and treated as empty; this never fails.
pub fn collect<H: HistoryProvider>(
    history: &H,
    store: &JournalStore,
    config: &Config,
) -> AggregateOutput {
    let commits = history
        .recent_commits(config.history_limit)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "commit history unavailable");
            Vec::new()
        });
    let remote = history.remote_url().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "remote url unavailable");
        None
    });

    let total_commits = commits.len();
    let records: Vec<_> = commits.iter().filter_map(commit::build).collect();
    let journals = store.journals();
    let thinking = store.thinking_logs();
    tracing::info!(
        commits = total_commits,
        classified = records.len(),
        journals = journals.len(),
        thinking = thinking.len(),
        "sources loaded"
    );

    let merged = merge(total_commits, records, journals, thinking);
    AggregateOutput::new(ProjectInfo::from_remote(remote.as_deref()), Utc::now(), merged)
}

/// Run the pipeline and overwrite `output` with pretty-printed JSON.
///
/// # Errors
///
/// Returns [`PjError::Serialization`] or [`PjError::FileAccess`] if the
/// output file cannot be produced.
pub fn run<H: HistoryProvider>(
    history: &H,
    store: &JournalStore,
    config: &Config,
    output: &Path,
) -> Result<AggregateOutput> {
    let aggregate = collect(history, store, config);
    write_json(output, &aggregate)?;
    tracing::info!(path = %output.display(), total = aggregate.stats.total, "aggregate written");
    Ok(aggregate)
}

/// Write `value` as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`PjError::Serialization`] or [`PjError::FileAccess`].
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|e| PjError::Serialization(e.to_string()))?;
    json.push('\n');
    fs::write(path, json).map_err(|source| PjError::FileAccess {
        path: path.display().to_string(),
        source,
    })
}

/// Output path from the config, relative to `root`.
#[must_use]
pub fn default_output(root: &Path, config: &Config) -> PathBuf {
    root.join(&config.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pjournal_core::{PromptRecord, RawCommit, Source};
    use tempfile::TempDir;

    struct FakeHistory {
        commits: Option<Vec<RawCommit>>,
        remote: Option<String>,
    }

    impl HistoryProvider for FakeHistory {
        fn recent_commits(&self, limit: usize) -> Result<Vec<RawCommit>> {
            match &self.commits {
                Some(commits) => Ok(commits.iter().take(limit).cloned().collect()),
                None => Err(PjError::Git("not a git repository".to_string())),
            }
        }

        fn remote_url(&self) -> Result<Option<String>> {
            Ok(self.remote.clone())
        }
    }

    fn raw(hash: &str, date: &str, message: &str) -> RawCommit {
        RawCommit {
            hash: hash.to_string(),
            date: date.to_string(),
            message: message.to_string(),
        }
    }

    const V4: &str = "feat: add cache\n## What\nLRU\n## Why\nPerf\n## Impact\nNone\nCo-Authored-By: x <x@example.com>";

    #[test]
    fn no_repository_yields_empty_history() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let store = JournalStore::new(dir.path(), &config);
        let history = FakeHistory {
            commits: None,
            remote: None,
        };

        let output = dir.path().join("prompts.json");
        let aggregate = run(&history, &store, &config, &output).unwrap();
        assert_eq!(aggregate.stats.total, 0);
        assert_eq!(aggregate.project.name, "unknown");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["version"], "4.0");
        assert!(json["prompts"].as_array().unwrap().is_empty());
    }

    #[test]
    fn merges_history_with_journals() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            history_limit: 2,
            ..Config::default()
        };
        let store = JournalStore::new(dir.path(), &config);
        fs::create_dir_all(store.journal_dir()).unwrap();
        fs::write(
            store.journal_dir().join("2025-01-02-cache.md"),
            "---\ndate: 2025-01-02\ncommit: aaaaaaa\n---\n# Cache\n",
        )
        .unwrap();

        let history = FakeHistory {
            commits: Some(vec![
                raw("aaaaaaa111", "2025-01-02T10:00:00+09:00", V4),
                raw("bbbbbbb222", "2025-01-01T10:00:00+09:00", V4),
                raw("ccccccc333", "2024-12-31T10:00:00+09:00", V4),
            ]),
            remote: Some("https://github.com/acme/widgets.git".to_string()),
        };

        let aggregate = collect(&history, &store, &config);
        assert_eq!(aggregate.project.owner, "acme");
        assert_eq!(aggregate.stats.total_commits, 2);
        assert_eq!(aggregate.stats.v4_commits, 2);
        assert_eq!(aggregate.stats.journals, 1);
        assert_eq!(aggregate.stats.total, 2);

        let sources: Vec<_> = aggregate.prompts.iter().map(PromptRecord::source).collect();
        assert_eq!(sources, vec![Source::Journal, Source::CommitV4]);
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let store = JournalStore::new(dir.path(), &config);
        let history = FakeHistory {
            commits: Some(Vec::new()),
            remote: None,
        };

        let output = dir.path().join("missing-dir").join("prompts.json");
        let err = run(&history, &store, &config, &output).unwrap_err();
        assert!(matches!(err, PjError::FileAccess { .. }));
    }
}
