//! Thinking log record building for `.thoughts/*.md` files.
//!
//! Strategy flags come from the `ce_strategies` frontmatter list when it is
//! non-empty, otherwise from `[x] <Strategy>` checkboxes in the body. Failure
//! modes are read from the detection table: a mode counts as detected when
//! its row has anything in the detection column.

use std::collections::BTreeMap;

use crate::frontmatter::{strip_frontmatter, Frontmatter};
use crate::journal::{commit_reference, document_title};
use crate::record::{CeStrategy, FailureMode, Source, ThinkingRecord};

/// Column (0-based, after the mode name) holding the detection mark.
const DETECTION_COLUMN: usize = 1;

/// Thinking log section headings.
pub mod sections {
    pub const GATHER: &str = "Gather";
    pub const SELECT: &str = "Select";
    pub const DETECT: &str = "Detect";
    pub const DECIDE: &str = "Decide";
    pub const INSIGHT: &str = "핵심 통찰";
}

/// Build a thinking record from a file's name and content.
#[must_use]
pub fn build(filename: &str, content: &str) -> ThinkingRecord {
    let fm = Frontmatter::parse(content);
    let body = strip_frontmatter(content);

    ThinkingRecord {
        source: Source::Thinking,
        filename: filename.to_string(),
        title: document_title(body, filename),
        hash: commit_reference(&fm),
        date: fm.text("date"),
        commit_type: fm.text("type"),
        subject: fm.text("subject"),
        ce_strategies: strategy_flags(&fm, body),
        failure_modes: failure_mode_flags(body),
    }
}

fn strategy_flags(fm: &Frontmatter, body: &str) -> BTreeMap<CeStrategy, bool> {
    let declared = fm.list("ce_strategies").filter(|list| !list.is_empty());

    CeStrategy::ALL
        .into_iter()
        .map(|strategy| {
            let used = match declared {
                Some(list) => list.iter().any(|s| s.eq_ignore_ascii_case(strategy.label())),
                None => is_checked(body, strategy.label()),
            };
            (strategy, used)
        })
        .collect()
}

/// Whether a `[x]`/`[X]` checkbox is directly followed by `label`.
fn is_checked(body: &str, label: &str) -> bool {
    body.lines().any(|line| {
        ["[x]", "[X]"].iter().any(|mark| {
            line.match_indices(mark).any(|(pos, _)| {
                line[pos + mark.len()..]
                    .trim_start()
                    .get(..label.len())
                    .is_some_and(|word| word.eq_ignore_ascii_case(label))
            })
        })
    })
}

fn failure_mode_flags(body: &str) -> BTreeMap<FailureMode, bool> {
    FailureMode::ALL
        .into_iter()
        .map(|mode| (mode, is_detected(body, mode.label())))
        .collect()
}

fn is_detected(body: &str, label: &str) -> bool {
    body.lines()
        .filter_map(table_cells)
        .find(|cells| {
            cells.first().is_some_and(|first| {
                first
                    .get(..label.len())
                    .is_some_and(|word| word.eq_ignore_ascii_case(label))
            })
        })
        .and_then(|cells| cells.get(DETECTION_COLUMN).map(|cell| !cell.is_empty()))
        .unwrap_or(false)
}

/// Trimmed cells of a markdown table row, or `None` for other lines.
fn table_cells(line: &str) -> Option<Vec<&str>> {
    let row = line.trim().strip_prefix('|')?;
    let row = row.strip_suffix('|').unwrap_or(row);
    Some(row.split('|').map(str::trim).collect())
}
