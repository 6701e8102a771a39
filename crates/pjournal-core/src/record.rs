//! Record types produced by the extraction engine.
//!
//! Every record carries a `source` tag so that the merged output can be
//! consumed as one list regardless of where each entry came from.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::SchemaVersion;

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    CommitV4,
    CommitLegacy,
    Journal,
    Thinking,
}

impl Source {
    #[must_use]
    pub fn for_schema(schema: SchemaVersion) -> Self {
        match schema {
            SchemaVersion::V4 => Self::CommitV4,
            SchemaVersion::Legacy => Self::CommitLegacy,
        }
    }

    /// Merge priority: higher wins when two records share a hash.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Self::Thinking => 2,
            Self::Journal => 1,
            Self::CommitV4 | Self::CommitLegacy => 0,
        }
    }
}

/// The parsed first line of a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader {
    pub commit_type: String,
    pub scope: Option<String>,
    pub subject: String,
}

/// Sections of a 4-section (v4) commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V4Payload {
    pub what: String,
    pub why: String,
    pub impact: String,
}

/// Prompt fields of a 16-section (legacy) commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPayload {
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub analysis: String,
    pub quality_score: Option<u32>,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommitPayload {
    V4(V4Payload),
    Legacy(LegacyPayload),
}

/// One classified git commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub source: Source,
    pub hash: String,
    pub date: String,
    #[serde(rename = "type")]
    pub commit_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub subject: String,
    pub schema: SchemaVersion,
    #[serde(flatten)]
    pub payload: CommitPayload,
}

/// One `.prompts/*.md` journal file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRecord {
    pub source: Source,
    pub filename: String,
    pub title: String,
    pub hash: Option<String>,
    pub date: Option<String>,
    pub domain: Option<String>,
    pub complexity: Option<String>,
    pub quality_score: Option<f64>,
    pub grade: Option<String>,
    pub tags: Vec<String>,
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub thinking: String,
    pub learning: String,
    pub outcome: String,
}

/// Named context-engineering strategies a thinking log can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CeStrategy {
    Write,
    Select,
    Compress,
    Isolate,
}

impl CeStrategy {
    pub const ALL: [CeStrategy; 4] = [Self::Write, Self::Select, Self::Compress, Self::Isolate];

    /// Name as written in checklists (`- [x] Write: ...`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Write => "Write",
            Self::Select => "Select",
            Self::Compress => "Compress",
            Self::Isolate => "Isolate",
        }
    }
}

/// Context failure modes tracked in the detection table of a thinking log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    Poisoning,
    Distraction,
    Confusion,
    Clash,
}

impl FailureMode {
    pub const ALL: [FailureMode; 4] = [
        Self::Poisoning,
        Self::Distraction,
        Self::Confusion,
        Self::Clash,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Poisoning => "Poisoning",
            Self::Distraction => "Distraction",
            Self::Confusion => "Confusion",
            Self::Clash => "Clash",
        }
    }
}

/// One `.thoughts/*.md` thinking log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingRecord {
    pub source: Source,
    pub filename: String,
    pub title: String,
    pub hash: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub commit_type: Option<String>,
    pub subject: Option<String>,
    pub ce_strategies: BTreeMap<CeStrategy, bool>,
    pub failure_modes: BTreeMap<FailureMode, bool>,
}

/// Any record that can appear in the aggregate output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PromptRecord {
    Commit(CommitRecord),
    Journal(JournalRecord),
    Thinking(ThinkingRecord),
}

impl PromptRecord {
    #[must_use]
    pub fn source(&self) -> Source {
        match self {
            Self::Commit(r) => r.source,
            Self::Journal(r) => r.source,
            Self::Thinking(r) => r.source,
        }
    }

    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Commit(r) => Some(r.hash.as_str()),
            Self::Journal(r) => r.hash.as_deref(),
            Self::Thinking(r) => r.hash.as_deref(),
        }
        .filter(|h| !h.is_empty())
    }

    #[must_use]
    pub fn date(&self) -> Option<&str> {
        match self {
            Self::Commit(r) => Some(r.date.as_str()),
            Self::Journal(r) => r.date.as_deref(),
            Self::Thinking(r) => r.date.as_deref(),
        }
    }

    /// Parsed date used for ordering; `None` when missing or unparseable.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date().and_then(parse_timestamp)
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_kebab_case() {
        let json = serde_json::to_string(&Source::CommitLegacy).expect("serialize");
        assert_eq!(json, "\"commit-legacy\"");
        assert!(Source::Thinking.priority() > Source::Journal.priority());
        assert!(Source::Journal.priority() > Source::CommitV4.priority());
    }

    #[test]
    fn commit_record_flattens_payload() {
        let record = CommitRecord {
            source: Source::CommitV4,
            hash: "abc123".to_string(),
            date: "2025-01-01T10:00:00+09:00".to_string(),
            commit_type: "feat".to_string(),
            scope: None,
            subject: "add cache".to_string(),
            schema: SchemaVersion::V4,
            payload: CommitPayload::V4(V4Payload {
                what: "Added LRU cache".to_string(),
                why: "Perf".to_string(),
                impact: "None".to_string(),
            }),
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["source"], "commit-v4");
        assert_eq!(json["type"], "feat");
        assert_eq!(json["schema"], "v4");
        assert_eq!(json["what"], "Added LRU cache");
        assert!(json.get("scope").is_none());
    }

    #[test]
    fn parses_both_date_shapes() {
        let full = parse_timestamp("2025-01-01T10:00:00+09:00").unwrap();
        assert_eq!(full.to_rfc3339(), "2025-01-01T01:00:00+00:00");
        let day = parse_timestamp("2025-01-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert!(parse_timestamp("last tuesday").is_none());
    }
}
