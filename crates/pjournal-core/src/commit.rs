//! Commit record building.
//!
//! Turns a classified raw commit into a [`CommitRecord`]: the conventional
//! header plus the payload of whichever schema the message satisfied.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::{classify, SchemaVersion, CO_AUTHORED_BY};
use crate::history::RawCommit;
use crate::record::{
    CommitHeader, CommitPayload, CommitRecord, LegacyPayload, Source, V4Payload,
};
use crate::section::SectionQuery;

/// Fallback commit type for headers that are not `type(scope): subject`.
pub const UNKNOWN_TYPE: &str = "unknown";

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(?:\((.+)\))?:\s*(.+)$").expect("valid regex"));

static ORIGINAL_PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)### 원본 프롬프트\s*```(.*?)```").expect("valid regex"));

static OPTIMIZED_PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)### 최적화된 프롬프트\s*```(.*?)```").expect("valid regex"));

static ANALYSIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)### 프롬프트 분석\s*>(.*)").expect("valid regex"));

static QUALITY_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*총점\*\*.*?(\d+)/48").expect("valid regex"));

static GRADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"등급:\s*\[?\s*([A-FS][+-]?|[가-힣]+)\s*\]?").expect("valid regex")
});

/// Parse the first line as `type(scope): subject`, or `None` if it is not
/// a conventional header.
#[must_use]
pub fn conventional_header(message: &str) -> Option<CommitHeader> {
    let caps = HEADER.captures(first_line(message))?;
    Some(CommitHeader {
        commit_type: caps[1].to_string(),
        scope: caps.get(2).map(|m| m.as_str().to_string()),
        subject: caps[3].trim().to_string(),
    })
}

/// Parse the first line of a commit message, falling back to
/// [`UNKNOWN_TYPE`] with the whole line as subject.
#[must_use]
pub fn parse_header(message: &str) -> CommitHeader {
    conventional_header(message).unwrap_or_else(|| CommitHeader {
        commit_type: UNKNOWN_TYPE.to_string(),
        scope: None,
        subject: first_line(message).to_string(),
    })
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim_end()
}

/// Classify `commit` and build its record, or `None` if no schema matches.
#[must_use]
pub fn build(commit: &RawCommit) -> Option<CommitRecord> {
    classify(&commit.message).map(|schema| build_record(commit, schema))
}

/// Build the record of a commit already classified as `schema`.
#[must_use]
pub fn build_record(commit: &RawCommit, schema: SchemaVersion) -> CommitRecord {
    let header = parse_header(&commit.message);
    let payload = match schema {
        SchemaVersion::V4 => CommitPayload::V4(v4_payload(&commit.message)),
        SchemaVersion::Legacy => CommitPayload::Legacy(legacy_payload(&commit.message)),
    };

    CommitRecord {
        source: Source::for_schema(schema),
        hash: commit.hash.clone(),
        date: commit.date.clone(),
        commit_type: header.commit_type,
        scope: header.scope,
        subject: header.subject,
        schema,
        payload,
    }
}

fn v4_payload(message: &str) -> V4Payload {
    let section = |name: &'static str| SectionQuery::new(name).depths(2..=2);

    V4Payload {
        what: section("What").extract(message).to_string(),
        why: section("Why").extract(message).to_string(),
        impact: section("Impact")
            .stop_at(CO_AUTHORED_BY)
            .extract(message)
            .to_string(),
    }
}

fn legacy_payload(message: &str) -> LegacyPayload {
    LegacyPayload {
        original_prompt: first_capture(&ORIGINAL_PROMPT, message).unwrap_or_default(),
        optimized_prompt: first_capture(&OPTIMIZED_PROMPT, message).unwrap_or_default(),
        analysis: analysis(message),
        quality_score: quality_score(message),
        grade: grade(message),
    }
}

/// Integer total from a `**총점** ... N/48` line.
#[must_use]
pub fn quality_score(message: &str) -> Option<u32> {
    QUALITY_SCORE
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
}

/// Letter grade from a `등급: [A+]` line.
#[must_use]
pub fn grade(message: &str) -> Option<String> {
    first_capture(&GRADE, message)
}

fn analysis(message: &str) -> String {
    let Some(rest) = ANALYSIS.captures(message).and_then(|caps| caps.get(1)) else {
        return String::new();
    };
    let rest = rest.as_str();
    let end = [rest.find("###"), rest.find("## ")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
