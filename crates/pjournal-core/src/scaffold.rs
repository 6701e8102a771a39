//! Journal drafts generated from a classified commit.
//!
//! The draft carries everything the commit already says (prompts, score,
//! grade) and leaves placeholders for the parts only the author can write.

use serde::Serialize;

use crate::aggregate::short_hash;
use crate::commit;
use crate::error::{PjError, Result};
use crate::history::RawCommit;
use crate::journal::sections;
use crate::record::{CommitPayload, CommitRecord};
use crate::section::{extract_section, first_code_block};

const SLUG_MAX_CHARS: usize = 30;
const HIGH_COMPLEXITY_CHARS: usize = 5000;
const MEDIUM_COMPLEXITY_CHARS: usize = 2000;
const THINKING_PREVIEW_LINES: usize = 5;
const PLACEHOLDER: &str = "(자동 생성됨 - 편집 필요)";
const EXTRACTED: &str = "(커밋 메시지에서 추출됨)";

/// A generated journal file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    pub filename: String,
    pub content: String,
}

#[derive(Serialize)]
struct DraftFrontmatter<'a> {
    date: &'a str,
    time: &'a str,
    commit: &'a str,
    domain: &'static str,
    subdomain: Option<&'a str>,
    complexity: &'static str,
    quality_score: Option<u32>,
    grade: Option<&'a str>,
    tags: Vec<String>,
}

/// Journal domain suggested by a commit type.
#[must_use]
pub fn domain_for_type(commit_type: &str) -> &'static str {
    match commit_type {
        "feat" | "fix" => "backend",
        "docs" => "docs",
        "style" => "frontend",
        "refactor" => "refactor",
        "perf" => "performance",
        "test" => "test",
        "build" | "ci" => "devops",
        "security" => "security",
        _ => "general",
    }
}

/// Complexity estimated from the length of the commit message.
#[must_use]
pub fn complexity_for_length(message: &str) -> &'static str {
    match message.chars().count() {
        n if n > HIGH_COMPLEXITY_CHARS => "high",
        n if n > MEDIUM_COMPLEXITY_CHARS => "medium",
        _ => "low",
    }
}

/// `{date}-{type}-{slug}.md`, the slug taken from the scope or else the subject.
#[must_use]
pub fn journal_filename(date: &str, record: &CommitRecord) -> String {
    let base = record.scope.as_deref().unwrap_or(&record.subject);
    format!("{date}-{}-{}.md", record.commit_type, slug(base))
}

fn slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || is_hangul(*c) || c.is_whitespace() || *c == '-')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(SLUG_MAX_CHARS)
        .collect()
}

fn is_hangul(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

/// Draft a journal for `raw`, or `None` when the message satisfies no schema.
///
/// # Errors
///
/// Returns [`PjError::Serialization`] if the frontmatter cannot be rendered.
pub fn draft(raw: &RawCommit) -> Result<Option<JournalDraft>> {
    commit::build(raw)
        .map(|record| render(raw, &record))
        .transpose()
}

fn render(raw: &RawCommit, record: &CommitRecord) -> Result<JournalDraft> {
    let date = raw.date.get(..10).unwrap_or(&raw.date);
    let time = raw.date.get(11..16).unwrap_or_default();
    let short_hash = short_hash(&raw.hash);

    let (original, optimized, thinking, score, grade) = match &record.payload {
        CommitPayload::Legacy(p) => (
            fenced_prompt(&raw.message, sections::ORIGINAL_PROMPT),
            fenced_prompt(&raw.message, sections::OPTIMIZED_PROMPT),
            extract_section(&raw.message, sections::THINKING),
            p.quality_score,
            p.grade.as_deref(),
        ),
        CommitPayload::V4(p) => ("", "", p.why.as_str(), None, None),
    };

    let frontmatter = DraftFrontmatter {
        date,
        time,
        commit: &short_hash,
        domain: domain_for_type(&record.commit_type),
        subdomain: record.scope.as_deref(),
        complexity: complexity_for_length(&raw.message),
        quality_score: score,
        grade,
        tags: Vec::new(),
    };
    let yaml = serde_yaml::to_string(&frontmatter)
        .map_err(|e| PjError::Serialization(e.to_string()))?;
    let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);

    let thinking_preview = if thinking.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        thinking
            .lines()
            .take(THINKING_PREVIEW_LINES)
            .collect::<Vec<_>>()
            .join("\n")
    };
    let score_cell = score.map_or_else(|| "?".to_string(), |s| s.to_string());

    let content = format!(
        "---
{yaml}---

# {subject}

## {original_heading}

{original}

## {thinking_heading}

### 처음 생각
{thinking_preview}

### 전환점
- 전환점 1: ...

### 최종 통찰
{PLACEHOLDER}

## {optimized_heading}

```
{optimized}
```

## {quality_heading}

| 계층 | 항목 | 점수 | 메모 |
|:----:|------|:----:|------|
| L1 | 구조적 완성도 | /18 | |
| L2 | 엔지니어링 기법 | /8 | |
| L3 | 맥락 최적화 | /6 | |
| L4 | 효과 검증 | /4 | |
| L5 | 할루시네이션 | /12 | |
| **총점** | | **{score_cell}/48** | {grade_cell} |

## {learning_heading}

1. {PLACEHOLDER}

## {outcome_heading}

- **성공 여부**: [ ] 성공 / [ ] 실패 / [ ] 부분 성공
- **커밋**: {short_hash}
",
        subject = record.subject,
        original_heading = sections::ORIGINAL_PROMPT,
        original = quoted(non_empty_or(original, EXTRACTED)),
        thinking_heading = sections::THINKING,
        optimized_heading = sections::OPTIMIZED_PROMPT,
        optimized = non_empty_or(optimized, EXTRACTED),
        quality_heading = sections::QUALITY,
        grade_cell = grade.unwrap_or_default(),
        learning_heading = sections::LEARNING,
        outcome_heading = sections::OUTCOME,
    );

    Ok(JournalDraft {
        filename: journal_filename(date, record),
        content,
    })
}

/// Body of the first fenced block under `heading`, without its info string,
/// else the raw section text.
fn fenced_prompt<'t>(message: &'t str, heading: &str) -> &'t str {
    let section = extract_section(message, heading);
    first_code_block(section).unwrap_or(section)
}

fn quoted(text: &str) -> String {
    text.lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SchemaVersion;
    use crate::frontmatter::Frontmatter;
    use crate::schema::DocumentKind;
    use crate::validate::validate;

    fn raw(message: &str) -> RawCommit {
        RawCommit {
            hash: "ABC1234def5678".to_string(),
            date: "2025-03-04T21:15:00+09:00".to_string(),
            message: message.to_string(),
        }
    }

    const V4: &str = "perf(cache): Add LRU cache!\n\n## What\nAdded cache\n\n## Why\nLookups were slow\n\n## Impact\nNone\n\nCo-Authored-By: x <x@example.com>";

    #[test]
    fn unclassified_commit_has_no_draft() {
        assert_eq!(draft(&raw("fix: typo")).unwrap(), None);
    }

    #[test]
    fn draft_is_a_valid_journal() {
        let draft = draft(&raw(V4)).unwrap().expect("classified");
        assert_eq!(draft.filename, "2025-03-04-perf-cache.md");

        let result = validate(DocumentKind::Journal, &draft.filename, &draft.content);
        assert!(result.valid, "{:?}", result.errors);

        let fm = Frontmatter::parse(&draft.content);
        assert_eq!(fm.text("date").as_deref(), Some("2025-03-04"));
        assert_eq!(fm.text("commit").as_deref(), Some("abc1234"));
        assert_eq!(fm.text("domain").as_deref(), Some("performance"));
        assert_eq!(fm.text("subdomain").as_deref(), Some("cache"));
        assert_eq!(fm.text("complexity").as_deref(), Some("low"));
        assert!(draft.content.contains("Lookups were slow"));
    }

    const LEGACY: &str = "feat(journal): 저널 자동 생성

## 사고 여정
1. 문제 인식

### 원본 프롬프트
```text
저널을 만들어줘
```

### 최적화된 프롬프트
```markdown
post-commit 훅에서 저널을 생성하라
조건: 기존 파일은 덮어쓰지 않는다
```

**총점**: 41/48
등급: [A+]
";

    #[test]
    fn legacy_draft_reads_back_without_fence_info_strings() {
        let commit = raw(LEGACY);
        let record = commit::build_record(&commit, SchemaVersion::Legacy);
        let draft = render(&commit, &record).unwrap();

        let journal = crate::journal::build(&draft.filename, &draft.content);
        assert_eq!(journal.original_prompt, "저널을 만들어줘");
        assert_eq!(
            journal.optimized_prompt,
            "post-commit 훅에서 저널을 생성하라\n조건: 기존 파일은 덮어쓰지 않는다"
        );
        assert_eq!(journal.quality_score, Some(41.0));
        assert_eq!(journal.grade.as_deref(), Some("A+"));
    }

    #[test]
    fn multi_line_original_prompt_stays_quoted() {
        assert_eq!(quoted("a\nb"), "> a\n> b");
    }

    #[test]
    fn slug_falls_back_to_subject() {
        let msg = V4.replace("perf(cache): Add LRU cache!", "feat: Add LRU cache, fast!");
        let draft = draft(&raw(&msg)).unwrap().expect("classified");
        assert_eq!(draft.filename, "2025-03-04-feat-add-lru-cache-fast.md");
    }

    #[test]
    fn slug_keeps_hangul_and_truncates() {
        assert_eq!(slug("저널 자동 생성"), "저널-자동-생성");
        assert_eq!(slug(&"a".repeat(40)).len(), SLUG_MAX_CHARS);
    }

    #[test]
    fn domain_and_complexity_tables() {
        assert_eq!(domain_for_type("ci"), "devops");
        assert_eq!(domain_for_type("chore"), "general");
        assert_eq!(domain_for_type("wip"), "general");
        assert_eq!(complexity_for_length(&"x".repeat(2001)), "medium");
        assert_eq!(complexity_for_length(&"x".repeat(5001)), "high");
    }
}
