//! Journal record building for `.prompts/*.md` files.

use crate::frontmatter::{strip_frontmatter, Frontmatter};
use crate::record::{JournalRecord, Source};
use crate::section::{extract_section, first_blockquote, first_code_block, first_title};

/// Journal section headings.
pub mod sections {
    pub const ORIGINAL_PROMPT: &str = "원본 프롬프트";
    pub const THINKING: &str = "사고 여정";
    pub const OPTIMIZED_PROMPT: &str = "최적화된 프롬프트";
    pub const QUALITY: &str = "품질 분석";
    pub const LEARNING: &str = "핵심 학습";
    pub const OUTCOME: &str = "결과";
}

/// Build a journal record from a file's name and content.
#[must_use]
pub fn build(filename: &str, content: &str) -> JournalRecord {
    let fm = Frontmatter::parse(content);
    let body = strip_frontmatter(content);

    let original = extract_section(body, sections::ORIGINAL_PROMPT);
    let optimized = extract_section(body, sections::OPTIMIZED_PROMPT);

    JournalRecord {
        source: Source::Journal,
        filename: filename.to_string(),
        title: document_title(body, filename),
        hash: commit_reference(&fm),
        date: fm.text("date"),
        domain: fm.text("domain"),
        complexity: fm.text("complexity"),
        quality_score: fm.number("quality_score"),
        grade: fm.text("grade"),
        tags: fm.list("tags").map(<[String]>::to_vec).unwrap_or_default(),
        original_prompt: first_blockquote(original).unwrap_or(original).to_string(),
        optimized_prompt: first_code_block(optimized).unwrap_or(optimized).to_string(),
        thinking: extract_section(body, sections::THINKING).to_string(),
        learning: extract_section(body, sections::LEARNING).to_string(),
        outcome: extract_section(body, sections::OUTCOME).to_string(),
    }
}

/// First `# ` heading, else the filename without its extension.
pub(crate) fn document_title(body: &str, filename: &str) -> String {
    first_title(body).map_or_else(
        || {
            std::path::Path::new(filename)
                .file_stem()
                .map_or_else(|| filename.to_string(), |s| s.to_string_lossy().into_owned())
        },
        str::to_string,
    )
}

/// The `commit` back-reference. `none` is what template generators write
/// when no commit existed, so it counts as no reference.
pub(crate) fn commit_reference(fm: &Frontmatter) -> Option<String> {
    fm.text("commit")
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty() && !h.eq_ignore_ascii_case("none"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOURNAL: &str = r#"---
date: 2025-01-01
commit: abc1234
domain: backend
complexity: medium
quality_score: 41
grade: "A+"
tags: [cache, perf]
---

# Add LRU cache

## 원본 프롬프트

> 캐시를 추가해줘

## 사고 여정

처음에는 HashMap을 생각했다.

## 최적화된 프롬프트

```
LRU 캐시를 구현하라
```

## 핵심 학습

1. eviction 정책이 중요하다

## 결과

- 성공
"#;

    #[test]
    fn builds_journal_record() {
        let record = build("2025-01-01-cache.md", JOURNAL);

        assert_eq!(record.source, Source::Journal);
        assert_eq!(record.title, "Add LRU cache");
        assert_eq!(record.hash.as_deref(), Some("abc1234"));
        assert_eq!(record.date.as_deref(), Some("2025-01-01"));
        assert_eq!(record.domain.as_deref(), Some("backend"));
        assert_eq!(record.complexity.as_deref(), Some("medium"));
        assert_eq!(record.quality_score, Some(41.0));
        assert_eq!(record.grade.as_deref(), Some("A+"));
        assert_eq!(record.tags, vec!["cache", "perf"]);
        assert_eq!(record.original_prompt, "캐시를 추가해줘");
        assert_eq!(record.optimized_prompt, "LRU 캐시를 구현하라");
        assert_eq!(record.thinking, "처음에는 HashMap을 생각했다.");
        assert_eq!(record.learning, "1. eviction 정책이 중요하다");
        assert_eq!(record.outcome, "- 성공");
    }

    #[test]
    fn falls_back_to_raw_sections_and_filename_title() {
        let content = "## 원본 프롬프트\nplain prompt\n\n## 최적화된 프롬프트\nplain optimized\n";
        let record = build("2025-02-03-plain.md", content);

        assert_eq!(record.title, "2025-02-03-plain");
        assert_eq!(record.original_prompt, "plain prompt");
        assert_eq!(record.optimized_prompt, "plain optimized");
        assert_eq!(record.hash, None);
        assert_eq!(record.date, None);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn none_commit_is_not_a_reference() {
        let record = build("x.md", "---\ncommit: none\n---\n");
        assert_eq!(record.hash, None);
    }
}
