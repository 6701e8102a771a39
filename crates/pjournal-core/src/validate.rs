//! Validation of on-disk journals and thinking logs against their schema.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::frontmatter::{strip_frontmatter, Field, Frontmatter, FrontmatterValue};
use crate::schema::{DocumentKind, DocumentSchema, Severity, MIN_BODY_CHARS};
use crate::section::has_heading;

static FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-.+\.md$").expect("valid regex"));

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Findings for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub filename: String,
    pub kind: DocumentKind,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub valid: bool,
}

impl ValidationResult {
    fn new(filename: &str, kind: DocumentKind) -> Self {
        Self {
            filename: filename.to_string(),
            kind,
            errors: Vec::new(),
            warnings: Vec::new(),
            valid: true,
        }
    }

    fn push(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Error => self.errors.push(message),
            Severity::Warning => self.warnings.push(message),
        }
    }

    fn finish(mut self) -> Self {
        self.valid = self.errors.is_empty();
        self
    }

    /// Result for a file that could not be read.
    #[must_use]
    pub fn unreadable(filename: &str, kind: DocumentKind, reason: &str) -> Self {
        let mut result = Self::new(filename, kind);
        result.errors.push(format!("failed to read file: {reason}"));
        result.finish()
    }
}

/// Validate one document's content against the schema of `kind`.
#[must_use]
pub fn validate(kind: DocumentKind, filename: &str, content: &str) -> ValidationResult {
    let schema = kind.schema();
    let mut result = ValidationResult::new(filename, kind);

    if !FILENAME.is_match(filename) {
        result.warnings.push(format!(
            "filename should follow YYYY-MM-DD-<topic>.md (got: {filename})"
        ));
    }

    let fm = Frontmatter::parse(content);
    if fm.is_found() {
        check_fields(schema, &fm, &mut result);
    } else {
        result.errors.push("missing frontmatter block".to_string());
    }

    for section in schema.required_sections {
        if !has_heading(content, section) {
            result.push(
                schema.missing_section,
                format!("missing required section: {section}"),
            );
        }
    }
    for section in schema.recommended_sections {
        if !has_heading(content, section) {
            result
                .warnings
                .push(format!("missing recommended section: {section}"));
        }
    }

    if strip_frontmatter(content).trim().chars().count() < MIN_BODY_CHARS {
        result.warnings.push(format!(
            "content is too short (under {MIN_BODY_CHARS} characters)"
        ));
    }

    result.finish()
}

fn check_fields(schema: &DocumentSchema, fm: &Frontmatter, result: &mut ValidationResult) {
    for field in schema.required_fields {
        if fm.get(field).is_none() {
            result.errors.push(format!("missing required field: {field}"));
        }
    }
    for field in schema.recommended_fields {
        if fm.get(field).is_none() {
            result
                .warnings
                .push(format!("missing recommended field: {field}"));
        }
    }

    if let Some(date) = fm.get("date") {
        let ok = matches!(date, FrontmatterValue::Text(s) if DATE.is_match(s));
        if !ok {
            result.errors.push(format!(
                "invalid date format: {} (expected YYYY-MM-DD)",
                display(date)
            ));
        }
    }

    for rule in schema.enum_fields {
        let Some(value) = fm.get(rule.field) else {
            continue;
        };
        let known = value
            .as_text()
            .is_some_and(|v| rule.allowed.contains(&v.as_str()));
        if !known {
            let verb = match rule.severity {
                Severity::Error => "invalid",
                Severity::Warning => "unknown",
            };
            result.push(
                rule.severity,
                format!(
                    "{verb} {} value: {} (allowed: {})",
                    rule.field,
                    display(value),
                    rule.allowed.join(", ")
                ),
            );
        }
    }

    if let Some((min, max)) = schema.quality_score_range {
        if let Field::Present(score) = fm.field("quality_score") {
            let in_range = score.as_number().is_some_and(|n| (min..=max).contains(&n));
            if !in_range {
                result.errors.push(format!(
                    "invalid quality_score: {} (must be in range {min}-{max})",
                    display(score)
                ));
            }
        }
    }
}

fn display(value: &FrontmatterValue) -> String {
    match value {
        FrontmatterValue::List(items) => format!("[{}]", items.join(", ")),
        other => other.as_text().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journal(frontmatter: &str) -> String {
        format!(
            "---\n{frontmatter}\n---\n\n# Add cache\n\n## 원본 프롬프트\n\n> 캐시를 추가해줘\n\n## 사고 여정\n\nLRU와 LFU 중 LRU를 골랐다. 접근 패턴이 최근성 위주였기 때문이다.\n\n## 최적화된 프롬프트\n\n```\nLRU 캐시를 추가하라\n```\n\n## 품질 분석\n\n| **총점** | | **40/48** | |\n\n## 핵심 학습\n\n1. 측정 먼저\n\n## 결과\n\n- 성공\n"
        )
    }

    const FULL: &str = "date: 2025-01-01\ndomain: backend\ncomplexity: medium\ncommit: abc1234\nquality_score: 40\ngrade: A";

    #[test]
    fn complete_journal_is_valid_without_findings() {
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &journal(FULL));
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn minimal_journal_has_no_errors() {
        let content = journal("date: 2025-01-01\ndomain: backend\ncomplexity: medium");
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 3, "{:?}", result.warnings);
    }

    #[test]
    fn missing_domain_is_one_error() {
        let content = journal("date: 2025-01-01\ncomplexity: medium");
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("domain"));
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let content = journal("date: 2025-01-01\ndomain: null\ncomplexity: medium");
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert_eq!(result.errors, vec!["missing required field: domain"]);
    }

    #[test]
    fn quality_score_out_of_range_is_an_error() {
        let content = journal(&FULL.replace("quality_score: 40", "quality_score: 50"));
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("0-48"));
    }

    #[test]
    fn non_numeric_quality_score_is_an_error() {
        let content = journal(&FULL.replace("quality_score: 40", "quality_score: high"));
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert!(result.errors[0].contains("quality_score"));
    }

    #[test]
    fn unknown_grade_is_a_warning() {
        let content = journal(&FULL.replace("grade: A", "grade: \"Z\""));
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("grade"));
    }

    #[test]
    fn unknown_domain_warns_but_unknown_complexity_errors() {
        let content = journal(
            &FULL
                .replace("domain: backend", "domain: marketing")
                .replace("complexity: medium", "complexity: extreme"),
        );
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("complexity"));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("marketing"));
    }

    #[test]
    fn bad_date_format_is_an_error() {
        let content = journal(&FULL.replace("date: 2025-01-01", "date: 01/02/2025"));
        let result = validate(DocumentKind::Journal, "2025-01-01-test.md", &content);
        assert_eq!(result.errors, vec!["invalid date format: 01/02/2025 (expected YYYY-MM-DD)"]);
    }

    #[test]
    fn missing_sections_and_frontmatter() {
        let result = validate(DocumentKind::Journal, "notes.md", "# Title\n\nshort");
        assert!(result.errors.contains(&"missing frontmatter block".to_string()));
        assert!(result
            .errors
            .contains(&"missing required section: 사고 여정".to_string()));
        assert!(result.warnings.iter().any(|w| w.contains("notes.md")));
        assert!(result.warnings.iter().any(|w| w.contains("too short")));
    }

    #[test]
    fn thinking_logs_only_warn_about_sections() {
        let content = "---\ndate: 2025-01-02\ncommit: abc1234\ntype: feat\nsubject: add cache\n---\n\n# add cache\n";
        let result = validate(DocumentKind::Thinking, "2025-01-02-add-cache.md", content);
        assert!(result.valid, "{:?}", result.errors);
        assert!(result
            .warnings
            .contains(&"missing required section: Gather".to_string()));
    }

    #[test]
    fn thinking_log_requires_subject() {
        let content = "---\ndate: 2025-01-02\n---\n";
        let result = validate(DocumentKind::Thinking, "2025-01-02-x.md", content);
        assert_eq!(result.errors, vec!["missing required field: subject"]);
    }

    #[test]
    fn unreadable_file_is_invalid() {
        let result = ValidationResult::unreadable("x.md", DocumentKind::Journal, "permission denied");
        assert!(!result.valid);
        assert!(result.errors[0].contains("permission denied"));
    }
}
