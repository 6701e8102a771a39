//! Commit-message lint rules.
//!
//! Each rule is a pure function of the message text. A failing rule names
//! every missing marker in its message, one per line. [`lint`] runs the rule
//! set selected by a [`LintConfig`] and reports every outcome.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::classify::{SchemaVersion, CO_AUTHORED_BY, LEGACY_MARKERS, V4_MARKERS};
use crate::config::LintConfig;
use crate::schema::Severity;

const THINKING_JOURNEY: &str = "## 사고 여정";
const PROMPT_QUALITY: &str = "## 프롬프트 품질 검수";

/// Pass/fail plus a human-readable explanation (empty on pass).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintOutcome {
    pub valid: bool,
    pub message: String,
}

impl LintOutcome {
    fn pass() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// Fail listing every name in `missing`, or pass when it is empty.
    fn missing(what: &str, missing: &[&str]) -> Self {
        if missing.is_empty() {
            return Self::pass();
        }
        let mut message = format!("missing {what} ({}):", missing.len());
        for name in missing {
            message.push_str("\n   - ");
            message.push_str(name);
        }
        Self::fail(message)
    }
}

type Check = fn(&str, &LintConfig) -> LintOutcome;

/// A named lint rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub severity: Severity,
    check: Check,
}

impl Rule {
    const fn new(name: &'static str, severity: Severity, check: Check) -> Self {
        Self {
            name,
            severity,
            check,
        }
    }

    #[must_use]
    pub fn check(&self, message: &str, config: &LintConfig) -> LintOutcome {
        (self.check)(message, config)
    }
}

const HEADER_RULES: [Rule; 5] = [
    Rule::new("type-empty", Severity::Error, type_empty),
    Rule::new("type-case", Severity::Error, type_case),
    Rule::new("type-enum", Severity::Error, type_enum),
    Rule::new("subject-empty", Severity::Error, subject_empty),
    Rule::new("subject-max-length", Severity::Warning, subject_max_length),
];

const V4_RULES: [Rule; 1] = [Rule::new(
    "require-v4-sections",
    Severity::Error,
    require_v4_sections,
)];

const LEGACY_RULES: [Rule; 3] = [
    Rule::new("require-16-sections", Severity::Error, require_16_sections),
    Rule::new(
        "require-thinking-journey",
        Severity::Error,
        require_thinking_journey,
    ),
    Rule::new(
        "require-prompt-quality",
        Severity::Error,
        require_prompt_quality,
    ),
];

/// Rules applied for the configured schema: header rules, then section rules.
#[must_use]
pub fn rules_for(schema: SchemaVersion) -> Vec<Rule> {
    let sections: &[Rule] = match schema {
        SchemaVersion::V4 => &V4_RULES,
        SchemaVersion::Legacy => &LEGACY_RULES,
    };
    HEADER_RULES.iter().chain(sections).copied().collect()
}

/// Outcome of one rule within a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub rule: &'static str,
    pub severity: Severity,
    #[serde(flatten)]
    pub outcome: LintOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub results: Vec<RuleResult>,
}

impl LintReport {
    /// Failed rules, in rule order.
    pub fn failures(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| !r.outcome.valid)
    }

    /// Whether any error-severity rule failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.failures().any(|r| r.severity == Severity::Error)
    }
}

/// Run every configured rule against `message`.
#[must_use]
pub fn lint(message: &str, config: &LintConfig) -> LintReport {
    let results = rules_for(config.schema)
        .into_iter()
        .map(|rule| RuleResult {
            rule: rule.name,
            severity: rule.severity,
            outcome: rule.check(message, config),
        })
        .collect();
    LintReport { results }
}

// Header rules. A first line that is not `type(scope): subject` has an
// empty type and an empty subject.

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w*)(?:\([^)]*\))?:(.*)$").expect("valid regex"));

struct Header<'a> {
    commit_type: &'a str,
    subject: &'a str,
}

fn header(message: &str) -> Header<'_> {
    let first_line = message.lines().next().unwrap_or("");
    HEADER
        .captures(first_line)
        .and_then(|caps| Some((caps.get(1)?, caps.get(2)?)))
        .map_or(
            Header {
                commit_type: "",
                subject: "",
            },
            |(commit_type, subject)| Header {
                commit_type: commit_type.as_str(),
                subject: subject.as_str().trim(),
            },
        )
}

fn type_empty(message: &str, _: &LintConfig) -> LintOutcome {
    if header(message).commit_type.is_empty() {
        LintOutcome::fail("type may not be empty (expected `type(scope): subject`)")
    } else {
        LintOutcome::pass()
    }
}

fn type_case(message: &str, _: &LintConfig) -> LintOutcome {
    let commit_type = header(message).commit_type;
    if commit_type == commit_type.to_lowercase() {
        LintOutcome::pass()
    } else {
        LintOutcome::fail(format!("type must be lower-case (got: {commit_type})"))
    }
}

fn type_enum(message: &str, config: &LintConfig) -> LintOutcome {
    let commit_type = header(message).commit_type;
    if commit_type.is_empty() || config.types.iter().any(|t| t == commit_type) {
        LintOutcome::pass()
    } else {
        LintOutcome::fail(format!(
            "type must be one of [{}] (got: {commit_type})",
            config.types.join(", ")
        ))
    }
}

fn subject_empty(message: &str, _: &LintConfig) -> LintOutcome {
    if header(message).subject.is_empty() {
        LintOutcome::fail("subject may not be empty")
    } else {
        LintOutcome::pass()
    }
}

fn subject_max_length(message: &str, config: &LintConfig) -> LintOutcome {
    let limit = config.subject_max_length;
    let length = header(message).subject.chars().count();
    if length > limit {
        LintOutcome::fail(format!(
            "subject must not be longer than {limit} characters (got: {length})"
        ))
    } else {
        LintOutcome::pass()
    }
}

// Section rules.

/// A heading marker must start a line; the trailer may appear anywhere.
fn has_marker(message: &str, marker: &str) -> bool {
    if marker == CO_AUTHORED_BY {
        return message.contains(marker);
    }
    message.lines().any(|line| line.starts_with(marker))
}

/// Marker text without its leading `#`s, for display.
fn marker_name(marker: &str) -> &str {
    marker
        .trim_start_matches('#')
        .trim()
        .trim_end_matches(':')
}

fn missing_markers(message: &str, markers: &[&'static str]) -> Vec<&'static str> {
    markers
        .iter()
        .copied()
        .filter(|m| !has_marker(message, m))
        .map(marker_name)
        .collect()
}

fn require_v4_sections(message: &str, _: &LintConfig) -> LintOutcome {
    LintOutcome::missing("required sections", &missing_markers(message, &V4_MARKERS))
}

fn require_16_sections(message: &str, _: &LintConfig) -> LintOutcome {
    LintOutcome::missing(
        "required sections",
        &missing_markers(message, &LEGACY_MARKERS),
    )
}

/// A named check inside an optional section.
struct Pattern {
    name: &'static str,
    regex: Regex,
}

fn patterns(list: &[(&'static str, &str)]) -> Vec<Pattern> {
    list.iter()
        .map(|&(name, re)| Pattern {
            name,
            regex: Regex::new(re).expect("valid regex"),
        })
        .collect()
}

static JOURNEY_STEPS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    patterns(&[
        ("1. 문제 인식", r"### 1\. 문제 인식"),
        ("2. 탐색 경로", r"### 2\. 탐색 경로"),
        ("3. 고려한 대안들", r"### 3\. 고려한 대안들"),
        ("4. 결정 근거", r"### 4\. 결정 근거"),
        ("5. 구현 타임라인", r"### 5\. 구현 타임라인"),
        ("6. 핵심 통찰", r"### 6\. 핵심 통찰"),
    ])
});

static QUALITY_LAYERS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    patterns(&[
        ("계층 1: 구조적 완성도 (18점)", r"계층 1.*구조적 완성도"),
        ("계층 2: 엔지니어링 기법 (8점)", r"계층 2.*엔지니어링 기법"),
        ("계층 3: 맥락 최적화 (6점)", r"계층 3.*맥락 최적화"),
        ("계층 4: 효과 검증 (4점)", r"계층 4.*효과 검증"),
        ("계층 5: 할루시네이션 검증 (12점)", r"계층 5.*할루시네이션 검증"),
        ("최종 평가 (총점/48)", r"최종 평가|총점.*/48"),
    ])
});

fn missing_patterns(message: &str, patterns: &[Pattern]) -> Vec<&'static str> {
    patterns
        .iter()
        .filter(|p| !p.regex.is_match(message))
        .map(|p| p.name)
        .collect()
}

fn require_thinking_journey(message: &str, _: &LintConfig) -> LintOutcome {
    if !message.contains(THINKING_JOURNEY) {
        return LintOutcome::pass();
    }
    LintOutcome::missing(
        "thinking journey steps",
        &missing_patterns(message, &JOURNEY_STEPS),
    )
}

fn require_prompt_quality(message: &str, _: &LintConfig) -> LintOutcome {
    if !message.contains(PROMPT_QUALITY) {
        return LintOutcome::pass();
    }
    LintOutcome::missing(
        "prompt quality checks",
        &missing_patterns(message, &QUALITY_LAYERS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4() -> LintConfig {
        LintConfig::default()
    }

    fn legacy() -> LintConfig {
        LintConfig {
            schema: SchemaVersion::Legacy,
            ..LintConfig::default()
        }
    }

    fn outcome<'a>(report: &'a LintReport, rule: &str) -> &'a LintOutcome {
        &report
            .results
            .iter()
            .find(|r| r.rule == rule)
            .expect("rule ran")
            .outcome
    }

    const V4_OK: &str = "feat(cache): add LRU cache\n\n## What\nAdded cache\n\n## Why\nPerf\n\n## Impact\nNone\n\nCo-Authored-By: x <x@example.com>\n";

    #[test]
    fn complete_v4_message_passes() {
        let report = lint(V4_OK, &v4());
        assert!(!report.has_errors());
        assert_eq!(report.failures().count(), 0);
        assert_eq!(report.results.len(), 6);
    }

    #[test]
    fn v4_failure_lists_every_missing_marker() {
        let report = lint("feat: x\n\n## What\nstuff\n", &v4());
        let out = outcome(&report, "require-v4-sections");
        assert!(!out.valid);
        assert!(out.message.starts_with("missing required sections (3):"));
        assert!(out.message.contains("   - Why"));
        assert!(out.message.contains("   - Impact"));
        assert!(out.message.contains("   - Co-Authored-By"));
        assert!(report.has_errors());
    }

    #[test]
    fn indented_headings_are_not_sections() {
        let msg = V4_OK.replace("## Why", "  ## Why");
        let out = require_v4_sections(&msg, &v4());
        assert_eq!(out.message, "missing required sections (1):\n   - Why");
    }

    #[test]
    fn header_rules() {
        let config = v4();
        assert!(!type_empty("just a sentence", &config).valid);
        assert!(!subject_empty("just a sentence", &config).valid);
        assert!(type_enum("just a sentence", &config).valid);
        assert!(type_case("just a sentence", &config).valid);
        assert!(!type_case("Feat: x", &config).valid);
        assert!(!type_enum("feature: x", &config).valid);
        assert!(type_enum("chore(deps): bump", &config).valid);
        assert!(!subject_empty("feat:    ", &config).valid);
    }

    #[test]
    fn long_subject_is_only_a_warning() {
        let msg = V4_OK.replace("add LRU cache", &"x".repeat(101));
        let report = lint(&msg, &v4());
        assert!(!outcome(&report, "subject-max-length").valid);
        assert!(!report.has_errors());
    }

    #[test]
    fn custom_types_replace_defaults() {
        let config = LintConfig {
            types: vec!["wip".to_string()],
            ..LintConfig::default()
        };
        assert!(type_enum("wip: x", &config).valid);
        let out = type_enum("feat: x", &config);
        assert_eq!(out.message, "type must be one of [wip] (got: feat)");
    }

    #[test]
    fn legacy_rules_replace_v4_rules() {
        let names: Vec<_> = rules_for(SchemaVersion::Legacy)
            .iter()
            .map(|r| r.name)
            .collect();
        assert!(names.contains(&"require-16-sections"));
        assert!(!names.contains(&"require-v4-sections"));

        let report = lint(V4_OK, &legacy());
        let out = outcome(&report, "require-16-sections");
        assert!(out.message.starts_with("missing required sections (14):"));
        assert!(out.message.contains("   - UI/UX 와이어프레임"));
        assert!(out.message.contains("   - 원본 프롬프트"));
    }

    #[test]
    fn journey_and_quality_only_checked_when_present() {
        let config = legacy();
        assert!(require_thinking_journey("feat: x", &config).valid);
        assert!(require_prompt_quality("feat: x", &config).valid);

        let msg = "feat: x\n\n## 사고 여정\n\n### 1. 문제 인식\n...\n### 6. 핵심 통찰\n...\n";
        let out = require_thinking_journey(msg, &config);
        assert!(!out.valid);
        assert!(out.message.starts_with("missing thinking journey steps (4):"));
        assert!(!out.message.contains("1. 문제 인식"));
    }

    #[test]
    fn quality_total_accepts_either_form() {
        let layers = "## 프롬프트 품질 검수\n계층 1: 구조적 완성도\n계층 2: 엔지니어링 기법\n계층 3: 맥락 최적화\n계층 4: 효과 검증\n계층 5: 할루시네이션 검증\n";
        let config = legacy();
        assert!(require_prompt_quality(&format!("{layers}| **총점** | 41/48 |"), &config).valid);
        assert!(require_prompt_quality(&format!("{layers}### 최종 평가"), &config).valid);

        let out = require_prompt_quality(layers, &config);
        assert_eq!(out.message, "missing prompt quality checks (1):\n   - 최종 평가 (총점/48)");
    }
}
