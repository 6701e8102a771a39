//! Document schemas for on-disk journals and thinking logs.
//!
//! A schema is a static table: required and recommended frontmatter fields,
//! enumerated values with their severity, required and recommended sections.

use serde::{Deserialize, Serialize};

use crate::journal::sections as journal_sections;
use crate::thinking::sections as thinking_sections;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Makes the document (or commit message) invalid.
    Error,
    /// Advisory only.
    Warning,
}

/// Which schema a document is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Journal,
    Thinking,
}

impl DocumentKind {
    #[must_use]
    pub fn schema(self) -> &'static DocumentSchema {
        match self {
            Self::Journal => &JOURNAL_SCHEMA,
            Self::Thinking => &THINKING_SCHEMA,
        }
    }
}

/// A frontmatter field restricted to a fixed set of values.
#[derive(Debug, Clone, Copy)]
pub struct EnumField {
    pub field: &'static str,
    pub allowed: &'static [&'static str],
    pub severity: Severity,
}

/// The frontmatter and section contract of one document kind.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSchema {
    pub kind: DocumentKind,
    pub required_fields: &'static [&'static str],
    pub recommended_fields: &'static [&'static str],
    pub enum_fields: &'static [EnumField],
    /// Inclusive bounds for `quality_score`, when the schema scores documents.
    pub quality_score_range: Option<(f64, f64)>,
    pub required_sections: &'static [&'static str],
    /// Severity of a missing required section.
    pub missing_section: Severity,
    pub recommended_sections: &'static [&'static str],
}

pub const DOMAINS: &[&str] = &[
    "backend",
    "frontend",
    "devops",
    "docs",
    "test",
    "refactor",
    "security",
    "performance",
    "general",
];

pub const COMPLEXITIES: &[&str] = &["low", "medium", "high"];

/// Grades from best to worst.
pub const GRADES: &[&str] = &["S", "A+", "A", "B+", "B", "C", "F"];

/// Conventional commit types accepted by the header rules.
pub const COMMIT_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore", "ci", "revert", "build",
];

/// Types a thinking log may declare (`unknown` when it was written without a commit).
const THINKING_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore", "ci", "revert", "build",
    "unknown",
];

pub const MAX_QUALITY_SCORE: f64 = 48.0;

/// Minimum body length (characters, frontmatter excluded) before a warning.
pub const MIN_BODY_CHARS: usize = 100;

pub static JOURNAL_SCHEMA: DocumentSchema = DocumentSchema {
    kind: DocumentKind::Journal,
    required_fields: &["date", "domain", "complexity"],
    recommended_fields: &["commit", "quality_score", "grade"],
    enum_fields: &[
        EnumField {
            field: "domain",
            allowed: DOMAINS,
            severity: Severity::Warning,
        },
        EnumField {
            field: "complexity",
            allowed: COMPLEXITIES,
            severity: Severity::Error,
        },
        EnumField {
            field: "grade",
            allowed: GRADES,
            severity: Severity::Warning,
        },
    ],
    quality_score_range: Some((0.0, MAX_QUALITY_SCORE)),
    required_sections: &[
        journal_sections::ORIGINAL_PROMPT,
        journal_sections::THINKING,
        journal_sections::OPTIMIZED_PROMPT,
    ],
    missing_section: Severity::Error,
    recommended_sections: &[
        journal_sections::QUALITY,
        journal_sections::LEARNING,
        journal_sections::OUTCOME,
    ],
};

pub static THINKING_SCHEMA: DocumentSchema = DocumentSchema {
    kind: DocumentKind::Thinking,
    required_fields: &["date", "subject"],
    recommended_fields: &["commit", "type"],
    enum_fields: &[EnumField {
        field: "type",
        allowed: THINKING_TYPES,
        severity: Severity::Warning,
    }],
    quality_score_range: None,
    required_sections: &[
        thinking_sections::GATHER,
        thinking_sections::SELECT,
        thinking_sections::DETECT,
        thinking_sections::DECIDE,
    ],
    missing_section: Severity::Warning,
    recommended_sections: &[thinking_sections::INSIGHT],
};
