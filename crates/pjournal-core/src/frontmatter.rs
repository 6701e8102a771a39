//! YAML-like frontmatter parsing.
//!
//! Journal and thinking-log files open with a `---` delimited block of
//! hand-written `key: value` lines:
//! ```markdown
//! ---
//! date: 2025-01-01
//! domain: backend
//! quality_score: 42
//! tags: [cache, perf]
//! grade: "A+"
//! ---
//!
//! # Body content here
//! ```
//!
//! This is not a YAML parser. Each line is typed on its own and anything that
//! does not look like `key: value` is skipped, but recorded, so callers can
//! tell a field that is absent from one that was written but ignored.

use std::collections::BTreeMap;

use serde::Serialize;

const DELIMITER: &str = "---";

/// A single typed frontmatter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Null,
    Number(f64),
    List(Vec<String>),
    Text(String),
}

impl FrontmatterValue {
    /// Infer the type of a raw (already trimmed) value.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        let value = raw.trim();

        if value.len() >= 2 && value.starts_with('[') && value.ends_with(']') {
            let items = value[1..value.len() - 1]
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            return Self::List(items);
        }
        if let Some(n) = parse_number(value) {
            return Self::Number(n);
        }
        if value.is_empty() || value == "null" {
            return Self::Null;
        }
        Self::Text(unquote(value).to_string())
    }

    /// Render scalars as text. Numbers come back without a trailing `.0`
    /// so that a numeric-looking commit hash survives as written.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Null | Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Outcome of looking a key up in a parsed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    /// The key is present with a non-null value.
    Present(&'a FrontmatterValue),
    /// The key is present but its value is `null` or empty.
    Null,
    /// No line defines the key.
    Absent,
}

impl<'a> Field<'a> {
    /// The value, if present and non-null.
    #[must_use]
    pub fn value(self) -> Option<&'a FrontmatterValue> {
        match self {
            Field::Present(v) => Some(v),
            Field::Null | Field::Absent => None,
        }
    }
}

/// A line inside the block that was not a `key: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number within the frontmatter block.
    pub line: usize,
    pub text: String,
}

/// Parsed frontmatter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    found: bool,
    fields: BTreeMap<String, FrontmatterValue>,
    skipped: Vec<SkippedLine>,
}

impl Frontmatter {
    /// Parse the frontmatter at the top of `content`.
    ///
    /// Never fails: a document without a delimited block yields an empty,
    /// not-found mapping.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let Some((block, _)) = split_frontmatter(content) else {
            return Self::default();
        };

        let mut fields = BTreeMap::new();
        let mut skipped = Vec::new();

        for (idx, raw_line) in block.lines().enumerate() {
            let line = raw_line.trim_end_matches('\r');
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match split_key_value(line) {
                Some((key, value)) => {
                    fields.insert(key.to_string(), FrontmatterValue::infer(value));
                }
                None => skipped.push(SkippedLine {
                    line: idx + 1,
                    text: line.to_string(),
                }),
            }
        }

        Self {
            found: true,
            fields,
            skipped,
        }
    }

    /// Whether the document had a delimited block at all.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.found
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Field<'_> {
        match self.fields.get(key) {
            None => Field::Absent,
            Some(v) if v.is_null() => Field::Null,
            Some(v) => Field::Present(v),
        }
    }

    /// Non-null value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.field(key).value()
    }

    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(FrontmatterValue::as_text)
    }

    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FrontmatterValue::as_number)
    }

    #[must_use]
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(FrontmatterValue::as_list)
    }

    /// Lines that were ignored because they were not `key: value` pairs.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a document into its raw frontmatter block and the body after it.
///
/// Returns `None` unless the document starts with a `---` line and a later
/// line starts with `---`.
#[must_use]
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let after_open = content.strip_prefix(DELIMITER)?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    let (block, rest) = if let Some(rest) = after_open.strip_prefix(DELIMITER) {
        ("", rest)
    } else {
        let close = after_open.find("\n---")?;
        (&after_open[..close], &after_open[close + 1 + DELIMITER.len()..])
    };

    // Drop the remainder of the closing delimiter line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => "",
    };
    Some((block.trim_end_matches('\r'), body))
}

/// Document body with any leading frontmatter block removed.
#[must_use]
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content).map_or(content, |(_, body)| body)
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_number(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
