//! Commit message schema classification.
//!
//! A message is classified by counting how many literal markers of each schema
//! it contains. Thresholds rather than exact matches let an author drop an
//! optional section without the whole commit falling out of the record.
//! The v4 schema is checked first.

use serde::{Deserialize, Serialize};

/// Markers of the 4-section commit format.
pub const V4_MARKERS: [&str; 4] = ["## What", "## Why", "## Impact", CO_AUTHORED_BY];

/// Minimum number of [`V4_MARKERS`] a v4 message must contain.
pub const V4_THRESHOLD: usize = 3;

/// Markers of the 16-section commit format (the header is the 16th section).
pub const LEGACY_MARKERS: [&str; 15] = [
    "## 산출물",
    "## 변경 영향도",
    "## 테스트 전략",
    "## 롤백 계획",
    "## 관련 이슈",
    "## Breaking Changes",
    "## 성능 벤치마크",
    "## 아키텍처 다이어그램",
    "## UI/UX 와이어프레임",
    "## 사고 여정",
    "### 원본 프롬프트",
    "### 프롬프트 분석",
    "### 최적화된 프롬프트",
    "## 프롬프트 품질 검수",
    CO_AUTHORED_BY,
];

/// Minimum number of [`LEGACY_MARKERS`] a legacy message must contain.
pub const LEGACY_THRESHOLD: usize = 10;

pub const CO_AUTHORED_BY: &str = "Co-Authored-By:";

/// A known commit message schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V4,
    Legacy,
}

impl SchemaVersion {
    #[must_use]
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            Self::V4 => &V4_MARKERS,
            Self::Legacy => &LEGACY_MARKERS,
        }
    }

    #[must_use]
    pub fn threshold(self) -> usize {
        match self {
            Self::V4 => V4_THRESHOLD,
            Self::Legacy => LEGACY_THRESHOLD,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V4 => "v4",
            Self::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v4" => Ok(Self::V4),
            "legacy" => Ok(Self::Legacy),
            other => Err(crate::error::ConfigError::UnknownSchema(other.to_string())),
        }
    }
}

/// Number of `markers` occurring anywhere in `message`.
#[must_use]
pub fn marker_count(message: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| message.contains(*m)).count()
}

/// Classify a raw commit message, or `None` if it satisfies no schema.
#[must_use]
pub fn classify(message: &str) -> Option<SchemaVersion> {
    [SchemaVersion::V4, SchemaVersion::Legacy]
        .into_iter()
        .find(|schema| marker_count(message, schema.markers()) >= schema.threshold())
}
