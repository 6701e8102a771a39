//! Repository configuration (`.pjournal.toml`).
//!
//! Every key is optional; a missing file means all defaults.

use serde::Deserialize;

use crate::classify::SchemaVersion;
use crate::error::ConfigError;
use crate::schema::COMMIT_TYPES;

/// File name looked up at the repository root.
pub const CONFIG_FILE: &str = ".pjournal.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Journal directory, relative to the repository root.
    pub journal_dir: String,
    /// Thinking log directory, relative to the repository root.
    pub thoughts_dir: String,
    /// Aggregate output file, relative to the repository root.
    pub output: String,
    /// Number of recent commits scanned by `extract`.
    pub history_limit: usize,
    pub lint: LintConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_dir: ".prompts".to_string(),
            thoughts_dir: ".thoughts".to_string(),
            output: "prompts.json".to_string(),
            history_limit: 500,
            lint: LintConfig::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document. `path` is only used in the error message.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on malformed TOML, unknown keys or an
    /// unknown lint schema.
    pub fn from_toml_str(source: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Invalid {
            path: path.to_string(),
            message: e.message().to_string(),
        })
    }
}

/// Settings for the commit-message linter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Which section rules apply.
    pub schema: SchemaVersion,
    pub subject_max_length: usize,
    /// Accepted conventional commit types.
    pub types: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            schema: SchemaVersion::V4,
            subject_max_length: 100,
            types: COMMIT_TYPES.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}
