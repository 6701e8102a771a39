//! # pjournal-core
//!
//! Extraction, validation and lint engine for prompt journals.
//!
//! Everything here is pure over supplied text; git and the filesystem live
//! in `pjournal-vault`.
//! - Frontmatter parsing ([`frontmatter`]) and section extraction ([`section`])
//! - Commit schema classification ([`classify`]) and record building
//!   ([`commit`], [`journal`], [`thinking`])
//! - The ranked merge of all sources ([`aggregate`])
//! - Document schemas ([`schema`]) and the validator ([`validate`])
//! - Commit-message lint rules ([`lint`])
//! - Journal statistics ([`stats`]) and journal drafts ([`scaffold`])
//! - Error hierarchy ([`PjError`], [`ConfigError`]) and [`Config`]

pub mod aggregate;
pub mod classify;
pub mod commit;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod history;
pub mod journal;
pub mod lint;
pub mod record;
pub mod scaffold;
pub mod schema;
pub mod section;
pub mod stats;
pub mod thinking;
pub mod validate;

pub use aggregate::{AggregateOutput, ExtractStats, Merged};
pub use classify::SchemaVersion;
pub use config::{Config, LintConfig};
pub use error::{ConfigError, PjError, Result};
pub use history::{HistoryProvider, ProjectInfo, RawCommit};
pub use record::{CommitRecord, JournalRecord, PromptRecord, Source, ThinkingRecord};
pub use schema::{DocumentKind, Severity};
pub use validate::ValidationResult;
