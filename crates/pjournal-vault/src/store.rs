//! Journal and thinking-log directories.
//!
//! Both directories are read-only inputs except for generated journals,
//! which are only ever created, never overwritten.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pjournal_core::error::{PjError, Result};
use pjournal_core::scaffold::JournalDraft;
use pjournal_core::validate::{validate, ValidationResult};
use pjournal_core::{journal, thinking, Config, DocumentKind, JournalRecord, ThinkingRecord};

/// A markdown file read from one of the directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub content: String,
}

/// The `.prompts` and `.thoughts` directories of a repository.
#[derive(Debug, Clone)]
pub struct JournalStore {
    journal_dir: PathBuf,
    thoughts_dir: PathBuf,
}

impl JournalStore {
    #[must_use]
    pub fn new(root: &Path, config: &Config) -> Self {
        Self {
            journal_dir: root.join(&config.journal_dir),
            thoughts_dir: root.join(&config.thoughts_dir),
        }
    }

    #[must_use]
    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    #[must_use]
    pub fn thoughts_dir(&self) -> &Path {
        &self.thoughts_dir
    }

    fn dir(&self, kind: DocumentKind) -> &Path {
        match kind {
            DocumentKind::Journal => &self.journal_dir,
            DocumentKind::Thinking => &self.thoughts_dir,
        }
    }

    /// Parsed journal records. Unreadable files are logged and skipped.
    #[must_use]
    pub fn journals(&self) -> Vec<JournalRecord> {
        self.documents(DocumentKind::Journal)
            .iter()
            .map(|doc| journal::build(&doc.filename, &doc.content))
            .collect()
    }

    /// Parsed thinking records. Unreadable files are logged and skipped.
    #[must_use]
    pub fn thinking_logs(&self) -> Vec<ThinkingRecord> {
        self.documents(DocumentKind::Thinking)
            .iter()
            .map(|doc| thinking::build(&doc.filename, &doc.content))
            .collect()
    }

    /// Readable documents of one kind, in filename order.
    #[must_use]
    pub fn documents(&self, kind: DocumentKind) -> Vec<Document> {
        let paths = match markdown_files(self.dir(kind)) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(error = %e, "skipping directory");
                return Vec::new();
            }
        };

        paths
            .into_iter()
            .filter_map(|path| match read_document(&path) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable file");
                    None
                }
            })
            .collect()
    }

    /// Validate every file of both kinds. Unreadable files yield an error entry.
    ///
    /// # Errors
    ///
    /// Returns [`PjError::FileAccess`] if a directory exists but cannot be listed.
    pub fn validate_all(&self) -> Result<Vec<ValidationResult>> {
        let mut results = Vec::new();
        for kind in [DocumentKind::Journal, DocumentKind::Thinking] {
            for path in markdown_files(self.dir(kind))? {
                let result = match read_document(&path) {
                    Ok(doc) => validate(kind, &doc.filename, &doc.content),
                    Err(e) => ValidationResult::unreadable(&file_name(&path), kind, &e.to_string()),
                };
                results.push(result);
            }
        }
        Ok(results)
    }

    /// Write `draft` into the journal directory unless a file of that name
    /// already exists. Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`PjError::FileAccess`] if the directory or file cannot be written.
    pub fn write_draft(&self, draft: &JournalDraft) -> Result<Option<PathBuf>> {
        let path = self.journal_dir.join(&draft.filename);
        if path.exists() {
            tracing::info!(path = %path.display(), "journal already exists");
            return Ok(None);
        }

        fs::create_dir_all(&self.journal_dir).map_err(|e| access(&self.journal_dir, e))?;
        fs::write(&path, &draft.content).map_err(|e| access(&path, e))?;
        tracing::info!(path = %path.display(), "journal written");
        Ok(Some(path))
    }
}

/// `*.md` files directly inside `dir`, sorted. A missing directory is empty.
///
/// # Errors
///
/// Returns [`PjError::FileAccess`] if `dir` exists but cannot be listed.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(access(dir, e)),
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    paths.sort();
    Ok(paths)
}

fn read_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| access(path, e))?;
    Ok(Document {
        filename: file_name(path),
        content,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn access(path: &Path, source: std::io::Error) -> PjError {
    PjError::FileAccess {
        path: path.display().to_string(),
        source,
    }
}
