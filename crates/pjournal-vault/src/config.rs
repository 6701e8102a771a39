//! Loading `.pjournal.toml` from the repository root.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use pjournal_core::config::CONFIG_FILE;
use pjournal_core::error::{PjError, Result};
use pjournal_core::Config;

/// Load the repository config, or defaults when there is no config file.
///
/// # Errors
///
/// Returns [`PjError::FileAccess`] if the file exists but cannot be read and
/// [`PjError::Config`] if it is not a valid config.
pub fn load(root: &Path) -> Result<Config> {
    let path = root.join(CONFIG_FILE);
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(PjError::FileAccess {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let config = Config::from_toml_str(&source, &path.display().to_string())?;
    tracing::debug!(?config, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pjournal_core::SchemaVersion;
    use tempfile::TempDir;

    #[test]
    fn missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn reads_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "journal_dir = \"docs/prompts\"\n[lint]\nschema = \"legacy\"\n",
        )
        .unwrap();

        let config = load(dir.path()).unwrap();
        assert_eq!(config.journal_dir, "docs/prompts");
        assert_eq!(config.lint.schema, SchemaVersion::Legacy);
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "history_limit = \"many\"\n").unwrap();
        assert!(matches!(load(dir.path()), Err(PjError::Config(_))));
    }
}
