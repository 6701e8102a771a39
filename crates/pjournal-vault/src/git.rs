//! Commit history from the `git` command line.

use std::path::{Path, PathBuf};
use std::process::Command;

use pjournal_core::error::{PjError, Result};
use pjournal_core::history::{parse_log, HistoryProvider, RawCommit, LOG_FORMAT};

/// [`HistoryProvider`] backed by the `git` binary, run in `root`.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Run `git <args>` and return stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| PjError::Git(format!("git not available: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PjError::Git(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// The commit at `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns [`PjError::Git`] outside a repository or before the first commit.
    pub fn head(&self) -> Result<RawCommit> {
        self.recent_commits(1)?
            .into_iter()
            .next()
            .ok_or_else(|| PjError::Git("no commits".to_string()))
    }
}

impl HistoryProvider for GitCli {
    fn recent_commits(&self, limit: usize) -> Result<Vec<RawCommit>> {
        let format = format!("--format={LOG_FORMAT}");
        let count = format!("-{limit}");
        let output = self.run(&["log", &format, &count])?;
        Ok(parse_log(&output))
    }

    fn remote_url(&self) -> Result<Option<String>> {
        // `git config --get` exits 1 when the key is unset.
        match self.run(&["config", "--get", "remote.origin.url"]) {
            Ok(url) => Ok(Some(url.trim().to_string()).filter(|u| !u.is_empty())),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .is_ok_and(|o| o.status.success())
    }

    #[test]
    fn outside_a_repository_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cli = GitCli::new(dir.path());
        if !git(dir.path(), &["--version"]) {
            return;
        }
        assert!(matches!(cli.recent_commits(10), Err(PjError::Git(_))));
        assert!(cli.head().is_err());
        assert_eq!(cli.remote_url().unwrap(), None);
    }

    #[test]
    fn reads_commits_from_a_repository() {
        let dir = TempDir::new().unwrap();
        let path = dir.path();
        if !git(path, &["init", "-q"]) {
            return;
        }
        git(path, &["config", "user.email", "test@example.com"]);
        git(path, &["config", "user.name", "Test"]);
        git(
            path,
            &["commit", "-q", "--allow-empty", "-m", "feat: first\n\n## What\nthing"],
        );
        git(path, &["commit", "-q", "--allow-empty", "-m", "fix: second"]);
        git(
            path,
            &["remote", "add", "origin", "git@github.com:acme/widgets.git"],
        );

        let cli = GitCli::new(path);
        let commits = cli.recent_commits(10).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "fix: second");
        assert_eq!(commits[1].message, "feat: first\n\n## What\nthing");
        assert_eq!(commits[0].hash.len(), 40);

        assert_eq!(cli.recent_commits(1).unwrap().len(), 1);
        assert_eq!(cli.head().unwrap().hash, commits[0].hash);
        assert_eq!(
            cli.remote_url().unwrap().as_deref(),
            Some("git@github.com:acme/widgets.git")
        );
    }
}
