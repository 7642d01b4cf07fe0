//! Version-control collaborator used by the baseline analyzer.
//!
//! Only three questions are ever asked: where the repository root is, what
//! the working-tree status of one path is, and what that path contained at
//! the last commit.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::Error;

/// Working-tree status of a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Not known to version control.
    Untracked,
    /// Staged as a new file; no committed blob exists yet.
    Added,
    /// Tracked with uncommitted changes (staged or not).
    Modified,
    /// Tracked and identical to the last commit.
    Clean,
}

impl FileStatus {
    /// The path has no committed baseline.
    pub fn is_new(self) -> bool {
        matches!(self, FileStatus::Untracked | FileStatus::Added)
    }

    /// The path differs from the last commit.
    pub fn is_dirty(self) -> bool {
        !matches!(self, FileStatus::Clean)
    }
}

/// Repository queries needed to compute a baseline diff.
///
/// Paths passed in are relative to the repository root and use `/` separators.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Absolute path of the repository root.
    async fn repository_root(&self) -> Result<PathBuf, Error>;

    /// Status of one repository-relative path.
    async fn status(&self, path: &str) -> Result<FileStatus, Error>;

    /// Content of the path at the last commit, `None` when there is none.
    async fn committed_content(&self, path: &str) -> Result<Option<String>, Error>;
}

/// Renders a path with forward slashes regardless of platform.
pub fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    working_dir: PathBuf,
}

impl GitCli {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        GitCli {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, Error> {
        Command::new("git")
            .arg("-C")
            .arg(&self.working_dir)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::vcs_error(format!("failed to run git {}: {}", args.join(" "), e)))
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn repository_root(&self) -> Result<PathBuf, Error> {
        let out = self.run(&["rev-parse", "--show-toplevel"]).await?;
        if !out.status.success() {
            return Err(Error::vcs_error(format!(
                "{} is not inside a git repository: {}",
                self.working_dir.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        let root = String::from_utf8_lossy(&out.stdout).trim().to_string();
        Ok(PathBuf::from(root))
    }

    async fn status(&self, path: &str) -> Result<FileStatus, Error> {
        // Without a pathspec the porcelain paths are repository-relative.
        let out = self
            .run(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])
            .await?;
        if !out.status.success() {
            return Err(Error::vcs_error(format!(
                "git status failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        let listing = String::from_utf8_lossy(&out.stdout);
        Ok(status_from_porcelain(&listing, path))
    }

    async fn committed_content(&self, path: &str) -> Result<Option<String>, Error> {
        let spec = format!("HEAD:{}", path);
        let out = self.run(&["show", &spec]).await?;
        if !out.status.success() {
            tracing::debug!(
                path,
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "no committed content"
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&out.stdout).into_owned()))
    }
}

/// Looks `path` up in `git status --porcelain=v1 -z` output.
fn status_from_porcelain(listing: &str, path: &str) -> FileStatus {
    let wanted = path.replace('\\', "/");
    let mut records = listing.split('\0').filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        if record.len() < 4 {
            continue;
        }
        let (code, entry_path) = record.split_at(3);
        let mut flags = code.chars();
        let index = flags.next().unwrap_or(' ');
        let worktree = flags.next().unwrap_or(' ');

        // Renames and copies carry the original path as a separate record.
        if matches!(index, 'R' | 'C') {
            records.next();
        }

        if entry_path.replace('\\', "/") != wanted {
            continue;
        }

        return match (index, worktree) {
            ('?', '?') => FileStatus::Untracked,
            ('A', _) => FileStatus::Added,
            _ => FileStatus::Modified,
        };
    }

    FileStatus::Clean
}
