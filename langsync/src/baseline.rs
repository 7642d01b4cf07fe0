//! Computes the [`Diff`] of a default resource file against its last commit.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    diff::Diff,
    error::Error,
    traits::Parser,
    types::ResourceSet,
    vcs::{VersionControl, normalize_separators},
};

/// Diffs working-copy resource files against the last committed version.
pub struct BaselineAnalyzer<V> {
    vcs: V,
    working_dir: PathBuf,
}

impl<V: VersionControl> BaselineAnalyzer<V> {
    /// `working_dir` is the directory relative paths are resolved against. It
    /// may be a subdirectory of the repository.
    pub fn new(vcs: V, working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let working_dir = std::fs::canonicalize(&working_dir).unwrap_or(working_dir);
        BaselineAnalyzer { vcs, working_dir }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Computes the diff for `path` (absolute, or relative to the working directory).
    ///
    /// Reading or parsing the working copy is fatal for this file. A missing
    /// committed version is not: the previous snapshot is then empty.
    pub async fn analyze(&self, path: impl AsRef<Path>) -> Result<Diff, Error> {
        let absolute = self.absolute(path.as_ref());
        let repo_path = self.repository_path(&absolute).await?;

        let current = ResourceSet::read_or_default(&absolute)?;

        let status = self.vcs.status(&repo_path).await?;
        if status.is_new() {
            tracing::debug!(path = %repo_path, ?status, "file has no baseline, all entries added");
            return Ok(Diff::all_added(&current));
        }

        let previous = match self.vcs.committed_content(&repo_path).await {
            Ok(Some(content)) => parse_committed(&content)?,
            Ok(None) => ResourceSet::new(),
            Err(e) => {
                tracing::warn!(path = %repo_path, error = %e, "could not read committed version");
                ResourceSet::new()
            }
        };

        let diff = Diff::between(&previous, &current);
        tracing::debug!(
            path = %repo_path,
            added = diff.added.len(),
            modified = diff.modified.len(),
            deleted = diff.deleted.len(),
            order_changed = diff.order_changed,
            "computed baseline diff"
        );
        Ok(diff)
    }

    /// Whether `path` is untracked, newly added or modified.
    pub async fn has_uncommitted_changes(&self, path: impl AsRef<Path>) -> Result<bool, Error> {
        let absolute = self.absolute(path.as_ref());
        let repo_path = self.repository_path(&absolute).await?;
        Ok(self.vcs.status(&repo_path).await?.is_dirty())
    }

    /// Resolves `path` (absolute, or relative to the working directory) the
    /// way [`BaselineAnalyzer::analyze`] does.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        };
        // Resolve symlinks in the directory part so the path lines up with the
        // repository root reported by version control.
        match (joined.parent(), joined.file_name()) {
            (Some(parent), Some(name)) => std::fs::canonicalize(parent)
                .map(|p| p.join(name))
                .unwrap_or(joined),
            _ => joined,
        }
    }

    async fn repository_path(&self, absolute: &Path) -> Result<String, Error> {
        let root = self.vcs.repository_root().await?;
        let root = std::fs::canonicalize(&root).unwrap_or(root);
        let relative = absolute.strip_prefix(&root).map_err(|_| {
            Error::vcs_error(format!(
                "{} is outside the repository at {}",
                absolute.display(),
                root.display()
            ))
        })?;
        Ok(normalize_separators(relative))
    }
}

/// Parses committed content through a uniquely named scratch file that is
/// removed when this function returns, on success and on error alike.
fn parse_committed(content: &str) -> Result<ResourceSet, Error> {
    parse_committed_in(content, &std::env::temp_dir())
}

fn parse_committed_in(content: &str, scratch_dir: &Path) -> Result<ResourceSet, Error> {
    let mut scratch = tempfile::Builder::new()
        .prefix("langsync-baseline-")
        .suffix(".xml")
        .tempfile_in(scratch_dir)?;
    scratch.write_all(content.as_bytes())?;
    scratch.flush()?;
    ResourceSet::read_from(scratch.path())
}
