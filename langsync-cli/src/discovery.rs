use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

/// Location of a module's default strings file, relative to the module.
pub const DEFAULT_FILE_SUFFIX: &str = "src/main/res/values/strings.xml";

/// Pattern of default strings files, relative to the project root.
pub const DEFAULT_FILE_PATTERN: &str = "**/src/main/res/values/strings.xml";

pub fn module_default_file(module_dir: &Path) -> PathBuf {
    module_dir.join(DEFAULT_FILE_SUFFIX)
}

fn default_file_matcher() -> Result<GlobMatcher, String> {
    // literal_separator so `*` never crosses '/'
    let glob = GlobBuilder::new(DEFAULT_FILE_PATTERN)
        .literal_separator(true)
        .build()
        .map_err(|e| format!("Invalid glob pattern '{}': {}", DEFAULT_FILE_PATTERN, e))?;
    Ok(glob.compile_matcher())
}

/// Finds every default strings file under `root`.
/// Uses ignore + globset for a .gitignore-aware traversal; results are sorted.
pub fn find_default_files(root: &Path) -> Result<Vec<PathBuf>, String> {
    let matcher = default_file_matcher()?;
    let walker = WalkBuilder::new(root)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .hidden(true)
        .ignore(true)
        .parents(true)
        .build();

    let mut found = Vec::new();
    for dent in walker {
        let dent = match dent {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !dent.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let relative = dent.path().strip_prefix(root).unwrap_or(dent.path());
        if matcher.is_match(relative) {
            found.push(dent.path().to_path_buf());
        }
    }

    found.sort();
    found.dedup();
    tracing::debug!(root = %root.display(), count = found.len(), "discovered default files");
    Ok(found)
}

/// Renders `path` relative to `root` when possible.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
