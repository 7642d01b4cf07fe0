//! JSON reports printed on stdout by each command.

use std::path::PathBuf;

use langsync::{Diff, RunSummary};
use serde::Serialize;

/// A module that could not be analyzed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedModule {
    pub file: PathBuf,
    pub success: bool,
    pub error: String,
}

impl FailedModule {
    pub fn new(file: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        FailedModule {
            file: file.into(),
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModuleReport {
    Synced(RunSummary),
    Failed(FailedModule),
}

impl ModuleReport {
    pub fn is_success(&self) -> bool {
        match self {
            ModuleReport::Synced(summary) => summary.success,
            ModuleReport::Failed(_) => false,
        }
    }

    pub fn total_strings(&self) -> usize {
        match self {
            ModuleReport::Synced(summary) => summary.total_strings,
            ModuleReport::Failed(_) => 0,
        }
    }
}

/// Output of `translate-all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub total_modules: usize,
    pub total_strings_processed: usize,
    pub successful_modules: usize,
    pub failed_modules: usize,
    pub modules: Vec<ModuleReport>,
}

impl AggregateReport {
    pub fn from_modules(modules: Vec<ModuleReport>) -> Self {
        let successful_modules = modules.iter().filter(|m| m.is_success()).count();
        AggregateReport {
            total_modules: modules.len(),
            total_strings_processed: modules.iter().map(ModuleReport::total_strings).sum(),
            successful_modules,
            failed_modules: modules.len() - successful_modules,
            modules,
        }
    }
}

/// One changed default file in the `check-changes` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub file: String,
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub order_changed: bool,
}

impl FileChange {
    pub fn from_diff(file: impl Into<String>, diff: &Diff) -> Self {
        FileChange {
            file: file.into(),
            added: diff.added.keys().cloned().collect(),
            modified: diff.modified.keys().cloned().collect(),
            deleted: diff.deleted.iter().cloned().collect(),
            order_changed: diff.order_changed,
        }
    }
}

/// Output of `check-changes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub project_root: PathBuf,
    pub files_with_changes: usize,
    pub changes: Vec<FileChange>,
}

impl ChangeReport {
    pub fn new(project_root: impl Into<PathBuf>, changes: Vec<FileChange>) -> Self {
        ChangeReport {
            project_root: project_root.into(),
            files_with_changes: changes.len(),
            changes,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_counts_failed_files() {
        let diff = Diff {
            added: [("a".to_string(), "A".to_string())].into_iter().collect(),
            ..Diff::default()
        };
        let modules = vec![
            ModuleReport::Synced(RunSummary::from_diff("app/strings.xml", &diff)),
            ModuleReport::Failed(FailedModule::new("lib/strings.xml", "bad xml")),
        ];
        let report = AggregateReport::from_modules(modules);
        assert_eq!(report.total_modules, 2);
        assert_eq!(report.total_strings_processed, 1);
        assert_eq!(report.successful_modules, 1);
        assert_eq!(report.failed_modules, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["modules"][1]["error"], "bad xml");
        assert_eq!(json["modules"][1]["success"], false);
        assert_eq!(json["modules"][0]["added_strings"], 1);
    }

    #[test]
    fn test_file_change_lists_keys() {
        let diff = Diff {
            modified: [("title".to_string(), "Home".to_string())].into_iter().collect(),
            deleted: ["old".to_string()].into_iter().collect(),
            order_changed: true,
            ..Diff::default()
        };
        let change = FileChange::from_diff("app/src/main/res/values/strings.xml", &diff);
        assert!(change.added.is_empty());
        assert_eq!(change.modified, vec!["title"]);
        assert_eq!(change.deleted, vec!["old"]);
        assert!(change.order_changed);
        assert_eq!(ChangeReport::new("/p", vec![change]).files_with_changes, 1);
    }
}
