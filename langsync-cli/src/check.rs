use langsync::{BaselineAnalyzer, GitCli};
use langsync_cli::{
    config::Settings,
    discovery::{display_relative, find_default_files},
    report::{ChangeReport, FileChange, print_json},
};

/// Reports the uncommitted delta of every default file. No provider is contacted.
pub async fn run_check_changes_command(settings: &Settings) -> Result<(), String> {
    let root = &settings.project_root;
    let files = find_default_files(root)?;
    if files.is_empty() {
        return Err(format!(
            "No default strings.xml files found under {}",
            root.display()
        ));
    }

    let analyzer = BaselineAnalyzer::new(GitCli::new(root), root);
    let mut changes = Vec::new();
    for file in &files {
        let shown = display_relative(root, file);
        let diff = analyzer
            .analyze(file)
            .await
            .map_err(|e| format!("Failed to analyze {}: {}", shown, e))?;
        if !diff.is_empty() {
            changes.push(FileChange::from_diff(shown, &diff));
        }
    }

    print_json(&ChangeReport::new(root, changes))
}
