use std::path::{Path, PathBuf};

use langsync::{
    BaselineAnalyzer, GitCli, LocaleCatalog, SyncCoordinator, TranslationProvider, VersionControl,
    translate::OpenAiCompatible,
};
use langsync_cli::{
    config::Settings,
    discovery::{display_relative, find_default_files, module_default_file},
    report::{AggregateReport, FailedModule, ModuleReport, print_json},
    validation::validate_module_path,
};

fn build_coordinator(settings: &Settings) -> Result<SyncCoordinator<OpenAiCompatible>, String> {
    let translator = settings.translator()?;
    let catalog = LocaleCatalog::android();
    let locales = settings.target_locales(&catalog);
    let source = settings.source(&catalog);
    tracing::info!(
        source = %source.code,
        locales = %locales.iter().map(|l| l.code.as_str()).collect::<Vec<_>>().join(","),
        "target locales selected"
    );
    Ok(SyncCoordinator::new(translator, locales, source))
}

async fn sync_module<P: TranslationProvider, V: VersionControl>(
    coordinator: &SyncCoordinator<P>,
    analyzer: &BaselineAnalyzer<V>,
    root: &Path,
    default_file: &Path,
) -> ModuleReport {
    let shown = display_relative(root, default_file);
    tracing::info!(file = %shown, "processing module");
    match coordinator.sync_file(analyzer, default_file).await {
        Ok(summary) => ModuleReport::Synced(summary),
        Err(e) => {
            tracing::error!(file = %shown, error = %e, "module failed");
            ModuleReport::Failed(FailedModule::new(default_file, e.to_string()))
        }
    }
}

pub async fn run_translate_all_command(settings: &Settings) -> Result<(), String> {
    let root = &settings.project_root;
    let files = find_default_files(root)?;
    if files.is_empty() {
        return Err(format!(
            "No default strings.xml files found under {}",
            root.display()
        ));
    }

    let coordinator = build_coordinator(settings)?;
    let analyzer = BaselineAnalyzer::new(GitCli::new(root), root);

    // Files run one after another; locales within a file run concurrently.
    let mut modules = Vec::with_capacity(files.len());
    for file in &files {
        modules.push(sync_module(&coordinator, &analyzer, root, file).await);
    }

    let report = AggregateReport::from_modules(modules);
    tracing::info!(
        modules = report.total_modules,
        failed = report.failed_modules,
        strings = report.total_strings_processed,
        "translation finished"
    );
    print_json(&report)
}

pub async fn run_translate_module_command(
    settings: &Settings,
    module_path: &Path,
) -> Result<(), String> {
    let module_dir: PathBuf = if module_path.is_absolute() {
        module_path.to_path_buf()
    } else {
        settings.project_root.join(module_path)
    };
    validate_module_path(&module_dir)?;

    let coordinator = build_coordinator(settings)?;
    let analyzer = BaselineAnalyzer::new(GitCli::new(&module_dir), &module_dir);
    let default_file = module_default_file(&module_dir);

    let summary = coordinator
        .sync_file(&analyzer, &default_file)
        .await
        .map_err(|e| format!("Failed to translate {}: {}", default_file.display(), e))?;
    print_json(&summary)
}
