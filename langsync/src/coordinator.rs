//! Fans one [`Diff`] out to every configured locale and collects the results.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    baseline::BaselineAnalyzer,
    diff::Diff,
    error::Error,
    locale::Locale,
    reconcile::{ReconcileOutcome, reconcile},
    translate::{BatchTranslator, TranslationProvider},
    vcs::VersionControl,
};

/// Outcome for one locale of one default file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub locale: String,
    pub file_path: PathBuf,
    pub translated_count: usize,
    pub errors: Vec<String>,
    /// Whether the locale file was rewritten.
    pub written: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suspected_untranslated: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub placeholder_mismatches: Vec<String>,
}

impl TranslationResult {
    pub fn new(locale: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        TranslationResult {
            locale: locale.into(),
            file_path: file_path.into(),
            ..TranslationResult::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate result of synchronizing one default file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub file: PathBuf,
    pub total_strings: usize,
    pub added_strings: usize,
    pub modified_strings: usize,
    pub deleted_strings: usize,
    pub order_changed: bool,
    pub locales: Vec<TranslationResult>,
    /// False iff any locale reported an error.
    pub success: bool,
}

impl RunSummary {
    pub fn from_diff(file: impl Into<PathBuf>, diff: &Diff) -> Self {
        RunSummary {
            file: file.into(),
            total_strings: diff.total_strings(),
            added_strings: diff.added.len(),
            modified_strings: diff.modified.len(),
            deleted_strings: diff.deleted.len(),
            order_changed: diff.order_changed,
            locales: Vec::new(),
            success: true,
        }
    }

    pub fn record(&mut self, result: TranslationResult) {
        if !result.is_success() {
            self.success = false;
        }
        self.locales.push(result);
    }

    pub fn locale(&self, code: &str) -> Option<&TranslationResult> {
        self.locales.iter().find(|r| r.locale == code)
    }
}

/// Drives translation and reconciliation of one diff across all locales.
pub struct SyncCoordinator<P> {
    translator: BatchTranslator<P>,
    locales: Vec<Locale>,
    source: Locale,
}

impl<P: TranslationProvider> SyncCoordinator<P> {
    /// `locales` should already be validated against the catalog, see
    /// [`crate::locale::LocaleCatalog::select`].
    pub fn new(translator: BatchTranslator<P>, locales: Vec<Locale>, source: Locale) -> Self {
        SyncCoordinator {
            translator,
            locales,
            source,
        }
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn source(&self) -> &Locale {
        &self.source
    }

    pub fn translator(&self) -> &BatchTranslator<P> {
        &self.translator
    }

    /// Computes the diff of `default_path` with `analyzer` and applies it.
    ///
    /// An error means this file could not be analyzed; nothing was written.
    pub async fn sync_file<V: VersionControl>(
        &self,
        analyzer: &BaselineAnalyzer<V>,
        default_path: &Path,
    ) -> Result<RunSummary, Error> {
        let default_path = analyzer.absolute(default_path);
        let diff = analyzer.analyze(&default_path).await?;
        Ok(self.sync(&default_path, &diff).await)
    }

    /// Applies `diff` of the default file at `default_path` to every locale
    /// concurrently. Failures are captured per locale.
    pub async fn sync(&self, default_path: &Path, diff: &Diff) -> RunSummary {
        let mut summary = RunSummary::from_diff(default_path, diff);
        if diff.is_empty() {
            tracing::info!(file = %default_path.display(), "no changes detected");
            return summary;
        }

        let to_translate = diff.strings_to_translate();
        let tasks = self
            .locales
            .iter()
            .map(|locale| self.sync_locale(default_path, locale, &to_translate, diff));

        for result in join_all(tasks).await {
            summary.record(result);
        }

        tracing::info!(
            file = %default_path.display(),
            locales = summary.locales.len(),
            success = summary.success,
            "file synchronized"
        );
        summary
    }

    async fn sync_locale(
        &self,
        default_path: &Path,
        locale: &Locale,
        to_translate: &IndexMap<String, String>,
        diff: &Diff,
    ) -> TranslationResult {
        let target_path = locale.resource_path(default_path);
        let mut result = TranslationResult::new(locale.code.clone(), target_path.clone());

        let mut translations = IndexMap::new();
        if !to_translate.is_empty() {
            tracing::info!(
                locale = %locale.code,
                count = to_translate.len(),
                "translating strings"
            );
            let outcome = self
                .translator
                .translate_batch(to_translate, locale, &self.source)
                .await;

            result.translated_count = outcome.translated_count();
            for key in &outcome.failed {
                result
                    .errors
                    .push(format!("Failed to translate `{}` to {}", key, locale.code));
            }
            result.suspected_untranslated = outcome.suspected_untranslated;
            result.placeholder_mismatches = outcome.placeholder_mismatches;
            translations = outcome.translations;
        }

        match reconcile(
            &target_path,
            &translations,
            &diff.deleted,
            &diff.current_order,
            diff.order_changed,
        ) {
            Ok(ReconcileOutcome::Written { .. }) => result.written = true,
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    locale = %locale.code,
                    path = %target_path.display(),
                    error = %e,
                    "failed to update locale file"
                );
                result.errors.push(format!(
                    "Failed to update {} for {}: {}",
                    target_path.display(),
                    locale.code,
                    e
                ));
            }
        }

        result
    }
}
