#![forbid(unsafe_code)]
//! Git-driven machine translation for Android string resources.
//!
//! langsync keeps every `values-*/strings.xml` of a module in step with the
//! default `values/strings.xml`. It diffs the default file against its last
//! commit and pushes only that delta (added, modified and deleted keys, plus
//! ordering) into each locale file, leaving valid translations alone.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use langsync::{
//!     BaselineAnalyzer, BatchTranslator, GitCli, LocaleCatalog, SyncCoordinator,
//!     translate::{OpenAiCompatible, ProviderConfig, ProviderKind},
//! };
//!
//! # async fn run() -> Result<(), langsync::Error> {
//! let provider = OpenAiCompatible::new(ProviderConfig::new(ProviderKind::OpenAi, "sk-..."))?;
//! let catalog = LocaleCatalog::android();
//! let coordinator = SyncCoordinator::new(
//!     BatchTranslator::new(provider),
//!     catalog.select(&["es", "zh-TW"]),
//!     catalog.resolve("en"),
//! );
//! let analyzer = BaselineAnalyzer::new(GitCli::new("."), ".");
//! let summary = coordinator
//!     .sync_file(&analyzer, Path::new("app/src/main/res/values/strings.xml"))
//!     .await?;
//! println!("success: {}", summary.success);
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! - [`BaselineAnalyzer`] computes a [`Diff`] from the working copy and `HEAD`.
//! - [`BatchTranslator`] translates the changed keys per locale in chunks.
//! - [`reconcile`](reconcile::reconcile) merges, prunes and reorders one locale file.
//! - [`SyncCoordinator`] runs all locales concurrently into a [`RunSummary`].

pub mod baseline;
pub mod coordinator;
pub mod diff;
pub mod error;
pub mod formats;
pub mod locale;
pub mod placeholder;
pub mod reconcile;
pub mod traits;
pub mod translate;
pub mod types;
pub mod vcs;

// Re-export most used types for easy consumption
pub use crate::{
    baseline::BaselineAnalyzer,
    coordinator::{RunSummary, SyncCoordinator, TranslationResult},
    diff::Diff,
    error::Error,
    locale::{Locale, LocaleCatalog},
    reconcile::ReconcileOutcome,
    translate::{BatchOutcome, BatchTranslator, RetryPolicy, TranslationProvider},
    types::{ResourceSet, StringResource},
    vcs::{FileStatus, GitCli, VersionControl},
};
