//! Settings resolution: flag > environment > `langsync.toml` > default.
//!
//! Flags and environment variables are both handled by clap and arrive here
//! as [`Overrides`]; this module layers them over the TOML file.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use langsync::{
    BatchTranslator, Locale, LocaleCatalog, RetryPolicy,
    translate::{DEFAULT_BATCH_SIZE, OpenAiCompatible, ProviderConfig, ProviderKind},
};
use serde::Deserialize;

use crate::validation::{validate_directory, validate_language_code};

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "langsync.toml";

const DEFAULT_PROVIDER: &str = "openai";
const DEFAULT_SOURCE_LOCALE: &str = "en";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_KEY_RETRIES: u32 = 2;

/// Contents of `langsync.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub source_locale: Option<String>,
    pub locales: Option<Vec<String>>,
    pub batch_size: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub key_retries: Option<u32>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        Self::parse(&text).map_err(|e| format!("Invalid config '{}': {}", path.display(), e))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project_root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub locales: Vec<String>,
    pub source_locale: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_root: PathBuf,
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub source_locale: String,
    /// Requested target locales; empty means the whole catalog.
    pub locales: Vec<String>,
    pub batch_size: usize,
    pub timeout: Duration,
    pub max_retries: u32,
    pub key_retries: u32,
}

impl Settings {
    pub fn resolve(mut overrides: Overrides) -> Result<Self, String> {
        let project_root = match overrides.project_root.take() {
            Some(root) => root,
            None => std::env::current_dir()
                .map_err(|e| format!("Cannot determine current directory: {}", e))?,
        };
        validate_directory(&project_root)?;
        // Discovered paths are joined onto this root, so it must not depend on the cwd.
        let project_root = std::fs::canonicalize(&project_root).map_err(|e| {
            format!("Cannot resolve project root '{}': {}", project_root.display(), e)
        })?;

        let file = match overrides.config.take() {
            Some(path) => FileConfig::load(&path)?,
            None => {
                let default_path = project_root.join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    FileConfig::load(&default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Self::merge(project_root, overrides, file)
    }

    fn merge(project_root: PathBuf, o: Overrides, file: FileConfig) -> Result<Self, String> {
        let source_locale = o
            .source_locale
            .or(file.source_locale)
            .unwrap_or_else(|| DEFAULT_SOURCE_LOCALE.to_string());
        validate_language_code(&source_locale)?;

        let locales = if o.locales.is_empty() {
            file.locales.unwrap_or_default()
        } else {
            o.locales
        };

        let batch_size = file.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        Ok(Settings {
            project_root,
            provider: o
                .provider
                .or(file.provider)
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            api_key: o.api_key.filter(|k| !k.trim().is_empty()),
            base_url: o.base_url.or(file.base_url),
            model: o.model.or(file.model),
            source_locale,
            locales,
            batch_size,
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            max_retries: file.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            key_retries: file.key_retries.unwrap_or(DEFAULT_KEY_RETRIES),
        })
    }

    /// Target locales after validation against `catalog`.
    pub fn target_locales(&self, catalog: &LocaleCatalog) -> Vec<Locale> {
        catalog.select(&self.locales)
    }

    pub fn source(&self, catalog: &LocaleCatalog) -> Locale {
        catalog.resolve(&self.source_locale)
    }

    /// Provider configuration. Fails without an API key or for an unknown provider.
    pub fn provider_config(&self) -> Result<ProviderConfig, String> {
        let kind = ProviderKind::from_str(&self.provider).map_err(|e| e.to_string())?;
        let api_key = self.api_key.clone().ok_or_else(|| {
            "Translation API key is required (use --api-key or TRANSLATION_API_KEY)".to_string()
        })?;
        Ok(ProviderConfig::new(kind, api_key)
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(self.timeout)
            .with_max_retries(self.max_retries))
    }

    /// Builds the batch translator over the configured HTTP provider.
    pub fn translator(&self) -> Result<BatchTranslator<OpenAiCompatible>, String> {
        let provider = OpenAiCompatible::new(self.provider_config()?).map_err(|e| e.to_string())?;
        tracing::info!(
            provider = %self.provider,
            model = provider.model(),
            endpoint = provider.endpoint(),
            "translation provider ready"
        );
        Ok(BatchTranslator::new(provider)
            .with_batch_size(self.batch_size)
            .with_retry_policy(RetryPolicy::new(self.key_retries, Duration::from_secs(1))))
    }
}
