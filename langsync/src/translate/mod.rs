//! Machine translation: the provider boundary and the batch orchestrator.
//!
//! A [`TranslationProvider`] turns one text, or one chunk of keyed texts, into
//! the target language. [`BatchTranslator`] sits on top of it and owns
//! chunking, per-key fallback with retries, failure sentinels and advisory
//! quality checks.

mod batch;
mod escape;
pub mod openai;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::{error::Error, locale::Locale};

pub use batch::{
    BatchOutcome, BatchTranslator, DEFAULT_BATCH_SIZE, FAILURE_SENTINEL_PREFIX, RetryPolicy,
    failure_sentinel, is_failure_sentinel,
};
pub use escape::{NEWLINE_PLACEHOLDER, escape_newlines, unescape_newlines};
pub use openai::{OpenAiCompatible, ProviderConfig, ProviderKind};

/// One text to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source: Locale,
    pub target: Locale,
    /// Locale-specific instruction, see [`crate::locale::locale_directive`].
    pub directive: Option<String>,
}

/// A chunk of keyed texts translated in one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub entries: IndexMap<String, String>,
    pub source: Locale,
    pub target: Locale,
    pub directive: Option<String>,
}

/// A machine translation backend.
///
/// `translate_batch` should answer with the same key set it was given.
/// Missing keys are treated as failures of those keys by the caller; extra
/// keys are ignored.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translates a single text.
    async fn translate(&self, request: &TranslationRequest) -> Result<String, Error>;

    /// Translates a chunk of keyed texts.
    async fn translate_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<IndexMap<String, String>, Error>;
}

#[async_trait]
impl<P: TranslationProvider + ?Sized> TranslationProvider for Box<P> {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, Error> {
        (**self).translate(request).await
    }

    async fn translate_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<IndexMap<String, String>, Error> {
        (**self).translate_batch(request).await
    }
}
