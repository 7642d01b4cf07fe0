use std::time::Duration;

use indexmap::IndexMap;

use super::{
    BatchRequest, TranslationProvider, TranslationRequest,
    escape::{escape_newlines, unescape_newlines},
};
use crate::{
    error::Error,
    locale::{Locale, locale_directive},
    placeholder::{placeholders_match, signature},
};

/// Maximum number of keys sent in one provider request.
pub const DEFAULT_BATCH_SIZE: usize = 60;

/// Start of every failure sentinel value.
pub const FAILURE_SENTINEL_PREFIX: &str = "[TRANSLATION_FAILED: ";

/// Value stored for a key whose translation definitively failed.
pub fn failure_sentinel(locale: &str, source: &str) -> String {
    format!("{}{}] {}", FAILURE_SENTINEL_PREFIX, locale, source)
}

/// Whether `value` is a failure sentinel produced by [`failure_sentinel`].
pub fn is_failure_sentinel(value: &str) -> bool {
    value.starts_with(FAILURE_SENTINEL_PREFIX)
}

/// Retry behavior for the per-key fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Delay before retry `n` is `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_retries,
            base_delay,
        }
    }

    /// Retries without waiting.
    pub fn immediate(max_retries: u32) -> Self {
        RetryPolicy::new(max_retries, Duration::ZERO)
    }

    fn delay(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(2, Duration::from_secs(1))
    }
}

/// Result of translating one key set into one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// One value per requested key, in request order. Failed keys hold a
    /// failure sentinel.
    pub translations: IndexMap<String, String>,
    /// Keys whose translation failed after all retries.
    pub failed: Vec<String>,
    /// Keys whose translation came back identical to a non-trivial source.
    pub suspected_untranslated: Vec<String>,
    /// Keys whose translation does not carry the source's placeholders.
    pub placeholder_mismatches: Vec<String>,
    /// Number of chunk requests issued.
    pub chunks: usize,
}

impl BatchOutcome {
    /// Keys translated successfully.
    pub fn translated_count(&self) -> usize {
        self.translations.len() - self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Chunked, fault-tolerant translation of key/text maps.
///
/// Chunks of one call run sequentially. Concurrency across locales comes from
/// running several calls at once.
pub struct BatchTranslator<P> {
    provider: P,
    batch_size: usize,
    retry: RetryPolicy,
}

impl<P: TranslationProvider> BatchTranslator<P> {
    pub fn new(provider: P) -> Self {
        BatchTranslator {
            provider,
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Translates `texts` from `source` into `target`.
    ///
    /// Never fails as a whole: a chunk the provider cannot answer falls back to
    /// per-key requests, and keys that still fail are reported in
    /// [`BatchOutcome::failed`] with a sentinel value.
    pub async fn translate_batch(
        &self,
        texts: &IndexMap<String, String>,
        target: &Locale,
        source: &Locale,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let entries: Vec<(&String, &String)> = texts.iter().collect();

        for chunk in entries.chunks(self.batch_size) {
            outcome.chunks += 1;
            tracing::debug!(
                locale = %target.code,
                chunk = outcome.chunks,
                size = chunk.len(),
                "translating chunk"
            );
            self.translate_chunk(chunk, target, source, &mut outcome)
                .await;
        }

        if !outcome.suspected_untranslated.is_empty() {
            tracing::warn!(
                locale = %target.code,
                count = outcome.suspected_untranslated.len(),
                "strings appear untranslated, consider retrying with a different model"
            );
        }
        if outcome.has_failures() {
            tracing::error!(
                locale = %target.code,
                count = outcome.failed.len(),
                keys = %outcome.failed.join(", "),
                "keys failed to translate"
            );
        }
        outcome
    }

    async fn translate_chunk(
        &self,
        chunk: &[(&String, &String)],
        target: &Locale,
        source: &Locale,
        outcome: &mut BatchOutcome,
    ) {
        let request = BatchRequest {
            entries: chunk
                .iter()
                .map(|(k, v)| ((*k).clone(), escape_newlines(v)))
                .collect(),
            source: source.clone(),
            target: target.clone(),
            directive: locale_directive(&target.code).map(str::to_string),
        };

        let mut resolved: IndexMap<String, String> = IndexMap::new();
        let mut pending: Vec<(&String, &String)> = Vec::new();

        match self.provider.translate_batch(&request).await {
            Ok(response) => {
                for (key, text) in chunk {
                    match response.get(key.as_str()) {
                        Some(value) => {
                            resolved.insert((*key).clone(), unescape_newlines(value));
                        }
                        None => pending.push((*key, *text)),
                    }
                }
                if !pending.is_empty() {
                    tracing::warn!(
                        locale = %target.code,
                        missing = pending.len(),
                        "chunk response is missing keys, falling back to single requests"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    locale = %target.code,
                    error = %e,
                    "chunk translation failed, falling back to single requests"
                );
                pending.extend(chunk.iter().copied());
            }
        }

        for (key, text) in pending {
            match self.translate_single(key, text, target, source).await {
                Ok(value) => {
                    resolved.insert(key.clone(), value);
                }
                Err(e) => {
                    tracing::error!(
                        locale = %target.code,
                        key = %key,
                        error = %e,
                        "translation failed after retries"
                    );
                    outcome.failed.push(key.clone());
                    resolved.insert(key.clone(), failure_sentinel(&target.code, text));
                }
            }
        }

        for (key, text) in chunk {
            let Some(value) = resolved.shift_remove(key.as_str()) else {
                continue;
            };
            if !outcome.failed.iter().any(|f| f == *key) {
                review(key, text, &value, target, source, outcome);
            }
            outcome.translations.insert((*key).clone(), value);
        }
    }

    async fn translate_single(
        &self,
        key: &str,
        text: &str,
        target: &Locale,
        source: &Locale,
    ) -> Result<String, Error> {
        let request = TranslationRequest {
            text: escape_newlines(text),
            source: source.clone(),
            target: target.clone(),
            directive: locale_directive(&target.code).map(str::to_string),
        };

        let mut retry = 0;
        loop {
            match self.provider.translate(&request).await {
                Ok(value) => return Ok(unescape_newlines(&value)),
                Err(e) if retry < self.retry.max_retries => {
                    retry += 1;
                    tracing::warn!(
                        locale = %target.code,
                        key,
                        retry,
                        error = %e,
                        "retrying single translation"
                    );
                    tokio::time::sleep(self.retry.delay(retry)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Advisory checks on a successful translation. Logged and recorded, never rejected.
fn review(
    key: &str,
    source_text: &str,
    translated: &str,
    target: &Locale,
    source: &Locale,
    outcome: &mut BatchOutcome,
) {
    if target.code != source.code
        && translated == source_text
        && source_text.chars().count() > 3
    {
        tracing::warn!(
            locale = %target.code,
            key,
            value = translated,
            "translation is identical to the source"
        );
        outcome.suspected_untranslated.push(key.to_string());
    }

    if !placeholders_match(source_text, translated) {
        tracing::warn!(
            locale = %target.code,
            key,
            expected = ?signature(source_text),
            found = ?signature(translated),
            value = translated,
            "placeholders differ from the source"
        );
        outcome.placeholder_mismatches.push(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_sentinel_names_locale() {
        let sentinel = failure_sentinel("zh-TW", "Hello");
        assert_eq!(sentinel, "[TRANSLATION_FAILED: zh-TW] Hello");
        assert!(is_failure_sentinel(&sentinel));
        assert!(!is_failure_sentinel("Hello"));
    }

    #[test]
    fn test_retry_delay_grows_linearly() {
        let policy = RetryPolicy::new(2, Duration::from_millis(500));
        assert_eq!(policy.delay(1), Duration::from_millis(500));
        assert_eq!(policy.delay(2), Duration::from_secs(1));
        assert_eq!(RetryPolicy::immediate(3).delay(3), Duration::ZERO);
    }

    #[test]
    fn test_review_flags_passthrough_and_placeholders() {
        let en = Locale::new("en", "English", "values-en");
        let es = Locale::new("es", "Spanish", "values-es");
        let mut outcome = BatchOutcome::default();

        review("same", "Settings", "Settings", &es, &en, &mut outcome);
        review("short", "OK", "OK", &es, &en, &mut outcome);
        review("lost", "Hi %s", "Hola", &es, &en, &mut outcome);
        review("self", "Settings", "Settings", &en, &en, &mut outcome);

        assert_eq!(outcome.suspected_untranslated, vec!["same"]);
        assert_eq!(outcome.placeholder_mismatches, vec!["lost"]);
    }
}
