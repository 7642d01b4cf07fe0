//! OpenAI-compatible chat-completions provider.
//!
//! One implementation serves every backend that speaks this protocol; the
//! backends differ only in endpoint and default model ([`ProviderKind`]).

use std::{fmt::Display, str::FromStr, time::Duration};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{BatchRequest, NEWLINE_PLACEHOLDER, TranslationProvider, TranslationRequest};
use crate::error::Error;

const SINGLE_SYSTEM_PROMPT: &str = "You are a professional translator specializing in mobile app localization. You preserve formatting placeholders and ensure translations are concise and appropriate for UI elements.";
const BACKOFF_BASE_MS: u64 = 500;
const BACKOFF_CAP_MS: u64 = 30_000;
const BATCH_SYSTEM_PROMPT: &str = "You are a professional translator specializing in mobile app localization. Return only valid JSON with translated values. Preserve all formatting placeholders.";

/// Known translation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    DeepSeek,
    Anthropic,
    Google,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
        }
    }

    /// Base URL used when none is configured.
    pub fn default_base_url(self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("https://api.openai.com/v1"),
            ProviderKind::DeepSeek => Some("https://api.deepseek.com"),
            ProviderKind::Anthropic | ProviderKind::Google => None,
        }
    }

    /// Model used when none is configured.
    pub fn default_model(self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("gpt-4o-mini"),
            ProviderKind::DeepSeek => Some("deepseek-chat"),
            ProviderKind::Anthropic | ProviderKind::Google => None,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "google" => Ok(ProviderKind::Google),
            other => Err(Error::UnsupportedProvider(other.to_string())),
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection settings for [`OpenAiCompatible`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Transport-level retries for timeouts, connection errors, 429 and 5xx.
    pub max_retries: u32,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        ProviderConfig {
            kind,
            api_key: api_key.into(),
            base_url: None,
            model: None,
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: Option<String>,
}

/// [`TranslationProvider`] for OpenAI-compatible chat-completions endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiCompatible {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl OpenAiCompatible {
    pub fn new(config: ProviderConfig) -> Result<Self, Error> {
        if matches!(config.kind, ProviderKind::Anthropic | ProviderKind::Google) {
            return Err(Error::UnsupportedProvider(config.kind.to_string()));
        }
        let base_url = config
            .base_url
            .clone()
            .or_else(|| config.kind.default_base_url().map(str::to_string))
            .ok_or_else(|| Error::UnsupportedProvider(config.kind.to_string()))?;
        let model = config
            .model
            .clone()
            .or_else(|| config.kind.default_model().map(str::to_string))
            .ok_or_else(|| Error::UnsupportedProvider(config.kind.to_string()))?;
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("an API key is required".to_string()));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(OpenAiCompatible {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: config.api_key,
            model,
            max_retries: config.max_retries,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, body: &ChatRequest<'_>) -> Result<String, Error> {
        let mut attempt = 0u32;
        loop {
            let sent = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await;

            let retryable = match sent {
                Ok(response) if response.status().is_success() => {
                    let parsed: ChatResponse = response.json().await?;
                    return parsed
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.message.content)
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty())
                        .ok_or_else(|| Error::provider_error("no response content", None));
                }
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 429 || status.is_server_error() {
                        status.to_string()
                    } else {
                        let detail = response.text().await.unwrap_or_default();
                        return Err(Error::provider_error(
                            format!("HTTP {}: {}", status, detail.trim()),
                            None,
                        ));
                    }
                }
                Err(e) if e.is_timeout() || e.is_connect() => e.to_string(),
                Err(e) => return Err(Error::Http(e)),
            };

            if attempt >= self.max_retries {
                return Err(Error::provider_error(
                    format!("giving up after {} attempts: {}", attempt + 1, retryable),
                    None,
                ));
            }
            attempt += 1;
            tracing::debug!(attempt, reason = %retryable, "retrying provider request");
            tokio::time::sleep(backoff(attempt)).await;
        }
    }
}

#[async_trait]
impl TranslationProvider for OpenAiCompatible {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, Error> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SINGLE_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: single_prompt(request),
                },
            ],
            temperature: 0.3,
            max_tokens: 500,
            response_format: None,
        };
        let content = self.complete(&body).await?;
        Ok(strip_quotes(&content).to_string())
    }

    async fn translate_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<IndexMap<String, String>, Error> {
        if request.entries.is_empty() {
            return Ok(IndexMap::new());
        }
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: BATCH_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: batch_prompt(request)?,
                },
            ],
            temperature: 0.3,
            max_tokens: 4000,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let content = self.complete(&body).await?;
        parse_batch_response(&content)
    }
}

fn directive_suffix(directive: &Option<String>) -> String {
    match directive {
        Some(d) => format!("\nIMPORTANT: {}", d),
        None => String::new(),
    }
}

fn single_prompt(request: &TranslationRequest) -> String {
    format!(
        "Translate the following Android app string resource from {} to {}.\n\
         Keep the translation natural and appropriate for mobile UI.\n\
         Preserve any placeholders like %s, %d, %1$s, etc.\n\
         IMPORTANT: Preserve the placeholder {} exactly as it appears - do not translate or modify it.{}\n\
         Only return the translated text without any explanation.\n\n\
         Text to translate: \"{}\"",
        request.source.name,
        request.target.name,
        NEWLINE_PLACEHOLDER,
        directive_suffix(&request.directive),
        request.text
    )
}

fn batch_prompt(request: &BatchRequest) -> Result<String, Error> {
    let input = serde_json::to_string_pretty(&request.entries)?;
    Ok(format!(
        "Translate the following Android app string resources from {} to {}.\n\
         Keep translations natural and appropriate for mobile UI.\n\
         Preserve any placeholders like %s, %d, %1$s, etc.\n\
         IMPORTANT: Preserve the placeholder {} exactly as it appears - do not translate or modify it.{}\n\
         Return ONLY a JSON object with the same keys and translated values.\n\n\
         Input JSON:\n{}",
        request.source.name,
        request.target.name,
        NEWLINE_PLACEHOLDER,
        directive_suffix(&request.directive),
        input
    ))
}

/// Delay before transport retry `attempt`: 500ms × 2^attempt, capped at 30s.
fn backoff(attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_CAP_MS))
}

/// Parses a JSON object of string values, tolerating a Markdown code fence.
fn parse_batch_response(content: &str) -> Result<IndexMap<String, String>, Error> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(body.trim())?)
}

/// Removes one pair of quotes wrapping the whole answer.
fn strip_quotes(content: &str) -> &str {
    content
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn locales() -> (Locale, Locale) {
        (
            Locale::new("en", "English", "values-en"),
            Locale::new("zh-TW", "Traditional Chinese (Taiwan)", "values-zh-rTW"),
        )
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(2));
        assert_eq!(backoff(6), Duration::from_secs(30));
        assert_eq!(backoff(60), Duration::from_secs(30));
        assert_eq!(backoff(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("deepseek".parse::<ProviderKind>().unwrap(), ProviderKind::DeepSeek);
        assert!(matches!(
            "mystery".parse::<ProviderKind>(),
            Err(Error::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_presets_resolve_endpoint_and_model() {
        let provider =
            OpenAiCompatible::new(ProviderConfig::new(ProviderKind::DeepSeek, "key")).unwrap();
        assert_eq!(provider.endpoint(), "https://api.deepseek.com/chat/completions");
        assert_eq!(provider.model(), "deepseek-chat");

        let custom = OpenAiCompatible::new(
            ProviderConfig::new(ProviderKind::OpenAi, "key")
                .with_base_url(Some("http://localhost:8080/v1/".to_string()))
                .with_model(Some("local".to_string())),
        )
        .unwrap();
        assert_eq!(custom.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(custom.model(), "local");
    }

    #[test]
    fn test_unimplemented_providers_rejected() {
        for kind in [ProviderKind::Anthropic, ProviderKind::Google] {
            assert!(matches!(
                OpenAiCompatible::new(ProviderConfig::new(kind, "key")),
                Err(Error::UnsupportedProvider(_))
            ));
        }
    }

    #[test]
    fn test_missing_api_key_rejected() {
        assert!(matches!(
            OpenAiCompatible::new(ProviderConfig::new(ProviderKind::OpenAi, " ")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_batch_prompt_carries_entries_and_directive() {
        let (en, zh) = locales();
        let request = BatchRequest {
            entries: [("greet".to_string(), "Hello__NEWLINE__there".to_string())]
                .into_iter()
                .collect(),
            source: en,
            target: zh,
            directive: Some("Use Traditional Chinese characters.".to_string()),
        };
        let prompt = batch_prompt(&request).unwrap();
        assert!(prompt.contains("from English to Traditional Chinese (Taiwan)"));
        assert!(prompt.contains("\"greet\": \"Hello__NEWLINE__there\""));
        assert!(prompt.contains("IMPORTANT: Use Traditional Chinese characters."));
    }

    #[test]
    fn test_single_prompt_without_directive() {
        let (en, zh) = locales();
        let request = TranslationRequest {
            text: "Save".to_string(),
            source: en,
            target: zh,
            directive: None,
        };
        let prompt = single_prompt(&request);
        assert!(prompt.ends_with("Text to translate: \"Save\""));
        assert!(!prompt.contains("IMPORTANT: Use"));
    }

    #[test]
    fn test_parse_batch_response_variants() {
        let plain = parse_batch_response(r#"{"a": "uno", "b": "dos"}"#).unwrap();
        assert_eq!(plain.keys().collect::<Vec<_>>(), vec!["a", "b"]);

        let fenced = parse_batch_response("```json\n{\"a\": \"uno\"}\n```").unwrap();
        assert_eq!(fenced.get("a").map(String::as_str), Some("uno"));

        assert!(parse_batch_response("not json").is_err());
        assert!(parse_batch_response(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"Hola\""), "Hola");
        assert_eq!(strip_quotes("Hola"), "Hola");
    }
}
