//! LLM Provider Abstraction
//!
//! Defines the [`LlmProvider`] trait for plain-text completions. Every
//! provider returns [`LlmResponse`] with token usage so the gateway can
//! report totals at the end of a run.
//!
//! ## Providers
//!
//! - `openai`: Chat Completions API
//! - `anthropic`: Messages API
//! - `gemini`: `generateContent` API

mod anthropic;
mod gemini;
mod openai;
#[cfg(test)]
pub(crate) mod scripted;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{LlmConfig, ProviderKind};
use crate::types::{ModernizeError, Result};

// =============================================================================
// Request / Response
// =============================================================================

/// One completion request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// System instruction, where the provider supports one
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens,
            temperature: 0.1,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Complete LLM response including text and usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw model text
    pub content: String,
    pub usage: TokenUsage,
    pub timing: ResponseTiming,
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Wall clock time in milliseconds
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
}

pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// API keys are never serialized and are redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Connect timeout in seconds; the gateway bounds whole requests
    pub timeout_secs: u64,
    /// API key; falls back to the provider's environment variables
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for proxies and tests)
    #[serde(default)]
    pub api_base: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl From<&LlmConfig> for ProviderConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            provider: config.provider,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            api_key: None,
            api_base: config.api_base.clone(),
        }
    }
}

impl ProviderConfig {
    /// Configured model, then the provider's model variable, then the default
    pub fn resolved_model(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                std::env::var(self.provider.model_env_var())
                    .ok()
                    .filter(|m| !m.trim().is_empty())
            })
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Explicit key first, then each of the provider's key variables
    pub fn resolved_api_key(&self) -> Result<SecretString> {
        let vars = self.provider.api_key_env_vars();
        self.api_key
            .clone()
            .or_else(|| vars.iter().find_map(|v| std::env::var(v).ok()))
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                ModernizeError::Config(format!(
                    "{} API key not found. Set {} or provide it in config",
                    self.provider,
                    vars.join(" or ")
                ))
            })
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.timeout_secs.min(30)))
            .build()
            .map_err(|e| ModernizeError::LlmApi(format!("Failed to create HTTP client: {}", e)))
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Text-completion provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one request, returning the model's raw text
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration.
///
/// Fails with `ModernizeError::Config` when the key is missing.
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    Ok(match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config)?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(config)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config)?),
    })
}

/// Turn a non-success HTTP response into a classified error
pub(crate) async fn status_error(response: reqwest::Response, provider: &str) -> ModernizeError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ModernizeError::Llm(ErrorClassifier::classify_http_status(
        status.as_u16(),
        &format!("{} API error ({}): {}", provider, status, body),
        provider,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn config(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            provider: kind,
            model: None,
            timeout_secs: 10,
            api_key: None,
            api_base: None,
        }
    }

    #[test]
    fn test_explicit_model_wins() {
        let mut cfg = config(ProviderKind::Anthropic);
        cfg.model = Some("claude-test".to_string());
        assert_eq!(cfg.resolved_model(), "claude-test");
    }

    #[test]
    fn test_explicit_key_wins() {
        let mut cfg = config(ProviderKind::OpenAi);
        cfg.api_key = Some("sk-explicit".to_string());
        let key = cfg.resolved_api_key().unwrap();
        assert_eq!(key.expose_secret(), "sk-explicit");
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut cfg = config(ProviderKind::Gemini);
        cfg.api_key = Some("secret-value".to_string());
        let rendered = format!("{:?}", cfg);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret-value"));
    }

    #[test]
    fn test_token_usage_total() {
        assert_eq!(TokenUsage::new(100, 50).total(), 150);
    }

    #[test]
    fn test_request_builder() {
        let req = LlmRequest::new("hi", 20)
            .with_system("sys")
            .with_temperature(0.2);
        assert_eq!(req.system.as_deref(), Some("sys"));
        assert_eq!(req.max_tokens, 20);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
    }
}
