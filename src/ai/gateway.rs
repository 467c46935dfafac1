//! LLM Gateway
//!
//! Single entry point every stage uses to reach the model. A call is made
//! once. Transport errors, API errors, timeouts and empty replies are logged
//! and become `None`, so the caller skips its stage and moves on.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::metrics::MetricsCollector;
use super::provider::{LlmRequest, ProviderConfig, SharedProvider, create_provider};
use super::timeout::with_timeout;
use crate::config::LlmConfig;
use crate::types::{ErrorCategory, ErrorClassifier, LlmError, Result};

pub struct LlmGateway {
    provider: SharedProvider,
    system_prompt: Option<String>,
    temperature: f32,
    timeout: Duration,
    metrics: Arc<MetricsCollector>,
}

impl LlmGateway {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            system_prompt: None,
            temperature: 0.1,
            timeout: Duration::from_secs(300),
            metrics: Arc::new(MetricsCollector::new(uuid::Uuid::new_v4().to_string())),
        }
    }

    /// Build the provider described by `config`.
    ///
    /// Fails only on configuration problems such as a missing API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider = create_provider(&ProviderConfig::from(config))?;
        Ok(Self::new(provider)
            .with_temperature(config.temperature)
            .with_timeout(Duration::from_secs(config.timeout_secs)))
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Send `prompt` once and return the model's text, or `None` on any failure.
    pub async fn complete(&self, stage: &str, prompt: &str, max_tokens: u32) -> Option<String> {
        let started = Instant::now();
        match self.call(stage, prompt, max_tokens).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(
                    stage,
                    provider = self.provider.name(),
                    category = %err.category,
                    "LLM call failed, skipping stage: {}",
                    err.message
                );
                self.metrics
                    .record_failure(stage, started.elapsed().as_millis() as u64);
                None
            }
        }
    }

    /// Connection test with a tiny token budget
    pub async fn check(&self) -> std::result::Result<String, LlmError> {
        self.call(
            "connection-check",
            "Reply with the single word OK to confirm the connection works.",
            20,
        )
        .await
    }

    async fn call(
        &self,
        stage: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> std::result::Result<String, LlmError> {
        let mut request = LlmRequest::new(prompt, max_tokens).with_temperature(self.temperature);
        if let Some(system) = &self.system_prompt {
            request = request.with_system(system.clone());
        }

        debug!(
            stage,
            prompt_chars = prompt.chars().count(),
            max_tokens,
            "Calling {}",
            self.provider.name()
        );

        let response = with_timeout(self.timeout, self.provider.generate(&request), stage)
            .await
            .map_err(|e| ErrorClassifier::classify_error(&e, self.provider.name()))?;

        if response.content.trim().is_empty() {
            return Err(LlmError::with_provider(
                ErrorCategory::ParseError,
                "empty response",
                self.provider.name(),
            ));
        }

        self.metrics.record_response(stage, &response);
        Ok(response.content)
    }
}
