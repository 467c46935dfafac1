//! In-memory provider for pipeline tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{LlmProvider, LlmRequest, LlmResponse, SharedProvider};
use crate::types::{ModernizeError, Result};

/// Replies with the first scripted answer whose needle appears in the prompt.
/// Prompts with no matching rule fail like an unreachable provider.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    rules: Vec<(String, String)>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((needle.into(), reply.into()));
        self
    }

    pub(crate) fn otherwise(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    pub(crate) fn shared(self) -> (Arc<Self>, SharedProvider) {
        let arc = Arc::new(self);
        let shared: SharedProvider = arc.clone();
        (arc, shared)
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }
        self.rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.fallback.clone())
            .map(LlmResponse::content_only)
            .ok_or_else(|| ModernizeError::LlmApi("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}
