//! AI Integration Layer
//!
//! Prompt templates, provider clients and the gateway every pipeline stage
//! calls through.

pub mod gateway;
pub mod metrics;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use gateway::LlmGateway;
pub use metrics::{MetricsCollector, MetricsSummary, StageMetrics};
pub use prompt::{
    ANGULAR_SYSTEM_PROMPT, FIGMA_SYSTEM_PROMPT, PromptBuilder, PromptSection, RPG_SYSTEM_PROMPT,
};
pub use provider::{
    LlmProvider, LlmRequest, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming,
    SharedProvider, TokenUsage, create_provider,
};
pub use timeout::with_timeout;
