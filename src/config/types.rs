//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/rpgmod/) and project (.rpgmod/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{ModernizeError, Result, StyleType};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Prompt sizing for the analysis pipeline
    pub analysis: AnalysisConfig,

    /// Where and how artifacts are written
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            analysis: AnalysisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ModernizeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ModernizeError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(ModernizeError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(ModernizeError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if let Some(base) = &self.llm.api_base {
            url::Url::parse(base).map_err(|e| {
                ModernizeError::Config(format!("Invalid llm.api_base '{}': {}", base, e))
            })?;
        }

        if self.analysis.source_chars == 0 || self.analysis.conversion_code_chars == 0 {
            return Err(ModernizeError::Config(
                "Analysis truncation limits must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    #[serde(alias = "google")]
    Gemini,
}

impl ProviderKind {
    /// Model used when neither config nor environment names one
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4-turbo",
            ProviderKind::Anthropic => "claude-3-opus-20240229",
            ProviderKind::Gemini => "gemini-1.5-flash",
        }
    }

    /// Environment variable that may override the default model
    pub fn model_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_MODEL",
            ProviderKind::Anthropic => "ANTHROPIC_MODEL",
            ProviderKind::Gemini => "GEMINI_MODEL",
        }
    }

    /// Environment variables consulted for the API key, in order
    pub fn api_key_env_vars(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAi => &["OPENAI_API_KEY"],
            ProviderKind::Anthropic => &["ANTHROPIC_API_KEY"],
            ProviderKind::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            _ => Err(format!(
                "Unknown LLM provider: {}. Valid values: openai, anthropic, gemini",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name
    pub provider: ProviderKind,

    /// Model name (provider default when unset)
    pub model: Option<String>,

    /// Override for the provider endpoint
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for LLM generation
    pub temperature: f32,

    /// Default completion budget; individual stages ask for more
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: None,
            api_base: None,
            timeout_secs: 300,
            temperature: 0.1,
            max_tokens: 4000,
        }
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Characters of source sent to the dependency/format/metadata stages
    pub source_chars: usize,

    /// Characters of source sent to Java conversion
    pub conversion_code_chars: usize,

    /// Characters of application business logic sent to Java conversion
    pub conversion_logic_chars: usize,

    /// File extensions picked up when an input is a directory
    pub extensions: Vec<String>,

    /// Glob patterns skipped during directory discovery
    pub exclude: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source_chars: 15_000,
            conversion_code_chars: 10_000,
            conversion_logic_chars: 2_000,
            extensions: ["rpgle", "sqlrpgle", "rpg", "rpglec", "clle", "txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: vec!["**/output/**".to_string(), "**/.git/**".to_string()],
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for all generated artifacts
    pub dir: PathBuf,

    /// Stylesheet dialect for Angular output
    pub style: StyleType,

    /// Skip `npm install` after scaffolding an Angular project
    pub skip_npm_install: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            style: StyleType::Scss,
            skip_npm_install: false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, ProviderKind::OpenAi);
        assert_eq!(config.analysis.source_chars, 15_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("google".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("claude".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert!("ollama".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
    }

    #[test]
    fn test_provider_defaults() {
        assert_eq!(ProviderKind::Gemini.default_model(), "gemini-1.5-flash");
        assert_eq!(
            ProviderKind::Gemini.api_key_env_vars(),
            &["GEMINI_API_KEY", "GOOGLE_API_KEY"]
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.api_base = Some("not a url".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.source_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_uses_lowercase_names() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(rendered.contains("provider = \"openai\""));
        assert!(rendered.contains("style = \"scss\""));
    }
}
