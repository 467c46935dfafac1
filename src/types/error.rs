//! Unified Error Type System
//!
//! Centralized error types for the modernizer.
//!
//! ## Failure Posture
//!
//! - **Config**: missing API key or unknown provider. Fatal, exits with code 1.
//! - **Llm / LlmApi**: transport or API failure. The gateway turns these into
//!   an absent result and the stage is skipped.
//! - **Parse**: malformed LLM output. The stage result is omitted.
//! - **Io / Artifact**: filesystem failures while writing. The writer falls
//!   back to a flat path before propagating.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories used to label LLM failures in logs and in `rpgmod check`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Context/token limit exceeded
    TokenLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues
    Network,
    /// Model or endpoint unavailable
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Response body could not be decoded
    ParseError,
    /// Temporary server issues
    Transient,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Short operator-facing hint shown next to a failed connection test
    pub fn hint(&self) -> &'static str {
        match self {
            Self::RateLimit => "quota or rate limit reached; wait or check billing",
            Self::TokenLimit => "prompt too large for the selected model",
            Self::Auth => "API key rejected; check the provider key variable",
            Self::Network => "provider unreachable; check connectivity or api_base",
            Self::Unavailable => "model or endpoint not found; check the model name",
            Self::BadRequest => "request rejected by the provider",
            Self::ParseError => "provider returned an unexpected response body",
            Self::Transient => "provider reported a server error",
            Self::Unknown => "unclassified provider failure",
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    pub category: ErrorCategory,
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps provider failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        let category = if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota")
            || lower.contains("resource_exhausted")
        {
            ErrorCategory::RateLimit
        } else if lower.contains("token")
            && (lower.contains("limit") || lower.contains("exceed") || lower.contains("maximum"))
            || lower.contains("context length")
            || lower.contains("too large")
        {
            ErrorCategory::TokenLimit
        } else if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("permission denied")
        {
            ErrorCategory::Auth
        } else if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("unreachable")
        {
            ErrorCategory::Network
        } else if lower.contains("404") || lower.contains("not found") {
            ErrorCategory::Unavailable
        } else if lower.contains("500")
            || lower.contains("502")
            || lower.contains("503")
            || lower.contains("overloaded")
            || lower.contains("server error")
        {
            ErrorCategory::Transient
        } else if lower.contains("400") || lower.contains("bad request") {
            ErrorCategory::BadRequest
        } else if lower.contains("decode") || lower.contains("json") || lower.contains("parse") {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };

        LlmError::with_provider(category, message, provider)
    }

    /// Classify HTTP status code directly
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 | 529 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify any [`ModernizeError`] raised while calling a provider
    pub fn classify_error(err: &ModernizeError, provider: &str) -> LlmError {
        match err {
            ModernizeError::Llm(llm_err) => llm_err.clone(),
            ModernizeError::LlmApi(msg) => Self::classify(msg, provider),
            ModernizeError::Timeout { .. } => {
                LlmError::with_provider(ErrorCategory::Network, err.to_string(), provider)
            }
            ModernizeError::Json(_) => {
                LlmError::with_provider(ErrorCategory::ParseError, err.to_string(), provider)
            }
            ModernizeError::Config(_) => {
                LlmError::with_provider(ErrorCategory::BadRequest, err.to_string(), provider)
            }
            _ => Self::classify(&err.to_string(), provider),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ModernizeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    // -------------------------------------------------------------------------
    // LLM Errors
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to write artifact {path}: {message}")]
    Artifact { path: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<LlmError> for ModernizeError {
    fn from(err: LlmError) -> Self {
        ModernizeError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, ModernizeError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl ModernizeError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Configuration problems abort the command; everything else degrades
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidInput(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::TokenLimit.to_string(), "TOKEN_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = ErrorClassifier::classify("Rate limit exceeded, please retry", "openai");
        assert_eq!(err.category, ErrorCategory::RateLimit);
        assert_eq!(err.provider.as_deref(), Some("openai"));
    }

    #[test]
    fn test_classify_gemini_quota() {
        let err = ErrorClassifier::classify("RESOURCE_EXHAUSTED: try later", "gemini");
        assert_eq!(err.category, ErrorCategory::RateLimit);
    }

    #[test]
    fn test_classify_token_limit() {
        let err = ErrorClassifier::classify("Token limit exceeded: 150000 > 128000", "anthropic");
        assert_eq!(err.category, ErrorCategory::TokenLimit);
    }

    #[test]
    fn test_classify_auth() {
        let err = ErrorClassifier::classify("Incorrect API key provided", "openai");
        assert_eq!(err.category, ErrorCategory::Auth);
    }

    #[test]
    fn test_classify_network() {
        let err = ErrorClassifier::classify("Connection timed out after 30s", "openai");
        assert_eq!(err.category, ErrorCategory::Network);
    }

    #[test]
    fn test_classify_unknown() {
        let err = ErrorClassifier::classify("Something weird happened", "test");
        assert_eq!(err.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_http_status() {
        let cases = [
            (429, ErrorCategory::RateLimit),
            (401, ErrorCategory::Auth),
            (404, ErrorCategory::Unavailable),
            (500, ErrorCategory::Transient),
            (529, ErrorCategory::Transient),
            (418, ErrorCategory::Unknown),
        ];
        for (status, expected) in cases {
            let err = ErrorClassifier::classify_http_status(status, "x", "test");
            assert_eq!(err.category, expected, "status {}", status);
        }
    }

    #[test]
    fn test_classify_timeout_error() {
        let err = ModernizeError::timeout("openai generate", Duration::from_secs(5));
        let classified = ErrorClassifier::classify_error(&err, "openai");
        assert_eq!(classified.category, ErrorCategory::Network);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ModernizeError::Config("no key".into()).is_fatal());
        assert!(!ModernizeError::LlmApi("boom".into()).is_fatal());
        assert!(
            !ModernizeError::Artifact {
                path: "a".into(),
                message: "b".into()
            }
            .is_fatal()
        );
    }
}
