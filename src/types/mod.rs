pub mod artifact;
pub mod error;
pub mod source;
pub mod utils;

pub use artifact::{ArtifactCategory, GeneratedArtifact, OutputManifest, stays_within_root};
pub use error::{ErrorCategory, ErrorClassifier, LlmError, ModernizeError, Result};
pub use source::{RpgType, SourceFile, StyleType, TargetLanguage};
pub use utils::{
    UNKNOWN, capitalize_first, json_array, json_display, json_string, json_string_or,
    pretty_json, truncate_chars,
};

// =============================================================================
// Stage Results
// =============================================================================

use std::collections::BTreeMap;

/// Filename -> best-effort JSON produced by one stage
pub type StageResults = BTreeMap<String, serde_json::Value>;
