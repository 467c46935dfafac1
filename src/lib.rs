//! rpg-modernizer - LLM-Assisted RPGLE and UI Modernization
//!
//! Turns IBM i RPG programs into documentation and starter Java or Python
//! projects, and JSON or Figma UI descriptions into Angular code. Every
//! generation step is a single model call whose reply is mined with
//! heuristic extraction; a failed call skips its stage instead of aborting.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rpg_modernizer::{AnalysisPipeline, Config, LlmGateway, RPG_SYSTEM_PROMPT};
//! use rpg_modernizer::source::load_sources;
//!
//! let config = Config::default();
//! let gateway = LlmGateway::from_config(&config.llm)?.with_system_prompt(RPG_SYSTEM_PROMPT);
//! let sources = load_sources(&[PathBuf::from("qrpglesrc")], &config.analysis)?;
//! let outcome = AnalysisPipeline::new(&gateway, config.analysis, Path::new("output"))?
//!     .run(&sources)
//!     .await?;
//! println!("{}", outcome.manifest.to_markdown(&outcome.output_dir));
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt templates, provider clients and the gateway
//! - [`extract`]: JSON, code block and file-path extraction from replies
//! - [`artifact`]: file writing, zipping and project scaffolds
//! - [`source`]: RPGLE input discovery
//! - [`pipeline`]: the analysis, modernize, Angular and Figma orchestrators
//! - [`config`]: layered configuration

pub mod ai;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod source;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, ProviderKind};

// Error Types
pub use types::error::{ErrorCategory, LlmError, ModernizeError, Result};

// Domain Types
pub use types::{
    ArtifactCategory, GeneratedArtifact, OutputManifest, RpgType, SourceFile, StyleType,
    TargetLanguage,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{
    AnalysisOutcome, AnalysisPipeline, AnalysisStep, AngularOptions, AngularPipeline,
    FigmaPipeline, ModernizePipeline, ProgressEvent, ProgressTracker, ReportFormat,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    ANGULAR_SYSTEM_PROMPT, FIGMA_SYSTEM_PROMPT, LlmGateway, LlmProvider, LlmResponse,
    MetricsCollector, RPG_SYSTEM_PROMPT, create_provider,
};
