//! Orchestrators
//!
//! One pipeline per front-end flow. Each runs its steps strictly in order,
//! reports progress through a [`ProgressTracker`] and returns the
//! [`OutputManifest`](crate::types::OutputManifest) of what it wrote.

pub mod analysis;
pub mod angular;
pub mod figma;
pub mod modernize;
pub mod progress;

pub use analysis::{AnalysisOutcome, AnalysisPipeline, AnalysisSession, AnalysisStep};
pub use angular::{AngularOptions, AngularOutcome, AngularPipeline, ComponentSpec};
pub use figma::{FigmaOutcome, FigmaPipeline, ProjectSummary, ReportFormat};
pub use modernize::{ModernizeOutcome, ModernizePipeline, default_output_dir};
pub use progress::{ProgressEvent, ProgressState, ProgressTracker};
