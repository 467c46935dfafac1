//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;

use super::progress::ConsoleRenderer;
use super::ui::Output;
use crate::ai::LlmGateway;
use crate::config::{Config, ConfigLoader, ProviderKind};
use crate::pipeline::ProgressTracker;
use crate::types::{ModernizeError, Result};

/// Flags accepted by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub verbose: bool,
    pub quiet: bool,
}

/// Command execution context
///
/// Configuration after every layer and command-line override has been
/// applied. Created once per invocation via `CommandContext::load()`.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub quiet: bool,
    pub verbose: bool,
}

impl CommandContext {
    /// Load configuration and apply `--provider` / `--model`
    pub fn load(options: &GlobalOptions) -> Result<Self> {
        let mut config = ConfigLoader::load_with(options.config.as_deref())?;
        apply_overrides(&mut config, options)?;
        config.validate()?;

        Ok(Self {
            config,
            quiet: options.quiet,
            verbose: options.verbose,
        })
    }

    /// Gateway for the configured provider with the given system prompt.
    ///
    /// Fails when the provider's API key is missing.
    pub fn gateway(&self, system_prompt: &str) -> Result<LlmGateway> {
        let gateway = LlmGateway::from_config(&self.config.llm)?.with_system_prompt(system_prompt);
        tracing::info!(
            "Using {} ({})",
            gateway.provider_name(),
            gateway.model()
        );
        Ok(gateway)
    }

    pub fn output(&self) -> Output {
        Output::new().quiet(self.quiet)
    }

    /// `explicit` when given, the configured output directory otherwise
    pub fn output_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(|| self.config.output.dir.clone())
    }

    /// Run `task` on a fresh runtime, printing progress unless quiet
    pub fn run<T, F>(&self, tracker: &ProgressTracker, task: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let runtime = Runtime::new()?;
        runtime.block_on(async {
            let renderer = (!self.quiet).then(|| {
                ConsoleRenderer::new(tracker.clone())
                    .with_items(self.verbose)
                    .spawn()
            });

            let result = task.await;
            if let Err(e) = &result {
                tracker.finish(false, &e.to_string());
            }
            if let Some(handle) = renderer {
                let _ = handle.await;
            }
            result
        })
    }
}

fn apply_overrides(config: &mut Config, options: &GlobalOptions) -> Result<()> {
    if let Some(provider) = &options.provider {
        let kind: ProviderKind = provider.parse().map_err(ModernizeError::Config)?;
        if kind != config.llm.provider {
            // A model configured for another provider would not exist here
            config.llm.model = None;
        }
        config.llm.provider = kind;
    }
    if let Some(model) = &options.model {
        config.llm.model = Some(model.clone());
    }
    Ok(())
}

/// Require an existing input file
pub fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ModernizeError::InvalidInput(format!(
            "Input file not found: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Read a JSON document from disk
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    require_file(path)?;
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| ModernizeError::parse(path.display().to_string(), e.to_string()))
}
