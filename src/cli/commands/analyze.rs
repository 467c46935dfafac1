//! Analyze Command
//!
//! Runs the nine-step analysis over one or more RPGLE programs and writes the
//! documents, the JSON dump and the Java project.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::ai::{LlmGateway, RPG_SYSTEM_PROMPT};
use crate::cli::util::CommandContext;
use crate::pipeline::AnalysisPipeline;
use crate::source::load_sources;
use crate::types::{ModernizeError, Result};

pub fn run(ctx: &CommandContext, inputs: Vec<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let out = ctx.output();
    let sources = load_sources(&inputs, &ctx.config.analysis)?;
    if sources.is_empty() {
        return Err(ModernizeError::InvalidInput(
            "No RPGLE source files found in the given paths".to_string(),
        ));
    }

    let output_dir = ctx.output_dir(output);
    let gateway = ctx.gateway(RPG_SYSTEM_PROMPT)?;

    out.header("RPGLE Analysis");
    out.info(&format!("{} program(s)", sources.len()));
    for source in &sources {
        out.info(&format!("  {}", source.name()));
    }

    let pipeline = AnalysisPipeline::new(&gateway, ctx.config.analysis.clone(), &output_dir)?;
    let tracker = pipeline.progress();
    let outcome = ctx.run(&tracker, pipeline.run(&sources))?;

    out.manifest(&outcome.manifest, &outcome.output_dir);
    print_skipped(ctx, &gateway);
    Ok(())
}

/// Stages that produced nothing, plus call totals in verbose mode
pub(crate) fn print_skipped(ctx: &CommandContext, gateway: &LlmGateway) {
    let out = ctx.output();
    let summary = gateway.metrics().summary();
    let skipped: Vec<&str> = summary
        .skipped_stages()
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !skipped.is_empty() {
        out.warning(&format!(
            "{} LLM call(s) failed; affected stages: {}",
            summary.failed_calls,
            skipped.join(", ")
        ));
    }
    if ctx.verbose {
        out.section("LLM usage");
        println!("{}", summary.display());
    }
}
