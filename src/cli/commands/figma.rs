//! Figma Command
//!
//! Reduces a Figma export to a component tree, asks for a semantic analysis
//! and an Angular project, and writes the report and the project zip.

use std::path::PathBuf;

use crate::ai::FIGMA_SYSTEM_PROMPT;
use crate::cli::commands::analyze::print_skipped;
use crate::cli::util::{CommandContext, read_json};
use crate::pipeline::{FigmaPipeline, ReportFormat};
use crate::types::Result;

pub fn run(
    ctx: &CommandContext,
    input: PathBuf,
    output: Option<PathBuf>,
    format: ReportFormat,
) -> Result<()> {
    let out = ctx.output();
    let export = read_json(&input)?;
    let output_dir = ctx.output_dir(output);
    let gateway = ctx.gateway(FIGMA_SYSTEM_PROMPT)?;

    out.header("Figma to Angular");
    let pipeline = FigmaPipeline::new(&gateway, format, &output_dir)?;
    let tracker = pipeline.progress();
    let outcome = ctx.run(&tracker, pipeline.run(&export))?;

    if outcome.semantic_analysis.get("error").is_some() {
        out.warning("Semantic analysis could not be parsed; raw reply kept in the report");
    }
    if outcome.files.is_empty() {
        out.warning("No project files were generated; the archive holds workspace defaults only");
    } else if !ctx.quiet {
        println!("\n{}", outcome.summary.to_markdown());
    }

    out.manifest(&outcome.manifest, &output_dir);
    print_skipped(ctx, &gateway);
    Ok(())
}
