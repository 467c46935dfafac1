//! Modernize Command
//!
//! Single-program flow: pseudocode, flow diagram and business document, then
//! a Java Spring Boot or Python project zipped next to them.

use std::path::PathBuf;

use crate::ai::RPG_SYSTEM_PROMPT;
use crate::cli::commands::analyze::print_skipped;
use crate::cli::util::{CommandContext, require_file};
use crate::pipeline::{ModernizePipeline, default_output_dir};
use crate::types::{Result, RpgType, SourceFile, TargetLanguage};

pub struct ModernizeOptions {
    pub input: PathBuf,
    pub rpg_type: RpgType,
    pub target: TargetLanguage,
    pub output: Option<PathBuf>,
}

pub fn run(ctx: &CommandContext, options: ModernizeOptions) -> Result<()> {
    let out = ctx.output();
    require_file(&options.input)?;
    let source = SourceFile::load(&options.input)?;
    let output_dir = options
        .output
        .unwrap_or_else(|| default_output_dir(&options.input));
    let gateway = ctx.gateway(RPG_SYSTEM_PROMPT)?;

    out.header(&format!("Modernizing {}", source.name()));
    out.info(&format!(
        "{} RPG → {}",
        options.rpg_type, options.target
    ));

    let pipeline = ModernizePipeline::new(&gateway, options.rpg_type, options.target, &output_dir)?;
    let tracker = pipeline.progress();
    let outcome = ctx.run(&tracker, pipeline.run(&source))?;

    out.manifest(&outcome.manifest, &outcome.output_dir);
    out.success(&format!("Archive: {}", outcome.archive.display()));
    print_skipped(ctx, &gateway);
    Ok(())
}
