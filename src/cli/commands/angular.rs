//! Angular Command
//!
//! Generates a component from a JSON description and, unless disabled, a
//! runnable Angular project around it.

use std::path::PathBuf;

use crate::ai::ANGULAR_SYSTEM_PROMPT;
use crate::artifact::NpmOutcome;
use crate::cli::commands::analyze::print_skipped;
use crate::cli::util::{CommandContext, read_json};
use crate::pipeline::{AngularOptions, AngularPipeline};
use crate::types::{Result, StyleType};

pub struct AngularArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub style: Option<StyleType>,
    pub no_project: bool,
    pub skip_install: bool,
}

pub fn run(ctx: &CommandContext, args: AngularArgs) -> Result<()> {
    let out = ctx.output();
    let description = read_json(&args.input)?;
    let output_dir = ctx.output_dir(args.output);
    let gateway = ctx.gateway(ANGULAR_SYSTEM_PROMPT)?;

    let options = AngularOptions {
        style: args.style.unwrap_or(ctx.config.output.style),
        create_project: !args.no_project,
        skip_install: args.skip_install || ctx.config.output.skip_npm_install,
    };

    out.header("Angular Component Generation");
    let pipeline = AngularPipeline::new(&gateway, options, &output_dir)?;
    let tracker = pipeline.progress();
    let outcome = ctx.run(&tracker, pipeline.run(&description))?;

    out.manifest(&outcome.manifest, &output_dir);
    out.success(&format!("Component: {}", outcome.component_dir.display()));

    if let Some(project_dir) = &outcome.project_dir {
        out.success(&format!("Project: {}", project_dir.display()));
        match &outcome.npm {
            Some(NpmOutcome::Installed) => out.success("Dependencies installed"),
            Some(NpmOutcome::Skipped) | None => out.info(&format!(
                "Run `npm install` in {} before `ng serve`",
                project_dir.display()
            )),
            Some(NpmOutcome::NotFound) => {
                out.warning("npm not found on PATH; install Node.js and run `npm install`")
            }
            Some(NpmOutcome::Failed(reason)) => {
                out.warning(&format!("npm install failed: {}", reason))
            }
        }
    }

    print_skipped(ctx, &gateway);
    Ok(())
}
