use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rpg_modernizer::cli::commands::{self, angular::AngularArgs, modernize::ModernizeOptions};
use rpg_modernizer::cli::{CommandContext, GlobalOptions};
use rpg_modernizer::{ReportFormat, RpgType, StyleType, TargetLanguage};

fn parse_rpg_type(s: &str) -> Result<RpgType, String> {
    s.parse()
}

fn parse_target(s: &str) -> Result<TargetLanguage, String> {
    s.parse()
}

fn parse_style(s: &str) -> Result<StyleType, String> {
    s.parse()
}

fn parse_format(s: &str) -> Result<ReportFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "rpgmod")]
#[command(
    version,
    about = "LLM-assisted modernization of RPGLE programs and UI designs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Extra config file layered above the project config")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,

    #[arg(long, global = true, help = "LLM provider (openai, anthropic, gemini)")]
    provider: Option<String>,

    #[arg(long, global = true, help = "Model to use")]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze RPGLE programs and generate documents plus a Java project
    Analyze {
        #[arg(required = true, help = "RPGLE files or directories")]
        inputs: Vec<PathBuf>,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
    },

    /// Convert one RPG program to a Java Spring Boot or Python project
    Modernize {
        #[arg(help = "RPG source file")]
        input: PathBuf,
        #[arg(long, value_parser = parse_rpg_type, default_value = "modern", help = "RPG dialect: synon, modern")]
        rpg_type: RpgType,
        #[arg(long, short, value_parser = parse_target, default_value = "java", help = "Target language: java, python")]
        target: TargetLanguage,
        #[arg(long, short, help = "Output directory (default: <input>_output next to the input)")]
        output: Option<PathBuf>,
    },

    /// Generate an Angular component from a JSON description
    Angular {
        #[arg(help = "Component description (JSON)")]
        input: PathBuf,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(long = "css-type", value_parser = parse_style, help = "Stylesheet type: scss, css")]
        css_type: Option<StyleType>,
        #[arg(long, help = "Only generate the component, no project scaffold")]
        no_project: bool,
        #[arg(long, help = "Do not run npm install")]
        skip_install: bool,
    },

    /// Generate an Angular project from a Figma export
    Figma {
        #[arg(help = "Figma file export (JSON)")]
        input: PathBuf,
        #[arg(long, short, help = "Output directory")]
        output: Option<PathBuf>,
        #[arg(long, short = 'f', value_parser = parse_format, default_value = "markdown", help = "Report format: json, markdown")]
        format: ReportFormat,
    },

    /// Test the connection to the configured LLM provider
    Check,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Edit configuration file with $EDITOR
    Edit {
        #[arg(long, short, help = "Edit global config")]
        global: bool,
    },
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let options = GlobalOptions {
        config: cli.config,
        provider: cli.provider,
        model: cli.model,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // Path/edit/init must work even when the current config is broken
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Path => return Ok(commands::config::path()?),
            ConfigAction::Edit { global } => return Ok(commands::config::edit(*global)?),
            ConfigAction::Init { global, force } => {
                return Ok(commands::config::init(*global, *force)?);
            }
            ConfigAction::Show { .. } => {}
        }
    }

    let ctx = CommandContext::load(&options)?;

    match cli.command {
        Commands::Analyze { inputs, output } => {
            commands::analyze::run(&ctx, inputs, output)?;
        }
        Commands::Modernize {
            input,
            rpg_type,
            target,
            output,
        } => {
            commands::modernize::run(
                &ctx,
                ModernizeOptions {
                    input,
                    rpg_type,
                    target,
                    output,
                },
            )?;
        }
        Commands::Angular {
            input,
            output,
            css_type,
            no_project,
            skip_install,
        } => {
            commands::angular::run(
                &ctx,
                AngularArgs {
                    input,
                    output,
                    style: css_type,
                    no_project,
                    skip_install,
                },
            )?;
        }
        Commands::Figma {
            input,
            output,
            format,
        } => {
            commands::figma::run(&ctx, input, output, format)?;
        }
        Commands::Check => {
            commands::check::run(&ctx)?;
        }
        Commands::Config { action } => {
            if let ConfigAction::Show { global, format } = action {
                commands::config::show(&ctx, global, &format)?;
            }
        }
    }

    Ok(())
}
