//! Config Command
//!
//! Usage:
//!   rpgmod config show [-g] [-f json]
//!   rpgmod config path
//!   rpgmod config edit [-g]
//!   rpgmod config init [-g] [--force]

use crate::cli::util::CommandContext;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged configuration, or the raw global file with `global`
pub fn show(ctx: &CommandContext, global: bool, format: &str) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(path) if path.exists() => {
                println!("# Global Config: {}\n", path.display());
                println!("{}", std::fs::read_to_string(&path)?);
            }
            Some(_) => {
                println!("No global config found.");
                println!("Run 'rpgmod config init --global' to create one.");
            }
            None => println!("Cannot determine global config directory."),
        }
        return Ok(());
    }
    ConfigLoader::show_config(&ctx.config, format == "json")
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn edit(global: bool) -> Result<()> {
    ConfigLoader::edit_config(global)
}

pub fn init(global: bool, force: bool) -> Result<()> {
    let (scope, path) = if global {
        ("global", ConfigLoader::init_global(force)?)
    } else {
        ("project", ConfigLoader::init_project(force)?)
    };
    println!("✓ Initialized {} configuration", scope);
    println!("  Config: {}", path.display());
    Ok(())
}
