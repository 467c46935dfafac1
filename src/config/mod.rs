//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/rpgmod/config.toml)
//! 3. Project config (.rpgmod/config.toml)
//! 4. `--config <file>`
//! 5. Environment variables (AI_PROVIDER, RPGMOD_*)
//! 6. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
