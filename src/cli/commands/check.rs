//! Check Command
//!
//! Sends a tiny request to the configured provider to confirm the key,
//! model and network path all work.

use std::time::Instant;

use tokio::runtime::Runtime;

use crate::ai::RPG_SYSTEM_PROMPT;
use crate::cli::util::CommandContext;
use crate::types::{ModernizeError, Result};

pub fn run(ctx: &CommandContext) -> Result<()> {
    let out = ctx.output();
    let gateway = ctx.gateway(RPG_SYSTEM_PROMPT)?;
    out.info(&format!(
        "Checking {} ({})...",
        gateway.provider_name(),
        gateway.model()
    ));

    let started = Instant::now();
    let runtime = Runtime::new()?;
    match runtime.block_on(gateway.check()) {
        Ok(reply) => {
            out.success(&format!(
                "Connection OK in {}ms: {}",
                started.elapsed().as_millis(),
                reply.trim()
            ));
            Ok(())
        }
        Err(err) => {
            out.error(&format!("[{}] {}", err.category, err.message));
            out.info(err.category.hint());
            Err(ModernizeError::Llm(err))
        }
    }
}
